//! # Order Handlers
//!
//! HTTP handlers for order creation, the cart → order handoff, the query
//! surface, and staff status updates.
//!
//! Handlers stay thin: parse/normalize the request, call the repository,
//! serialize the result. The transaction boundary lives in vendora-db.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;
use vendora_core::{
    CheckoutSource, DeliveryMode, Money, NewOrder, NewOrderLine, OrderDetail, OrderStatus,
    OrderSummary, PaymentMethod,
};

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /orders`.
///
/// `delivery_mode` and `payment_method` arrive as strings and are parsed
/// explicitly so that an unknown value is a 400, with the allowed set named
/// in the message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    pub address_id: Option<String>,
    pub delivery_mode: String,
    pub delivery_zip: Option<String>,
    pub payment_method: Option<String>,
    pub items: Vec<OrderItemRequest>,
    pub subtotal_cents: i64,
    /// Defaults to 0 when unspecified.
    #[serde(default)]
    pub delivery_fee_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Body of `POST /orders/checkout`: the cart → order handoff.
///
/// Exactly one source: `cart_id` for a persisted cart, or `variant_id`
/// (+ optional `quantity`, default 1) for the buy-now path.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub customer_id: String,
    pub cart_id: Option<String>,
    pub variant_id: Option<String>,
    pub quantity: Option<i64>,
    pub address_id: Option<String>,
    pub delivery_mode: String,
    pub delivery_zip: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub delivery_fee_cents: i64,
}

/// Body of `PATCH /orders/{order_id}/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Response of the order listings.
#[derive(Debug, Clone, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderSummary>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /orders` - create an order from explicit line items.
///
/// Returns `201` with the fully joined order, `400` on validation failures,
/// `500` when the transaction failed (and was rolled back).
pub async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderDetail>), ApiError> {
    debug!(customer_id = %req.customer_id, items = req.items.len(), "create_order request");

    let input = new_order_from_request(req)?;
    let detail = state.db.orders().create(&input).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// `POST /orders/checkout` - snapshot a cart (or buy-now line) and create
/// the order from it.
///
/// The subtotal is computed from the snapshot at its captured prices; the
/// same all-or-nothing transaction runs afterwards.
pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<OrderDetail>), ApiError> {
    let source = checkout_source(&req)?;
    debug!(customer_id = %req.customer_id, source = ?source, "checkout request");

    let lines = state.db.carts().snapshot(&source).await?;

    let subtotal = lines
        .iter()
        .fold(Money::ZERO, |acc, line| acc + line.line_total());
    let total = subtotal + Money::from_cents(req.delivery_fee_cents);

    let input = NewOrder {
        customer_id: req.customer_id,
        address_id: req.address_id,
        delivery_mode: req.delivery_mode.parse::<DeliveryMode>()?,
        delivery_zip: req.delivery_zip,
        payment_method: parse_payment_method(req.payment_method.as_deref())?,
        lines,
        subtotal_cents: subtotal.cents(),
        delivery_fee_cents: req.delivery_fee_cents,
        total_cents: total.cents(),
    };

    let detail = state.db.orders().create(&input).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /orders/{order_id}` - single order with lines (customer tracking).
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<OrderDetail>, ApiError> {
    let detail = state
        .db
        .orders()
        .get_detail(&order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &order_id))?;

    Ok(Json(detail))
}

/// `GET /orders/customer/{customer_id}` - customer order history.
pub async fn list_customer_orders(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.db.orders().list_for_customer(&customer_id).await?;
    Ok(Json(OrdersResponse { orders }))
}

/// `GET /orders` - all orders system-wide (staff).
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<OrdersResponse>, ApiError> {
    let orders = state.db.orders().list_all().await?;
    Ok(Json(OrdersResponse { orders }))
}

/// `PATCH /orders/{order_id}/status` - staff lifecycle transition.
///
/// The status string must be one of the five enumerated values, else `400`.
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<OrderDetail>, ApiError> {
    let status: OrderStatus = req.status.parse()?;

    state.db.orders().update_status(&order_id, status).await?;

    let detail = state
        .db
        .orders()
        .get_detail(&order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", &order_id))?;

    Ok(Json(detail))
}

// =============================================================================
// Request Mapping
// =============================================================================

fn new_order_from_request(req: CreateOrderRequest) -> Result<NewOrder, ApiError> {
    Ok(NewOrder {
        customer_id: req.customer_id,
        address_id: req.address_id,
        delivery_mode: req.delivery_mode.parse::<DeliveryMode>()?,
        delivery_zip: req.delivery_zip,
        payment_method: parse_payment_method(req.payment_method.as_deref())?,
        lines: req
            .items
            .into_iter()
            .map(|item| NewOrderLine {
                variant_id: item.variant_id,
                quantity: item.quantity,
                unit_price_cents: item.unit_price_cents,
            })
            .collect(),
        subtotal_cents: req.subtotal_cents,
        delivery_fee_cents: req.delivery_fee_cents,
        total_cents: req.total_cents,
    })
}

/// Absent method stays `None`; the repository normalizes it to the Cash on
/// Delivery default. A present-but-unknown method is a 400.
fn parse_payment_method(method: Option<&str>) -> Result<Option<PaymentMethod>, ApiError> {
    match method {
        None => Ok(None),
        Some(s) => Ok(Some(s.parse::<PaymentMethod>()?)),
    }
}

fn checkout_source(req: &CheckoutRequest) -> Result<CheckoutSource, ApiError> {
    if let Some(cart_id) = &req.cart_id {
        return Ok(CheckoutSource::Cart {
            cart_id: cart_id.clone(),
        });
    }

    if let Some(variant_id) = &req.variant_id {
        return Ok(CheckoutSource::BuyNow {
            variant_id: variant_id.clone(),
            quantity: req.quantity.unwrap_or(1),
        });
    }

    Err(ApiError::validation(
        "either cart_id or variant_id is required",
    ))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::router;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use tower::ServiceExt;
    use vendora_core::ProductVariant;
    use vendora_db::{Database, DbConfig};

    async fn test_app() -> (axum::Router, Database) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let now = Utc::now();
        db.variants()
            .insert(&ProductVariant {
                id: "var-42".to_string(),
                product_name: "Aurora Phone 12".to_string(),
                variant_name: "Black 128GB".to_string(),
                sku: "AURORA-BLK-128".to_string(),
                price_cents: 59999,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();
        db.inventory().set("var-42", 10).await.unwrap();
        db.zones().upsert("55501", 5).await.unwrap();

        (router(crate::state::AppState::new(db.clone())), db)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_create_order_endpoint() {
        let (app, db) = test_app().await;

        let request = json_request(
            "POST",
            "/orders",
            serde_json::json!({
                "customer_id": "customer-1",
                "address_id": "address-1",
                "delivery_mode": "standard_delivery",
                "delivery_zip": "55501",
                "items": [
                    {"variant_id": "var-42", "quantity": 1, "unit_price_cents": 59999}
                ],
                "subtotal_cents": 59999,
                "delivery_fee_cents": 5000,
                "total_cents": 64999
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        assert_eq!(json["order"]["status"], "pending");
        assert_eq!(json["order"]["estimated_delivery_days"], 5);
        assert_eq!(json["order"]["total_cents"], 64999);
        assert_eq!(json["payment"]["method"], "cash_on_delivery");
        assert_eq!(json["payment"]["status"], "pending");
        assert_eq!(json["items"][0]["unit_price_cents"], 59999);

        let stock = db.inventory().get("var-42").await.unwrap().unwrap();
        assert_eq!(stock.quantity, 9);
    }

    #[tokio::test]
    async fn test_create_order_rejects_unknown_delivery_mode() {
        let (app, _db) = test_app().await;

        let request = json_request(
            "POST",
            "/orders",
            serde_json::json!({
                "customer_id": "customer-1",
                "delivery_mode": "drone_drop",
                "items": [
                    {"variant_id": "var-42", "quantity": 1, "unit_price_cents": 59999}
                ],
                "subtotal_cents": 59999,
                "total_cents": 59999
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_order_rejects_broken_total() {
        let (app, db) = test_app().await;

        let request = json_request(
            "POST",
            "/orders",
            serde_json::json!({
                "customer_id": "customer-1",
                "delivery_mode": "store_pickup",
                "items": [
                    {"variant_id": "var-42", "quantity": 1, "unit_price_cents": 59999}
                ],
                "subtotal_cents": 59999,
                "delivery_fee_cents": 5000,
                "total_cents": 59999
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing was written
        let stock = db.inventory().get("var-42").await.unwrap().unwrap();
        assert_eq!(stock.quantity, 10);
    }

    #[tokio::test]
    async fn test_checkout_buy_now() {
        let (app, _db) = test_app().await;

        let request = json_request(
            "POST",
            "/orders/checkout",
            serde_json::json!({
                "customer_id": "customer-1",
                "variant_id": "var-42",
                "quantity": 2,
                "delivery_mode": "store_pickup"
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = body_json(response).await;
        // Subtotal derived from the snapshot: 2 × 59999
        assert_eq!(json["order"]["subtotal_cents"], 119998);
        assert_eq!(json["order"]["total_cents"], 119998);
        assert_eq!(json["order"]["estimated_delivery_days"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_checkout_requires_a_source() {
        let (app, _db) = test_app().await;

        let request = json_request(
            "POST",
            "/orders/checkout",
            serde_json::json!({
                "customer_id": "customer-1",
                "delivery_mode": "store_pickup"
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_order_not_found() {
        let (app, _db) = test_app().await;

        let request = Request::builder()
            .method("GET")
            .uri("/orders/no-such-order")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_value() {
        let (app, _db) = test_app().await;

        let request = json_request(
            "PATCH",
            "/orders/some-order/status",
            serde_json::json!({"status": "refunded"}),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_customer_history_endpoint() {
        let (app, db) = test_app().await;

        // Place one order directly through the repository
        let detail = db
            .orders()
            .create(&vendora_core::NewOrder {
                customer_id: "customer-7".to_string(),
                address_id: None,
                delivery_mode: DeliveryMode::StorePickup,
                delivery_zip: None,
                payment_method: None,
                lines: vec![NewOrderLine {
                    variant_id: "var-42".to_string(),
                    quantity: 1,
                    unit_price_cents: 59999,
                }],
                subtotal_cents: 59999,
                delivery_fee_cents: 0,
                total_cents: 59999,
            })
            .await
            .unwrap();

        let request = Request::builder()
            .method("GET")
            .uri("/orders/customer/customer-7")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["orders"].as_array().unwrap().len(), 1);
        assert_eq!(json["orders"][0]["id"], detail.order.id.as_str());
        assert_eq!(json["orders"][0]["item_count"], 1);
        assert_eq!(json["orders"][0]["payment_status"], "pending");
    }
}
