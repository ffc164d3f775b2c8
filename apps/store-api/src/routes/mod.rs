//! # Route Definitions
//!
//! The HTTP surface of the order core, JSON in/out.
//!
//! ```text
//! POST   /orders                          create an order (explicit items)
//! POST   /orders/checkout                 cart → order handoff (or buy-now)
//! GET    /orders                          staff order list
//! GET    /orders/{order_id}               single order with lines
//! PATCH  /orders/{order_id}/status        staff status transition
//! GET    /orders/customer/{customer_id}   customer order history
//! GET    /health                          liveness probe
//! ```

pub mod orders;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/checkout", post(orders::checkout))
        .route("/orders/{order_id}", get(orders::get_order))
        .route("/orders/{order_id}/status", patch(orders::update_status))
        .route(
            "/orders/customer/{customer_id}",
            get(orders::list_customer_orders),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe: verifies the database answers queries.
async fn health(State(state): State<AppState>) -> StatusCode {
    if state.db.health_check().await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
