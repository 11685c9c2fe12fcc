use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, create_booking, decide_booking, get_booking, list_bookings, list_owner_bookings,
};

/// Creates the API router with all booking endpoints
///
/// Command endpoints (Write operations):
/// - POST /bookings - Request a new booking
/// - PATCH /bookings/:id?approved= - Approve or reject a booking
///
/// Query endpoints (Read operations):
/// - GET /bookings/:id - Get booking details
/// - GET /bookings?state=&from=&size= - List bookings for the caller as booker
/// - GET /owners/bookings?state=&from=&size= - List bookings against the caller's items
///
/// The owner listing lives under its own prefix: a static `owner`
/// segment next to the `:id` capture would be a routing conflict.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Command endpoints (Write operations)
        .route("/bookings", post(create_booking))
        .route("/bookings/:id", patch(decide_booking))
        // Query endpoints (Read operations)
        .route("/bookings", get(list_bookings))
        .route("/bookings/:id", get(get_booking))
        .route("/owners/bookings", get(list_owner_bookings))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
