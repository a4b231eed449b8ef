use crate::interface_adapters::handlers::{get_state, register, send_command};
use crate::interface_adapters::state::AppState;
use axum::{Router, routing::post};
use std::sync::Arc;

// Build the HTTP router for the sync endpoints.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/command", post(send_command))
        .route("/state", post(get_state))
        .with_state(state)
}
