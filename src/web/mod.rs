pub mod action_items;
pub mod admin;
pub mod auth;
pub mod employees;
pub mod meetings;
pub mod session;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(auth::me).with_state(state.clone()))
        .nest("/auth", auth::router(state.clone()))
        .nest("/employees", employees::router(state.clone()))
        .nest("/meetings", meetings::router(state.clone()))
        .nest("/action-items", action_items::router(state.clone()))
        .nest("/admin", admin::router(state))
}
