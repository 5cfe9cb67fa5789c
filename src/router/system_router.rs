use axum::{routing::get, Router};

use crate::app::AppState;
use crate::handler::system_handler::{health_handler, root_handler};

pub fn system_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .with_state(state)
}
