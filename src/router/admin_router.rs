use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::app::AppState;
use crate::handler::admin_handler::admin_me_handler;
use crate::middlewares::auth_middleware::{admin_auth, AuthState};

pub fn admin_router(state: AppState, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/admin/me", get(admin_me_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth))
        .with_state(state)
}
