use axum::{middleware, routing::{get, post}, Router};
use std::sync::Arc;

use crate::app::AppState;
use crate::handler::user_handler::{
    login_handler, me_handler, refresh_token_handler, register_handler,
};
use crate::middlewares::auth_middleware::{auth, AuthState};

pub fn user_router(state: AppState, auth_state: Arc<AuthState>) -> Router {
    // Public auth routes
    let public = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/refresh", post(refresh_token_handler));

    // Authenticated profile route
    let authenticated = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, auth));

    public.merge(authenticated).with_state(state)
}
