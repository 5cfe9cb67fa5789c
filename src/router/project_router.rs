use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;
use crate::handler::project_handler::{
    create_project_handler, delete_project_handler, get_project_handler, list_projects_handler,
    toggle_featured_handler, update_project_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, auth, AuthState};
use crate::util::storage::MAX_UPLOAD_BYTES;

pub fn project_router(state: AppState, auth_state: Arc<AuthState>) -> Router {
    // Public routes
    let public = Router::new()
        .route("/api/projects", get(list_projects_handler))
        .route("/api/projects/{id}", get(get_project_handler));

    // Authenticated routes; ownership is enforced in the service layer.
    // Body limit: upload ceiling plus form-field headroom.
    let authenticated = Router::new()
        .route("/api/projects", post(create_project_handler))
        .route("/api/projects/{id}", patch(update_project_handler))
        .route("/api/projects/{id}", delete(delete_project_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), auth))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024));

    // Admin-protected routes
    let admin = Router::new()
        .route("/api/projects/{id}/featured", post(toggle_featured_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    public.merge(authenticated).merge(admin).with_state(state)
}
