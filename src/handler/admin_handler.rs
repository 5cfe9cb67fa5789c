use axum::{extract::State, response::IntoResponse, Extension, Json};

use crate::app::AppState;
use crate::service::admin_service::AdminService;
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

// The Admin record for the requesting admin; 404 when none exists.
pub async fn admin_me_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = state
        .admin_service
        .get_admin_profile(&claims.sub)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(profile))
}
