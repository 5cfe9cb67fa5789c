use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    Extension,
};
use serde::Deserialize;
use validator::Validate;

use crate::app::AppState;
use crate::service::user_service::{NewUser, UserService};
use crate::util::error::HandlerError;
use crate::util::jwt::Claims;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 10))]
    pub refresh_token: String,
}

// Register
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    // The admin flag never comes from the request body
    let new_user = NewUser {
        username: payload.username,
        email: payload.email,
        is_admin: false,
    };
    let res = state
        .user_service
        .register(new_user, payload.password)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok((StatusCode::CREATED, Json(res)))
}

// Login
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let res = state
        .user_service
        .login(payload.email, payload.password)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(res))
}

// Refresh Token
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    if let Err(e) = payload.validate() {
        return Err(HandlerError::bad_request(format!("Validation error: {}", e)));
    }
    let res = state
        .user_service
        .refresh_token(payload.refresh_token)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(res))
}

// Current user's public profile
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = state
        .user_service
        .get_public_profile(&claims.sub)
        .await
        .map_err(|e| HandlerError::from_service(e, !state.config.is_production()))?;
    Ok(Json(profile))
}
