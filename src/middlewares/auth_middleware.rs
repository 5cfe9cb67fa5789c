use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::util::error::HandlerError;
use crate::util::jwt::{Claims, JwtTokenUtils, JwtTokenUtilsImpl};

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

/// Bearer-token extraction and verification shared by both middleware
/// variants. Every failure mode reads the same to the caller: 401.
fn authenticate(state: &AuthState, headers: &HeaderMap) -> Result<Claims, HandlerError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            HandlerError::unauthorized("No authentication token, access denied")
        })?;

    let token = state
        .jwt_utils
        .extract_token_from_header(auth_header)
        .map_err(|_| HandlerError::unauthorized("No authentication token, access denied"))?;

    state
        .jwt_utils
        .validate_access_token(&token)
        .map_err(|_| {
            HandlerError::unauthorized("Token verification failed, authorization denied")
        })
}

/// Any valid token passes; decoded claims are attached for the handler.
pub async fn auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let claims = authenticate(&state, req.headers())?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Same extraction and verification, then the admin claim is required.
pub async fn admin_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let claims = authenticate(&state, req.headers())?;

    if !claims.is_admin {
        return Err(HandlerError::forbidden("Admin access required"));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
