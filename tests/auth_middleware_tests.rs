use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Extension, Router,
};
use std::sync::Arc;
use tower::ServiceExt;

use galerya_backend::config::JwtConfig;
use galerya_backend::middlewares::auth_middleware::{admin_auth, auth, AuthState};
use galerya_backend::util::jwt::{Claims, JwtTokenUtils, JwtTokenUtilsImpl};

fn jwt_utils() -> Arc<JwtTokenUtilsImpl> {
    Arc::new(JwtTokenUtilsImpl::new(JwtConfig::from_test_env()))
}

async fn whoami(Extension(claims): Extension<Claims>) -> String {
    claims.sub
}

/// A protected route behind each middleware variant, with no database in
/// sight: the middleware trusts claims alone.
fn test_app(jwt: Arc<JwtTokenUtilsImpl>) -> Router {
    let auth_state = Arc::new(AuthState {
        jwt_utils: jwt.clone(),
    });
    let protected = Router::new()
        .route("/protected", get(whoami))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), auth));
    let admin = Router::new()
        .route("/admin-only", get(whoami))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));
    protected.merge(admin)
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthenticated() {
    let app = test_app(jwt_utils());
    let resp = app.oneshot(get_request("/protected", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["message"].as_str().unwrap().contains("No authentication token"));
}

#[tokio::test]
async fn test_garbage_token_is_unauthenticated() {
    let app = test_app(jwt_utils());
    let resp = app
        .oneshot(get_request("/protected", Some("garbage.token.value")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_unauthenticated() {
    let mut config = JwtConfig::from_test_env();
    config.access_token_expiration = -10;
    let expired_jwt = JwtTokenUtilsImpl::new(config);
    let token = expired_jwt
        .generate_access_token("64f1c0ffee0123456789abcd", "ayu", false)
        .unwrap();

    // The app validates with the same secret but the token is expired
    let app = test_app(jwt_utils());
    let resp = app
        .oneshot(get_request("/protected", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_valid_token_passes_and_attaches_claims() {
    let jwt = jwt_utils();
    let token = jwt
        .generate_access_token("64f1c0ffee0123456789abcd", "ayu", false)
        .unwrap();

    let app = test_app(jwt);
    let resp = app
        .oneshot(get_request("/protected", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    assert_eq!(&body[..], b"64f1c0ffee0123456789abcd");
}

#[tokio::test]
async fn test_non_admin_token_is_forbidden_on_admin_route() {
    let jwt = jwt_utils();
    let token = jwt
        .generate_access_token("64f1c0ffee0123456789abcd", "ayu", false)
        .unwrap();

    let app = test_app(jwt);
    let resp = app
        .oneshot(get_request("/admin-only", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["message"], "Admin access required");
}

#[tokio::test]
async fn test_admin_token_passes_admin_route() {
    let jwt = jwt_utils();
    let token = jwt
        .generate_access_token("64f1c0ffee0123456789dcba", "site-admin", true)
        .unwrap();

    let app = test_app(jwt);
    let resp = app
        .oneshot(get_request("/admin-only", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_token_on_admin_route_is_unauthenticated_not_forbidden() {
    let app = test_app(jwt_utils());
    let resp = app.oneshot(get_request("/admin-only", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_rejected_on_protected_route() {
    let jwt = jwt_utils();
    let token = jwt
        .generate_refresh_token("64f1c0ffee0123456789abcd", "ayu", false)
        .unwrap();

    let app = test_app(jwt);
    let resp = app
        .oneshot(get_request("/protected", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
