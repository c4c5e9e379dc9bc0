use axum::{
    body::{to_bytes, Body},
    extract::FromRef,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

use thinkcate::auth::extractors::AuthUser;
use thinkcate::auth::jwt::JwtKeys;
use thinkcate::state::AppState;

/// A gated echo handler: reaching it proves the gate let the request
/// through, and the body shows which identity was attached.
async fn whoami(AuthUser { user_id, email }: AuthUser) -> Json<JsonValue> {
    Json(json!({ "userId": user_id, "email": email }))
}

fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .with_state(state)
}

async fn body_json(resp: axum::response::Response) -> JsonValue {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn missing_authorization_header_is_rejected() {
    let app = test_app(AppState::fake());
    let resp = app
        .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Authorization"));
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected() {
    let app = test_app(AppState::fake());
    let resp = app
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", "Basic dXNlcjpwdw==")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_token_is_rejected_with_generic_message() {
    let app = test_app(AppState::fake());
    let resp = app
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", "Bearer definitely.not.ajwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    // No signature/expiry detail leaks to the caller.
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let state = AppState::fake();
    let keys = JwtKeys::from_ref(&state);
    let forged = JwtKeys {
        encoding: jsonwebtoken::EncodingKey::from_secret(b"other-secret"),
        decoding: jsonwebtoken::DecodingKey::from_secret(b"other-secret"),
        issuer: keys.issuer.clone(),
        audience: keys.audience.clone(),
        ttl: keys.ttl,
    };
    let token = forged.sign(1, "a@x.com").unwrap();

    let app = test_app(state);
    let resp = app
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_attaches_identity() {
    let state = AppState::fake();
    let token = JwtKeys::from_ref(&state).sign(42, "a@x.com").unwrap();

    let app = test_app(state);
    let resp = app
        .oneshot(
            Request::get("/whoami")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["userId"], 42);
    assert_eq!(body["email"], "a@x.com");
}

#[test]
fn identity_is_loggable() {
    let user = AuthUser {
        user_id: 7,
        email: "a@x.com".into(),
    };
    let rendered = format!("{user:?}");
    assert!(rendered.contains('7'));
    assert!(rendered.contains("a@x.com"));
}

#[tokio::test]
async fn filter_routes_are_registered_and_gated() {
    let paths = [
        "/calendar/recurring",
        "/calendar/type/task",
        "/notifications/priority/urgent",
        "/notifications/type/in_app",
        "/notifications/module/notes",
    ];
    for path in paths {
        let app = thinkcate::app::build_app(AppState::fake());
        let resp = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        // Unauthorized, not 404: the route exists and sits behind the gate.
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
async fn health_endpoint_is_not_gated() {
    let app = thinkcate::app::build_app(AppState::fake());
    let resp = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
