use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::{middleware, routing::get, Router};
use salonsync_firestore::{require_operator, routes, AuthFailure, OperatorGuard, UserAuthClient};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_body() -> Value {
    json!({
        "localId": "uid-1",
        "email": "owner@salon.hu",
        "idToken": "id-token",
        "refreshToken": "refresh-token",
        "expiresIn": "3600"
    })
}

#[tokio::test]
async fn test_sign_in_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "web-key"))
        .and(body_partial_json(json!({ "email": "owner@salon.hu", "returnSecureToken": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = UserAuthClient::new(&server.uri(), "web-key");
    let session = client.sign_in("owner@salon.hu", "secret1").await.unwrap();
    assert_eq!(session.local_id, "uid-1");
}

#[tokio::test]
async fn test_sign_up_email_exists() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signUp"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "EMAIL_EXISTS" }
        })))
        .mount(&server)
        .await;

    let client = UserAuthClient::new(&server.uri(), "web-key");
    let err = client.sign_up("owner@salon.hu", "secret1").await.unwrap_err();
    assert_eq!(err, AuthFailure::EmailInUse);
    assert_eq!(err.to_string(), "Ez az email már regisztrálva van.");
}

#[tokio::test]
async fn test_sign_in_route_maps_wrong_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_LOGIN_CREDENTIALS" }
        })))
        .mount(&server)
        .await;

    let app = routes(Arc::new(UserAuthClient::new(&server.uri(), "web-key")));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/sign-in")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "email": "owner@salon.hu", "password": "nope" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Hibás email vagy jelszó."));
}

async fn mount_lookup(server: &MockServer, token: &str, uid: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .and(body_partial_json(json!({ "idToken": token })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": uid, "email": "owner@salon.hu" }]
        })))
        .mount(server)
        .await;
}

fn guarded(server: &MockServer) -> Router {
    let client = Arc::new(UserAuthClient::new(&server.uri(), "web-key"));
    let guard = Arc::new(OperatorGuard::new(client, "owner"));
    Router::new()
        .route("/settings", get(|| async { "ok" }))
        .route_layer(middleware::from_fn_with_state(guard, require_operator))
}

async fn status_for(app: Router, request: Request<Body>) -> StatusCode {
    app.oneshot(request).await.unwrap().status()
}

fn settings_request(auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri("/settings");
    if let Some(value) = auth {
        builder = builder.header("authorization", value);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_verify_id_token() {
    let server = MockServer::start().await;
    mount_lookup(&server, "owner-token", "owner").await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "INVALID_ID_TOKEN" }
        })))
        .mount(&server)
        .await;

    let client = UserAuthClient::new(&server.uri(), "web-key");
    let user = client.verify_id_token("owner-token").await.unwrap();
    assert_eq!(user.local_id, "owner");
    assert_eq!(
        client.verify_id_token("stale").await.unwrap_err(),
        AuthFailure::SessionExpired
    );
}

#[tokio::test]
async fn test_guard_rejects_missing_and_foreign_tokens() {
    let server = MockServer::start().await;
    mount_lookup(&server, "other-token", "someone-else").await;

    let app = guarded(&server);
    assert_eq!(
        status_for(app.clone(), settings_request(None)).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_for(app.clone(), settings_request(Some("Basic abc"))).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        status_for(app, settings_request(Some("Bearer other-token"))).await,
        StatusCode::FORBIDDEN
    );
}

#[tokio::test]
async fn test_guard_admits_owner_and_caches_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:lookup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "localId": "owner" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = guarded(&server);
    assert_eq!(
        status_for(app.clone(), settings_request(Some("Bearer owner-token"))).await,
        StatusCode::OK
    );
    // Query parameter form used by the voice WebSocket
    let request = Request::builder()
        .uri("/settings?access_token=owner-token")
        .body(Body::empty())
        .unwrap();
    assert_eq!(status_for(app, request).await, StatusCode::OK);
}
