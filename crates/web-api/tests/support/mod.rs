#![allow(dead_code)]

use std::sync::Arc;

use application::{
    InMemoryStore, NotifyPolicy, PostService, PostServiceDependencies, SystemClock, UserService,
    UserServiceDependencies,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use infrastructure::{BcryptPasswordHasher, LocalLikeBroadcaster};
use serde_json::{json, Value};
use tower::ServiceExt;
use web_api::{router, AppState, JwtConfig, JwtService};

/// Router over the in-memory store with a cheap bcrypt cost.
pub fn build_router() -> Router {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(SystemClock);
    let broadcaster = Arc::new(LocalLikeBroadcaster::new(64));

    let user_service = Arc::new(UserService::new(UserServiceDependencies {
        user_repository: store.clone(),
        password_hasher: Arc::new(BcryptPasswordHasher::new(4)),
        clock: clock.clone(),
    }));
    let post_service = Arc::new(PostService::new(PostServiceDependencies {
        post_repository: store.clone(),
        like_repository: store.clone(),
        user_repository: store,
        clock,
        broadcaster: broadcaster.clone(),
        notify_policy: NotifyPolicy::BestEffort,
    }));
    let jwt_service = Arc::new(JwtService::new(JwtConfig {
        secret: "integration-test-secret-with-32-characters".to_string(),
        expiration_hours: 1,
    }));

    router(AppState::new(
        user_service,
        post_service,
        broadcaster,
        jwt_service,
    ))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => request.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Registers `alias` and returns `(user id, access token)`.
pub async fn register(app: &Router, alias: &str) -> (i64, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "email": format!("{alias}@example.com"),
            "password": "123456",
            "firstName": "Ana",
            "lastName": "Martínez",
            "alias": alias,
            "birthDate": "1995-03-18"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {alias}: {body}");
    assert_eq!(body["user"]["birthDate"], "1995-03-18");

    let id = body["user"]["id"].as_i64().expect("user id");
    let token = body["access_token"].as_str().expect("token").to_string();
    (id, token)
}

pub async fn create_post(app: &Router, token: &str, content: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/posts",
        Some(token),
        Some(json!({ "content": content })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create post: {body}");
    body["id"].as_i64().expect("post id")
}
