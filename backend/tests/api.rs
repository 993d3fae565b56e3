use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use devconnect::{
    create_router,
    db::MemoryStore,
    utils::{Config, SentFilter},
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

fn app_with(config: Config) -> Router {
    create_router(AppState::new(Arc::new(MemoryStore::new()), config))
}

fn app() -> Router {
    app_with(Config::default())
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    caller: Option<Uuid>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-user-id", caller.to_string());
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn signup(app: &Router, user_name: &str) -> Uuid {
    let (status, body) = call(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({
            "user_name": user_name,
            "full_name": format!("{user_name} Dev"),
            "bio": "Tester",
            "skills": ["Go", "Docker", "Postgres"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["id"].as_str().unwrap().parse().unwrap()
}

async fn send(app: &Router, from: Uuid, status: &str, to: Uuid) -> (StatusCode, Value) {
    call(app, Method::POST, &format!("/reqs/send/{status}/{to}"), Some(from), None).await
}

async fn review(app: &Router, actor: Uuid, status: &str, req_id: &str) -> (StatusCode, Value) {
    call(app, Method::PATCH, &format!("/reqs/review/{status}/{req_id}"), Some(actor), None).await
}

fn feed_ids(body: &Value) -> Vec<String> {
    body["feed_data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn alice_and_bob_connect() {
    let app = app();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (status, body) = send(&app, alice, "interested", bob).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("successfully"));

    let (status, body) = send(&app, alice, "interested", bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    let (status, body) = call(&app, Method::GET, "/user/reqs/received", Some(bob), None).await;
    assert_eq!(status, StatusCode::OK);
    let reqs = body["reqs"].as_array().unwrap();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0]["sender_id"], alice.to_string());
    assert_eq!(reqs[0]["sender"]["user_name"], "alice");
    let req_id = reqs[0]["id"].as_str().unwrap().to_string();

    let (status, body) = review(&app, bob, "accepted", &req_id).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("accepted"));

    for user in [alice, bob] {
        let (status, body) = call(&app, Method::GET, "/user/connections", Some(user), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["connections"].as_array().unwrap().len(), 1);
    }

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/user/connections/{bob}"),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected"], true);
}

#[tokio::test]
async fn feed_hides_requested_users() {
    let app = app();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let carol = signup(&app, "carol").await;

    send(&app, alice, "interested", bob).await;

    let (status, body) = call(&app, Method::GET, "/feed", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let ids = feed_ids(&body);
    assert!(ids.contains(&carol.to_string()));
    assert!(!ids.contains(&bob.to_string()));
    assert!(!ids.contains(&alice.to_string()));
}

#[tokio::test]
async fn feed_paging_parameters() {
    let app = app();
    let viewer = signup(&app, "viewer").await;
    for i in 0..5 {
        signup(&app, &format!("dev{i}")).await;
    }

    let (_, first) = call(&app, Method::GET, "/feed?page=1&limit=2", Some(viewer), None).await;
    let (_, second) = call(&app, Method::GET, "/feed?page=2&limit=2", Some(viewer), None).await;
    let (_, all) = call(&app, Method::GET, "/feed?limit=50", Some(viewer), None).await;

    assert_eq!(first["limit"], 2);
    let mut paged = feed_ids(&first);
    paged.extend(feed_ids(&second));
    assert_eq!(paged, feed_ids(&all)[..4].to_vec());
}

#[tokio::test]
async fn unauthenticated_calls_are_rejected() {
    let app = app();
    let bob = signup(&app, "bob").await;

    let (status, body) = call(&app, Method::POST, &format!("/reqs/send/interested/{bob}"), None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    for uri in ["/feed", "/user/reqs/received", "/user/reqs/sent", "/user/connections"] {
        let (status, _) = call(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }

    // A well-formed id that names nobody is no better than no id.
    let (status, _) = call(&app, Method::GET, "/feed", Some(Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn send_validation_failures() {
    let app = app();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (status, body) = send(&app, alice, "maybe", bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid status"));

    let (status, body) = send(&app, alice, "accepted", bob).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_status");

    let (status, body) = send(&app, alice, "interested", alice).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_operation");
    assert!(body["message"].as_str().unwrap().contains("yourself"));

    let (status, body) = send(&app, alice, "interested", Uuid::new_v4()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "not_found");

    let (status, _) = send(&app, alice, "ignore", bob).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn review_rules() {
    let app = app();
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;

    let (_, body) = send(&app, alice, "interested", bob).await;
    let req_id = body["req"]["id"].as_str().unwrap().to_string();

    let (status, body) = review(&app, bob, "maybe", &req_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Invalid status"));

    let (status, body) = review(&app, alice, "accepted", &req_id).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, body) = review(&app, alice, "withdraw", &req_id).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("withdrawn"));

    let (status, body) = review(&app, bob, "accepted", &req_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_transition");

    let (status, body) = review(&app, bob, "accepted", &Uuid::new_v4().to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("Req not found"));
}

#[tokio::test]
async fn empty_inbox_is_success_and_no_connections_is_404() {
    let app = app();
    let loner = signup(&app, "loner").await;

    let (status, body) = call(&app, Method::GET, "/user/reqs/received", Some(loner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reqs"].as_array().unwrap().len(), 0);

    let (status, body) = call(&app, Method::GET, "/user/connections", Some(loner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("No connections"));
}

#[tokio::test]
async fn sent_history_filter_is_configurable() {
    let config = Config {
        sent_filter: SentFilter::Pending,
        ..Config::default()
    };
    let app = app_with(config);
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let carol = signup(&app, "carol").await;

    let (_, body) = send(&app, alice, "interested", bob).await;
    let req_id = body["req"]["id"].as_str().unwrap().to_string();
    review(&app, bob, "rejected", &req_id).await;
    send(&app, alice, "interested", carol).await;

    let (status, body) = call(&app, Method::GET, "/user/reqs/sent", Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let reqs = body["reqs"].as_array().unwrap();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0]["receiver"]["user_name"], "carol");
}

#[tokio::test]
async fn directory_lookup_and_duplicate_signup() {
    let app = app();
    let alice = signup(&app, "alice").await;

    let (status, body) = call(&app, Method::GET, &format!("/users/{alice}"), Some(alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_name"], "alice");

    let (status, _) = call(
        &app,
        Method::GET,
        &format!("/users/{}", Uuid::new_v4()),
        Some(alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = call(
        &app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "user_name": "alice", "full_name": "Other Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn health_check_responds() {
    let app = app();
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
