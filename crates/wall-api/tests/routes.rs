use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use wall_api::{AppState, AppStateInner, router};
use wall_db::{Database, StoreOptions, migrations};
use wall_types::models::PALETTE;

fn state_with(options: StoreOptions) -> AppState {
    AppStateInner::new(Database::open_in_memory(&migrations::embedded(), options).unwrap())
}

fn state() -> AppState {
    state_with(StoreOptions::default())
}

fn get(uri: &str, from: &str) -> Request<Body> {
    let addr: SocketAddr = from.parse().unwrap();
    let mut req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

fn post_entry(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/entry")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(app, req).await;
    (status, serde_json::from_str(&body).unwrap())
}

#[tokio::test]
async fn create_entry_returns_stored_entry() {
    let app = router(state());

    let (status, body) = send_json(
        &app,
        post_entry(json!({"name": "ann", "message": "hello wall", "color": "#abcdef"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "ann", "message": "hello wall", "color": "#abcdef"})
    );
}

#[tokio::test]
async fn create_entry_truncates_long_fields() {
    let app = router(state());
    let name = "n".repeat(30);
    let message = "m".repeat(90);

    let (status, body) = send_json(
        &app,
        post_entry(json!({"name": name, "message": message, "color": "#fff"}).to_string()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "n".repeat(15));
    assert_eq!(body["message"], "m".repeat(40));
}

#[tokio::test]
async fn create_entry_rejects_missing_message_or_color() {
    let state = state();
    let app = router(state.clone());

    for payload in [
        json!({"name": "a", "color": "#fff"}),
        json!({"name": "a", "message": "", "color": "#fff"}),
        json!({"name": "a", "message": "hi"}),
        json!({"name": "a", "message": "hi", "color": ""}),
    ] {
        let (status, body) = send(&app, post_entry(payload.to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload {payload}");
        assert_eq!(body, "message and color required");
    }

    assert!(state.db.list_entries().unwrap().is_empty());
}

#[tokio::test]
async fn create_entry_accepts_json_without_content_type() {
    let app = router(state());
    let req = Request::builder()
        .method("POST")
        .uri("/api/entry")
        .body(Body::from(r##"{"message":"hi","color":"#fff"}"##))
        .unwrap();

    let (status, body) = send_json(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"id": 1, "name": "", "message": "hi", "color": "#fff"}));
}

#[tokio::test]
async fn create_entry_rejects_empty_body() {
    let app = router(state());
    let (status, body) = send(&app, post_entry(Body::empty())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "invalid json");
}

#[tokio::test]
async fn create_entry_rejects_malformed_json() {
    let state = state();
    let app = router(state.clone());

    let (status, body) = send(&app, post_entry("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "invalid json");

    let (status, _) = send(&app, post_entry(r##"{"message": 5, "color": "#fff"}"##)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(state.db.list_entries().unwrap().is_empty());
}

#[tokio::test]
async fn create_entry_reports_store_failure() {
    let state = state();
    state
        .db
        .with_conn_mut(|conn| {
            conn.execute_batch("DROP TABLE guestbook_entries;")?;
            Ok(())
        })
        .unwrap();
    let app = router(state);

    let (status, body) = send(
        &app,
        post_entry(json!({"message": "hi", "color": "#fff"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "db error");
}

#[tokio::test]
async fn wall_registers_visitor_once_per_host() {
    let state = state();
    let app = router(state.clone());

    let (_, first) = send_json(&app, get("/api/wall", "127.0.0.1:5000")).await;
    let (_, again) = send_json(&app, get("/api/wall", "127.0.0.1:6000")).await;

    assert_eq!(first["visitor_number"], again["visitor_number"]);
    assert_eq!(first["visitor_color"], again["visitor_color"]);
    assert_eq!(again["total_visitors"], 1);
    let color = first["visitor_color"].as_str().unwrap();
    assert!(PALETTE.contains(&color));

    let (_, other) = send_json(&app, get("/api/wall", "10.0.0.9:5000")).await;
    assert_eq!(other["total_visitors"], 2);
    assert_ne!(other["visitor_number"], first["visitor_number"]);

    let visitor = state.db.get_visitor("3132372e302e302e31").unwrap().unwrap();
    assert_eq!(json!(visitor.id), first["visitor_number"]);
}

#[tokio::test]
async fn wall_lists_entries_newest_first_with_tiles() {
    let app = router(state());

    for (message, color) in [("one", "#111111"), ("two", "#222222"), ("three", "#111111")] {
        let (status, _) = send(
            &app,
            post_entry(json!({"message": message, "color": color}).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, wall) = send_json(&app, get("/api/wall", "127.0.0.1:5000")).await;
    assert_eq!(status, StatusCode::OK);

    let messages: Vec<&str> = wall["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["three", "two", "one"]);
    assert_eq!(wall["tile_colors"], json!(["#111111", "#222222"]));
}

#[tokio::test]
async fn wall_page_renders_html() {
    let app = router(state());
    send(
        &app,
        post_entry(json!({"name": "<b>", "message": "hi there", "color": "#abcdef"}).to_string()),
    )
    .await;

    let res = app.clone().oneshot(get("/", "127.0.0.1:5000")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("You are visitor #1"));
    assert!(html.contains("hi there"));
    assert!(html.contains("&lt;b&gt;"));
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let app = router(state());
    let (status, _) = send(&app, get("/nope", "127.0.0.1:5000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn wall_read_failure_is_500_unless_degrading() {
    let drop_entries = |state: &AppState| {
        state
            .db
            .with_conn_mut(|conn| {
                conn.execute_batch("DROP TABLE guestbook_entries;")?;
                Ok(())
            })
            .unwrap();
    };

    let strict = state();
    drop_entries(&strict);
    let (status, _) = send(&router(strict), get("/api/wall", "127.0.0.1:1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let lenient = state_with(StoreOptions {
        degrade_on_read_error: true,
        ..StoreOptions::default()
    });
    drop_entries(&lenient);
    let (status, wall) = send_json(&router(lenient), get("/api/wall", "127.0.0.1:1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wall["entries"], json!([]));
    assert_eq!(wall["total_visitors"], 1);
}

#[tokio::test]
async fn health_is_ok() {
    let app = router(state());
    let (status, body) = send(&app, get("/health", "127.0.0.1:1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}
