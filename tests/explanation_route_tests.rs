mod common;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
}

#[derive(Clone)]
struct MockVision {
    status: StatusCode,
    request_id: Option<&'static str>,
    reply: Value,
    captured: Captured,
}

async fn analyze(
    State(mock): State<MockVision>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    mock.captured.bodies.lock().expect("lock").push(body);
    mock.captured.auth.lock().expect("lock").push(
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    );

    let mut resp = (mock.status, Json(mock.reply.clone())).into_response();
    if let Some(id) = mock.request_id {
        resp.headers_mut()
            .insert("x-request-id", id.parse().expect("header value"));
    }
    resp
}

async fn spawn_mock_vision(
    status: StatusCode,
    request_id: Option<&'static str>,
    reply: Value,
) -> (url::Url, Captured) {
    let captured = Captured::default();
    let mock = MockVision {
        status,
        request_id,
        reply,
        captured: captured.clone(),
    };
    let app = Router::new()
        .route("/analyze", post(analyze))
        .with_state(mock);
    let base = common::spawn_test_server(app).await;
    (base.join("/analyze").expect("analyze url"), captured)
}

const REQUEST: &str =
    r#"{"comic_id":"927","comic_url":"https://imgs.xkcd.com/comics/standards.png"}"#;

#[tokio::test]
async fn explanation_is_returned_and_logged() {
    let (db, path) = common::spawn_db("explain-ok").await;
    let (api_url, captured) = spawn_mock_vision(
        StatusCode::OK,
        Some("abc"),
        json!({ "explanation": "x", "additional_info": "y", "model": "ignored" }),
    )
    .await;
    let mut cfg = common::test_config(None, Some(&api_url));
    cfg.upstream.vision.api_key = Some("sk-test".to_string());
    let app = common::build_app(db.clone(), &cfg);

    let (status, body) =
        common::send_json(&app, Method::POST, "/explanation/request", Some(REQUEST)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "comic_id": "927", "explanation": "x", "additional_info": "y" })
    );

    assert_eq!(
        *captured.bodies.lock().expect("lock"),
        vec![json!({ "image_url": "https://imgs.xkcd.com/comics/standards.png" })]
    );
    assert_eq!(
        *captured.auth.lock().expect("lock"),
        vec![Some("Bearer sk-test".to_string())]
    );

    let rows = db.list_explanations("927").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].request_id, "abc");
    assert_eq!(rows[0].response, "x");

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn missing_explanation_uses_placeholder() {
    let (db, path) = common::spawn_db("explain-placeholder").await;
    let (api_url, captured) =
        spawn_mock_vision(StatusCode::OK, Some("req-7"), json!({})).await;
    let app = common::build_app(db.clone(), &common::test_config(None, Some(&api_url)));

    let (status, body) =
        common::send_json(&app, Method::POST, "/explanation/request", Some(REQUEST)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "comic_id": "927", "explanation": "Explanation unavailable." })
    );
    // No key configured, no Authorization header.
    assert_eq!(*captured.auth.lock().expect("lock"), vec![None]);

    let rows = db.list_explanations("927").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].request_id, "req-7");
    assert_eq!(rows[0].response, "Explanation unavailable.");

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn upstream_error_status_writes_nothing() {
    let (db, path) = common::spawn_db("explain-500").await;
    let (api_url, _) = spawn_mock_vision(
        StatusCode::INTERNAL_SERVER_ERROR,
        Some("abc"),
        json!({ "error": "boom" }),
    )
    .await;
    let app = common::build_app(db.clone(), &common::test_config(None, Some(&api_url)));

    let (status, body) =
        common::send_json(&app, Method::POST, "/explanation/request", Some(REQUEST)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    assert!(db.list_explanations("927").await.unwrap().is_empty());

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn missing_request_id_header_writes_nothing() {
    let (db, path) = common::spawn_db("explain-noheader").await;
    let (api_url, _) =
        spawn_mock_vision(StatusCode::OK, None, json!({ "explanation": "x" })).await;
    let app = common::build_app(db.clone(), &common::test_config(None, Some(&api_url)));

    let (status, body) =
        common::send_json(&app, Method::POST, "/explanation/request", Some(REQUEST)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Upstream response missing header: x-request-id" })
    );
    assert!(db.list_explanations("927").await.unwrap().is_empty());

    common::cleanup_db(db, &path).await;
}

#[tokio::test]
async fn query_parameter_form_is_accepted() {
    let (db, path) = common::spawn_db("explain-query").await;
    let (api_url, captured) =
        spawn_mock_vision(StatusCode::OK, Some("q-1"), json!({ "explanation": "x" })).await;
    let app = common::build_app(db.clone(), &common::test_config(None, Some(&api_url)));

    let (status, body) = common::send_json(
        &app,
        Method::POST,
        "/explanation/request?comic_id=927&comic_url=https%3A%2F%2Fimgs.xkcd.com%2Fcomics%2Fstandards.png",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "comic_id": "927", "explanation": "x" }));
    assert_eq!(
        *captured.bodies.lock().expect("lock"),
        vec![json!({ "image_url": "https://imgs.xkcd.com/comics/standards.png" })]
    );

    let rows = db.list_explanations("927").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].request_id, "q-1");

    common::cleanup_db(db, &path).await;
}
