#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use comiclens::config::Config;
use comiclens::db::DbActorHandle;
use comiclens::server::router::{ComicLensState, comiclens_router};
use serde_json::Value;
use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub fn unique_sqlite_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut temp_path = std::env::temp_dir();
    temp_path.push(format!(
        "comiclens-{prefix}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    temp_path
}

pub async fn spawn_db(prefix: &str) -> (DbActorHandle, PathBuf) {
    let path = unique_sqlite_path(prefix);
    let database_url = format!("sqlite:{}", path.display());
    (comiclens::db::spawn(&database_url).await, path)
}

pub async fn cleanup_db(db: DbActorHandle, path: &Path) {
    let _ = db.stop().await;
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}

pub async fn spawn_test_server(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let base = Url::parse(&format!("http://{addr}")).expect("valid base url");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server run");
    });

    base
}

/// Drives one request through the router. Empty bodies come back as `Value::Null`.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header("content-type", "application/json");
    }
    let req = builder
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .expect("failed to build request");

    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

pub fn test_config(xkcd_base: Option<&Url>, vision_url: Option<&Url>) -> Config {
    let mut cfg = Config::default();
    cfg.upstream.defaults.connect_timeout_secs = 2;
    cfg.upstream.defaults.request_timeout_secs = 5;
    if let Some(base) = xkcd_base {
        cfg.upstream.xkcd.base_url = base.clone();
    }
    if let Some(url) = vision_url {
        cfg.upstream.vision.api_url = url.clone();
    }
    cfg
}

pub fn build_app(db: DbActorHandle, cfg: &Config) -> Router {
    let state = ComicLensState::new(db, cfg).expect("build state");
    comiclens_router(state)
}
