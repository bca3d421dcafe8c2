use crate::config::{Config, VisionResolvedConfig, XkcdResolvedConfig};
use crate::db::DbActorHandle;
use crate::error::ComicLensError;
use crate::server::routes::{comics, explanation, users};
use crate::upstream::{ClientOptions, build_client};

use axum::{
    Router,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

/// Everything a handler needs: the store handle, one HTTP client per upstream,
/// and the resolved upstream settings.
#[derive(Clone)]
pub struct ComicLensState {
    pub db: DbActorHandle,
    pub xkcd_client: reqwest::Client,
    pub vision_client: reqwest::Client,
    pub xkcd_cfg: Arc<XkcdResolvedConfig>,
    pub vision_cfg: Arc<VisionResolvedConfig>,
}

impl ComicLensState {
    pub fn new(db: DbActorHandle, cfg: &Config) -> Result<Self, ComicLensError> {
        let xkcd_cfg = Arc::new(cfg.xkcd());
        let vision_cfg = Arc::new(cfg.vision());

        info!(
            xkcd_base_url = %xkcd_cfg.base_url,
            xkcd_proxy = %xkcd_cfg.proxy.as_ref().map_or("<none>", |u| u.as_str()),
            xkcd_request_timeout_secs = xkcd_cfg.request_timeout.as_secs(),
            "xkcd upstream config (effective)"
        );
        info!(
            vision_api_url = %vision_cfg.api_url,
            vision_api_key_set = vision_cfg.api_key.is_some(),
            vision_proxy = %vision_cfg.proxy.as_ref().map_or("<none>", |u| u.as_str()),
            vision_request_timeout_secs = vision_cfg.request_timeout.as_secs(),
            "Vision upstream config (effective)"
        );

        let xkcd_client = build_client(&ClientOptions {
            proxy: xkcd_cfg.proxy.as_ref(),
            enable_multiplexing: xkcd_cfg.enable_multiplexing,
            connect_timeout: xkcd_cfg.connect_timeout,
            request_timeout: xkcd_cfg.request_timeout,
        })?;
        let vision_client = build_client(&ClientOptions {
            proxy: vision_cfg.proxy.as_ref(),
            enable_multiplexing: vision_cfg.enable_multiplexing,
            connect_timeout: vision_cfg.connect_timeout,
            request_timeout: vision_cfg.request_timeout,
        })?;

        Ok(Self {
            db,
            xkcd_client,
            vision_client,
            xkcd_cfg,
            vision_cfg,
        })
    }
}

async fn not_found_handler() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn access_log(req: Request, next: Next) -> Response {
    // Capture request metadata before moving `req` into the handler stack.
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(generate_request_id, str::to_string);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    // Always reflect `x-request-id` for easier correlation, even if the client didn't send one.
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = start.elapsed().as_millis();
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn comiclens_router(state: ComicLensState) -> Router {
    Router::new()
        .merge(users::router())
        .merge(comics::router())
        .merge(explanation::router())
        .fallback(not_found_handler)
        .with_state(state)
        .layer(middleware::from_fn(access_log))
}
