//! Outbound HTTP clients: the comic source and the vision-explanation API.

pub mod vision;
pub mod xkcd;

pub use vision::{VisionClient, VisionReply};
pub use xkcd::XkcdClient;

use reqwest::header::{CONNECTION, HeaderMap, HeaderValue};
use std::time::Duration;
use url::Url;

use crate::error::ComicLensError;

/// How much of a failed upstream body ends up in debug logs.
pub const UPSTREAM_BODY_PREVIEW_CHARS: usize = 512;

pub const COMICLENS_USER_AGENT: &str = concat!("comiclens/", env!("CARGO_PKG_VERSION"));

/// Transport knobs shared by every upstream client.
#[derive(Debug, Clone)]
pub struct ClientOptions<'a> {
    pub proxy: Option<&'a Url>,
    pub enable_multiplexing: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

pub fn build_client(options: &ClientOptions<'_>) -> Result<reqwest::Client, ComicLensError> {
    let mut headers = HeaderMap::new();

    let mut builder = reqwest::Client::builder()
        .user_agent(COMICLENS_USER_AGENT)
        .connect_timeout(options.connect_timeout)
        .timeout(options.request_timeout);

    if let Some(proxy_url) = options.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
    }

    if options.enable_multiplexing {
        builder = builder.http2_adaptive_window(true);
    } else {
        headers.insert(CONNECTION, HeaderValue::from_static("close"));
        builder = builder
            .http1_only()
            .pool_max_idle_per_host(0)
            .pool_idle_timeout(Duration::from_secs(0));
    }

    Ok(builder.default_headers(headers).build()?)
}
