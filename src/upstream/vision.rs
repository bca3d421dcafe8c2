use comiclens_schema::{VisionRequest, VisionResponse};
use reqwest::header::HeaderName;
use tracing::debug;

use super::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::config::VisionResolvedConfig;
use crate::error::ComicLensError;
use crate::utils::logging::{body_preview, debug_pretty_json};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// A successful vision call: the parsed body plus the upstream request id.
#[derive(Debug, Clone)]
pub struct VisionReply {
    pub request_id: String,
    pub body: VisionResponse,
}

pub struct VisionClient<'a> {
    cfg: &'a VisionResolvedConfig,
    http: reqwest::Client,
}

impl<'a> VisionClient<'a> {
    pub fn new(cfg: &'a VisionResolvedConfig, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    pub fn build_request(&self, image_url: &str) -> Result<reqwest::Request, reqwest::Error> {
        let mut builder = self
            .http
            .post(self.cfg.api_url.clone())
            .json(&VisionRequest {
                image_url: image_url.to_string(),
            });
        if let Some(api_key) = self.cfg.api_key.as_deref() {
            builder = builder.bearer_auth(api_key);
        }
        builder.build()
    }

    /// POSTs the image URL once. Any non-2xx, or a reply without `x-request-id`,
    /// is an error.
    pub async fn explain(&self, image_url: &str) -> Result<VisionReply, ComicLensError> {
        let req = self.build_request(image_url)?;
        let resp = self.http.execute(req).await?;

        let status = resp.status();
        if !status.is_success() {
            let body = match resp.bytes().await {
                Ok(bytes) => body_preview(&bytes, UPSTREAM_BODY_PREVIEW_CHARS),
                Err(e) => format!("<failed to read body: {e}>"),
            };
            debug!(%status, body = %body, "vision upstream returned non-success status");
            return Err(ComicLensError::UpstreamStatus(status));
        }

        let request_id = resp
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or(ComicLensError::MissingUpstreamHeader("x-request-id"))?;

        let bytes = resp.bytes().await?;
        let body: VisionResponse = serde_json::from_slice(&bytes)?;
        debug_pretty_json("vision", &body);

        Ok(VisionReply { request_id, body })
    }
}
