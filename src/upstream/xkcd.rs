use comiclens_schema::XkcdComic;
use tracing::debug;

use super::UPSTREAM_BODY_PREVIEW_CHARS;
use crate::config::XkcdResolvedConfig;
use crate::error::ComicLensError;
use crate::utils::logging::{body_preview, debug_pretty_json};

/// Stateless caller for the comic JSON API. One `GET` per method, no retry.
pub struct XkcdClient<'a> {
    cfg: &'a XkcdResolvedConfig,
    http: reqwest::Client,
}

impl<'a> XkcdClient<'a> {
    pub fn new(cfg: &'a XkcdResolvedConfig, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    /// The most recent comic; its `num` is the current maximum id.
    pub async fn latest(&self) -> Result<XkcdComic, ComicLensError> {
        let resp = self.http.get(self.cfg.latest_url()?).send().await?;
        let status = resp.status();
        if !status.is_success() {
            Self::log_failure(None, resp).await;
            return Err(ComicLensError::LatestComicFetch { status });
        }
        Self::decode(resp).await
    }

    pub async fn comic(&self, id: u32) -> Result<XkcdComic, ComicLensError> {
        let resp = self.http.get(self.cfg.comic_url(id)?).send().await?;
        let status = resp.status();
        if !status.is_success() {
            Self::log_failure(Some(id), resp).await;
            return Err(ComicLensError::ComicFetch { id, status });
        }
        Self::decode(resp).await
    }

    async fn decode(resp: reqwest::Response) -> Result<XkcdComic, ComicLensError> {
        let bytes = resp.bytes().await?;
        let comic: XkcdComic = serde_json::from_slice(&bytes)?;
        debug_pretty_json("xkcd", &comic);
        Ok(comic)
    }

    async fn log_failure(id: Option<u32>, resp: reqwest::Response) {
        let status = resp.status();
        let body = match resp.bytes().await {
            Ok(bytes) => body_preview(&bytes, UPSTREAM_BODY_PREVIEW_CHARS),
            Err(e) => format!("<failed to read body: {e}>"),
        };
        debug!(?id, %status, body = %body, "xkcd upstream returned non-success status");
    }
}
