use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::UpstreamDefaults;

/// Comic source configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct XkcdConfig {
    /// Base URL of the comic JSON API.
    /// TOML: `upstream.xkcd.base_url`. Default: `https://xkcd.com`.
    #[serde(default = "default_base_url")]
    pub base_url: Url,

    /// Optional upstream HTTP proxy.
    /// TOML: `upstream.xkcd.proxy`. Falls back to `upstream.defaults.proxy` when unset.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `upstream.xkcd.enable_multiplexing`.
    /// Falls back to `upstream.defaults.enable_multiplexing`.
    #[serde(default)]
    pub enable_multiplexing: Option<bool>,

    /// TOML: `upstream.xkcd.request_timeout_secs`.
    /// Falls back to `upstream.defaults.request_timeout_secs`.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct XkcdResolvedConfig {
    pub base_url: Url,
    pub proxy: Option<Url>,
    pub enable_multiplexing: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl XkcdConfig {
    pub fn resolve(&self, defaults: &UpstreamDefaults) -> XkcdResolvedConfig {
        XkcdResolvedConfig {
            base_url: self.base_url.clone(),
            proxy: self.proxy.clone().or_else(|| defaults.proxy.clone()),
            enable_multiplexing: self
                .enable_multiplexing
                .unwrap_or(defaults.enable_multiplexing),
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            request_timeout: Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(defaults.request_timeout_secs),
            ),
        }
    }
}

impl XkcdResolvedConfig {
    /// `GET` target that describes the most recent comic.
    pub fn latest_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/info.0.json",
            self.base_url.as_str().trim_end_matches('/')
        ))
    }

    /// `GET` target for one comic by number.
    pub fn comic_url(&self, id: u32) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{id}/info.0.json",
            self.base_url.as_str().trim_end_matches('/')
        ))
    }
}

impl Default for XkcdConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            proxy: None,
            enable_multiplexing: None,
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> Url {
    Url::parse("https://xkcd.com").expect("default xkcd base_url must be a valid URL")
}
