use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::UpstreamDefaults;

/// Vision-explanation API configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VisionConfig {
    /// Endpoint that accepts `{"image_url": ...}`.
    /// TOML: `upstream.vision.api_url`.
    /// Default: `https://gpt-4-vision-api-url.com/analyze`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Bearer token sent as `Authorization` when set.
    /// TOML: `upstream.vision.api_key`. Default: unset.
    #[serde(default)]
    pub api_key: Option<String>,

    /// TOML: `upstream.vision.proxy`. Falls back to `upstream.defaults.proxy` when unset.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// TOML: `upstream.vision.enable_multiplexing`.
    /// Falls back to `upstream.defaults.enable_multiplexing`.
    #[serde(default)]
    pub enable_multiplexing: Option<bool>,

    /// TOML: `upstream.vision.request_timeout_secs`.
    /// Falls back to `upstream.defaults.request_timeout_secs`.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct VisionResolvedConfig {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub proxy: Option<Url>,
    pub enable_multiplexing: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl VisionConfig {
    pub fn resolve(&self, defaults: &UpstreamDefaults) -> VisionResolvedConfig {
        VisionResolvedConfig {
            api_url: self.api_url.clone(),
            api_key: self
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
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

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            proxy: None,
            enable_multiplexing: None,
            request_timeout_secs: None,
        }
    }
}

fn default_api_url() -> Url {
    Url::parse("https://gpt-4-vision-api-url.com/analyze")
        .expect("default vision api_url must be a valid URL")
}
