mod vision;
mod xkcd;

pub use vision::{VisionConfig, VisionResolvedConfig};
pub use xkcd::{XkcdConfig, XkcdResolvedConfig};

use serde::{Deserialize, Serialize};
use url::Url;

/// Shared defaults for outbound HTTP clients (used when the per-upstream value is unset).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamDefaults {
    /// Optional upstream HTTP proxy. If set, used for reqwest clients.
    /// TOML: `upstream.defaults.proxy`. Example: `http://127.0.0.1:1080`.
    #[serde(default)]
    pub proxy: Option<Url>,

    /// Allow HTTP/2 multiplexing for reqwest clients; disabled forces HTTP/1.
    /// TOML: `upstream.defaults.enable_multiplexing`. Default: `false`.
    #[serde(default = "default_enable_multiplexing")]
    pub enable_multiplexing: bool,

    /// TCP connect timeout in seconds.
    /// TOML: `upstream.defaults.connect_timeout_secs`. Default: `10`.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds.
    /// TOML: `upstream.defaults.request_timeout_secs`. Default: `60`.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for UpstreamDefaults {
    fn default() -> Self {
        Self {
            proxy: None,
            enable_multiplexing: default_enable_multiplexing(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// All outbound API configurations.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct UpstreamConfig {
    /// Global defaults (overridden per upstream if set).
    #[serde(default)]
    pub defaults: UpstreamDefaults,

    /// Comic source (xkcd JSON API).
    #[serde(default)]
    pub xkcd: XkcdConfig,

    /// Vision-explanation API.
    #[serde(default)]
    pub vision: VisionConfig,
}

fn default_enable_multiplexing() -> bool {
    false
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    60
}
