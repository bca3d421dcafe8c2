use serde::Serialize;
use tracing::{Level, debug};

/// Logs an upstream payload as pretty JSON at debug level.
/// Serialization is skipped entirely when debug logging is off.
pub(crate) fn debug_pretty_json<T>(upstream: &str, value: &T)
where
    T: Serialize,
{
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    debug!(upstream, body = %pretty_json, "Upstream payload");
}

/// First `max_chars` characters of a raw upstream body, decoded lossily.
pub(crate) fn body_preview(bytes: &[u8], max_chars: usize) -> String {
    let raw_body = String::from_utf8_lossy(bytes);
    format!("{raw_body:.max_chars$}")
}
