use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body posted to the vision-explanation endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct VisionRequest {
    pub image_url: String,
}

/// Vision-explanation response.
///
/// Both fields are optional upstream; a JSON `null` and a missing key both
/// deserialize as `None`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VisionResponse {
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_null_fields_are_none() {
        let resp: VisionResponse =
            serde_json::from_str(r#"{"additional_info":null,"model":"v1"}"#).expect("parse");
        assert_eq!(resp.explanation, None);
        assert_eq!(resp.additional_info, None);
        assert_eq!(resp.extra.get("model"), Some(&Value::from("v1")));
    }

    #[test]
    fn request_serializes_image_url() {
        let body = serde_json::to_string(&VisionRequest {
            image_url: "https://imgs.xkcd.com/comics/a.png".to_string(),
        })
        .expect("serialize");
        assert_eq!(body, r#"{"image_url":"https://imgs.xkcd.com/comics/a.png"}"#);
    }
}
