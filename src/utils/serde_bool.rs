//! Booleans that may arrive as JSON `true`/`false` or as query-string text.

use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

impl BoolOrText {
    fn into_bool<E: de::Error>(self) -> Result<bool, E> {
        match self {
            BoolOrText::Bool(b) => Ok(b),
            BoolOrText::Text(s) => match s.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(E::invalid_value(Unexpected::Str(&s), &"a boolean")),
            },
        }
    }
}

pub(crate) fn bool_or_text<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    BoolOrText::deserialize(deserializer)?.into_bool()
}

/// Pair with `#[serde(default)]` so a missing field stays `None`.
pub(crate) fn opt_bool_or_text<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BoolOrText>::deserialize(deserializer)?
        .map(BoolOrText::into_bool)
        .transpose()
}
