use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One comic as served by `info.0.json`.
///
/// Upstream encodes the publication date as three decimal strings
/// (`"year": "2024", "month": "1", "day": "5"`); use [`XkcdComic::published_on`]
/// to get a calendar date.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct XkcdComic {
    pub num: u32,
    pub title: String,
    #[serde(default)]
    pub safe_title: String,
    pub img: String,
    pub alt: String,
    pub year: String,
    pub month: String,
    pub day: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub news: String,
    #[serde(default)]
    pub transcript: String,
}

impl XkcdComic {
    /// Returns `None` when any date component is missing, non-numeric, or out of range.
    pub fn published_on(&self) -> Option<NaiveDate> {
        let year = self.year.trim().parse().ok()?;
        let month = self.month.trim().parse().ok()?;
        let day = self.day.trim().parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}
