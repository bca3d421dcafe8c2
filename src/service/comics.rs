use chrono::NaiveDate;
use comiclens_schema::XkcdComic;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::{ComicCreate, ComicPatch, ComicUpdate, DbActorHandle, PatchOutcome};
use crate::error::ComicLensError;
use crate::upstream::XkcdClient;

/// Wire and storage format of publication dates.
pub const PUB_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RandomComic {
    pub comic_id: u32,
    pub title: String,
    pub img_url: String,
    pub alt_text: String,
    /// `YYYY-MM-DD`
    pub date_published: String,
}

impl TryFrom<XkcdComic> for RandomComic {
    type Error = ComicLensError;

    fn try_from(comic: XkcdComic) -> Result<Self, Self::Error> {
        let published = comic.published_on().ok_or_else(|| {
            ComicLensError::UpstreamPayload(format!(
                "comic {} has invalid date {}-{}-{}",
                comic.num, comic.year, comic.month, comic.day
            ))
        })?;

        Ok(Self {
            comic_id: comic.num,
            title: comic.title,
            img_url: comic.img,
            alt_text: comic.alt,
            date_published: published.format(PUB_DATE_FORMAT).to_string(),
        })
    }
}

impl RandomComic {
    /// Insert-if-absent payload for the local comic table.
    pub fn to_comic_create(&self) -> ComicCreate {
        ComicCreate {
            id: self.comic_id.to_string(),
            title: self.title.clone(),
            img_url: self.img_url.clone(),
            pub_date: NaiveDate::parse_from_str(&self.date_published, PUB_DATE_FORMAT).ok(),
            is_nsfw: false,
        }
    }
}

/// Uniform draw from `[1, max]`; `None` when `max` is zero.
pub fn pick_comic_id<R: Rng>(rng: &mut R, max: u32) -> Option<u32> {
    (max >= 1).then(|| rng.random_range(1..=max))
}

/// Learn the current maximum id, draw one uniformly, fetch it.
///
/// Each call is independent: no caching of the maximum, no exclusion of
/// previously returned ids, no retry.
pub async fn fetch_random_comic(xkcd: &XkcdClient<'_>) -> Result<RandomComic, ComicLensError> {
    let latest = xkcd.latest().await?;
    let id = pick_comic_id(&mut rand::rng(), latest.num).ok_or_else(|| {
        ComicLensError::UpstreamPayload(format!("latest comic number is {}", latest.num))
    })?;
    debug!(max = latest.num, picked = id, "Random comic id drawn");

    let comic = xkcd.comic(id).await?;
    RandomComic::try_from(comic)
}

/// Partial metadata update as received on the wire. Absent or `null` fields
/// are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicMetadataUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub img_url: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub pub_date: Option<String>,
    #[serde(
        default,
        rename = "isNSFW",
        deserialize_with = "crate::utils::serde_bool::opt_bool_or_text"
    )]
    pub is_nsfw: Option<bool>,
}

impl ComicMetadataUpdate {
    /// Copies the present fields into a [`ComicPatch`]. Fails with the raw value
    /// when `pub_date` does not parse.
    pub fn into_patch(self) -> Result<ComicPatch, String> {
        let pub_date = match self.pub_date {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, PUB_DATE_FORMAT).map_err(|_| raw)?),
            None => None,
        };
        Ok(ComicPatch {
            title: self.title,
            img_url: self.img_url,
            pub_date,
            is_nsfw: self.is_nsfw,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComicUpdateOutcome {
    Updated,
    NoData,
    NotFound,
    InvalidPubDate(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateComicMetadataResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<ComicUpdateOutcome> for UpdateComicMetadataResponse {
    fn from(outcome: ComicUpdateOutcome) -> Self {
        let error = match outcome {
            ComicUpdateOutcome::Updated => None,
            ComicUpdateOutcome::NoData => Some("No data provided for update".to_string()),
            ComicUpdateOutcome::NotFound => Some("Comic not found".to_string()),
            ComicUpdateOutcome::InvalidPubDate(raw) => {
                Some(format!("Invalid pubDate '{raw}': expected YYYY-MM-DD"))
            }
        };
        Self {
            success: error.is_none(),
            error,
        }
    }
}

pub async fn update_comic_metadata(
    db: &DbActorHandle,
    id: &str,
    update: ComicMetadataUpdate,
) -> Result<ComicUpdateOutcome, ComicLensError> {
    let patch = match update.into_patch() {
        Ok(patch) => patch,
        Err(raw) => return Ok(ComicUpdateOutcome::InvalidPubDate(raw)),
    };
    if patch.is_empty() {
        return Ok(ComicUpdateOutcome::NoData);
    }

    let outcome = db
        .patch_comic(ComicUpdate {
            id: id.to_string(),
            patch,
        })
        .await?;

    match outcome {
        PatchOutcome::Applied => {
            info!(comic_id = %id, "Comic metadata updated");
            Ok(ComicUpdateOutcome::Updated)
        }
        PatchOutcome::NotFound => Ok(ComicUpdateOutcome::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn xkcd_comic(num: u32, year: &str, month: &str, day: &str) -> XkcdComic {
        XkcdComic {
            num,
            title: "Bobby Tables".to_string(),
            safe_title: "Exploits of a Mom".to_string(),
            img: "https://imgs.xkcd.com/comics/exploits_of_a_mom.png".to_string(),
            alt: "Her daughter is named Help I'm trapped in a driver's license factory.".to_string(),
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
            link: String::new(),
            news: String::new(),
            transcript: String::new(),
        }
    }

    #[test]
    fn date_is_zero_padded() {
        let comic = RandomComic::try_from(xkcd_comic(327, "2007", "10", "1")).expect("convert");
        assert_eq!(comic.comic_id, 327);
        assert_eq!(comic.date_published, "2007-10-01");
        assert_eq!(
            comic.alt_text,
            "Her daughter is named Help I'm trapped in a driver's license factory."
        );
    }

    #[test]
    fn impossible_date_is_a_payload_error() {
        let err = RandomComic::try_from(xkcd_comic(1, "2007", "2", "30")).expect_err("must fail");
        assert!(matches!(err, ComicLensError::UpstreamPayload(_)));
    }

    #[test]
    fn picked_ids_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for max in [1_u32, 2, 3, 100, 3000] {
            for _ in 0..200 {
                let id = pick_comic_id(&mut rng, max).expect("non-empty range");
                assert!((1..=max).contains(&id), "{id} outside [1, {max}]");
            }
        }
        assert_eq!(pick_comic_id(&mut rng, 1), Some(1));
        assert_eq!(pick_comic_id(&mut rng, 0), None);
    }

    #[test]
    fn update_copies_only_present_fields() {
        let patch = ComicMetadataUpdate {
            pub_date: Some("2024-01-05".to_string()),
            is_nsfw: Some(true),
            ..Default::default()
        }
        .into_patch()
        .expect("valid patch");

        assert_eq!(
            patch,
            ComicPatch {
                title: None,
                img_url: None,
                pub_date: NaiveDate::from_ymd_opt(2024, 1, 5),
                is_nsfw: Some(true),
            }
        );
    }

    #[test]
    fn bad_pub_date_returns_raw_value() {
        let err = ComicMetadataUpdate {
            pub_date: Some("05/01/2024".to_string()),
            ..Default::default()
        }
        .into_patch()
        .expect_err("must fail");
        assert_eq!(err, "05/01/2024");
    }

    #[test]
    fn wire_names_match_the_api() {
        let update: ComicMetadataUpdate = serde_json::from_str(
            r#"{"title":null,"imgUrl":"https://imgs.xkcd.com/comics/a.png","isNSFW":false}"#,
        )
        .expect("parse");
        assert_eq!(update.title, None);
        assert_eq!(
            update.img_url.as_deref(),
            Some("https://imgs.xkcd.com/comics/a.png")
        );
        assert_eq!(update.is_nsfw, Some(false));
    }

    #[test]
    fn outcomes_map_to_response_bodies() {
        assert_eq!(
            UpdateComicMetadataResponse::from(ComicUpdateOutcome::Updated),
            UpdateComicMetadataResponse {
                success: true,
                error: None
            }
        );
        assert_eq!(
            UpdateComicMetadataResponse::from(ComicUpdateOutcome::NoData).error,
            Some("No data provided for update".to_string())
        );
        assert_eq!(
            UpdateComicMetadataResponse::from(ComicUpdateOutcome::NotFound).error,
            Some("Comic not found".to_string())
        );
    }
}
