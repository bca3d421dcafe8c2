//! ComicUpdate -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::patch::{ComicPatch, ComicUpdate};
use super::traits::{DbPatchable, PatchOutcome};
use crate::error::ComicLensError;

#[async_trait]
impl DbPatchable for ComicUpdate {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<PatchOutcome, ComicLensError> {
        let ComicPatch {
            title,
            img_url,
            pub_date,
            is_nsfw,
        } = self.patch.clone();

        let title_set = title.is_some();
        let img_url_set = img_url.is_some();
        let pub_date_set = pub_date.is_some();
        let is_nsfw_set = is_nsfw.is_some();
        let updated_at = Utc::now();

        let res = sqlx::query(
            r#"
            UPDATE comic
            SET
                title = COALESCE(?, title),
                img_url = COALESCE(?, img_url),
                pub_date = COALESCE(?, pub_date),
                is_nsfw = COALESCE(?, is_nsfw),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(title)
        .bind(img_url)
        .bind(pub_date)
        .bind(is_nsfw)
        .bind(updated_at)
        .bind(self.id.as_str())
        .execute(pool)
        .await?;

        let affected = res.rows_affected();
        debug!(
            table = "comic",
            id = %self.id,
            affected,
            updated_at = %updated_at,
            title_set,
            img_url_set,
            pub_date_set,
            is_nsfw_set,
            "db patch applied"
        );

        if affected == 0 {
            return Ok(PatchOutcome::NotFound);
        }
        Ok(PatchOutcome::Applied)
    }
}
