use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::ComicLensError;

/// Result of applying a patch to a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    NotFound,
}

/// Abstraction for applying a patch payload/envelope to the database.
#[async_trait]
pub trait DbPatchable {
    async fn apply_patch(&self, pool: &SqlitePool) -> Result<PatchOutcome, ComicLensError>;
}
