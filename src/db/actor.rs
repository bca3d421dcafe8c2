use crate::db::models::{DbComic, DbExplanationRequest, DbUser, DbUserPreferences};
use crate::db::patch::{ComicCreate, ComicUpdate, ExplanationCreate, PreferencesUpsert, UserCreate};
use crate::db::schema::SQLITE_INIT;
use crate::db::traits::{DbPatchable, PatchOutcome};
use crate::error::ComicLensError;
use chrono::{DateTime, Utc};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{FromRow, SqlitePool};
use std::{str::FromStr, time::Duration};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Create a user (with nested preferences and tags) and return its id.
    CreateUser(UserCreate, RpcReplyPort<Result<String, ComicLensError>>),

    /// Look up a user by email.
    GetUserByEmail(String, RpcReplyPort<Result<Option<DbUser>, ComicLensError>>),

    /// Create-or-update preferences keyed by user id; returns the preferences id.
    UpsertPreferences(PreferencesUpsert, RpcReplyPort<Result<String, ComicLensError>>),

    /// Preferences (with tag names) for a user id.
    GetPreferences(
        String,
        RpcReplyPort<Result<Option<DbUserPreferences>, ComicLensError>>,
    ),

    /// Insert a comic if its id is unseen; replies `true` when a row was inserted.
    RecordComic(ComicCreate, RpcReplyPort<Result<bool, ComicLensError>>),

    /// Get comic by id.
    GetComic(String, RpcReplyPort<Result<Option<DbComic>, ComicLensError>>),

    /// Apply a partial update to a comic.
    PatchComic(ComicUpdate, RpcReplyPort<Result<PatchOutcome, ComicLensError>>),

    /// Append one explanation log row and return its id.
    CreateExplanation(ExplanationCreate, RpcReplyPort<Result<i64, ComicLensError>>),

    /// Explanation log rows for a comic id, oldest first.
    ListExplanations(
        String,
        RpcReplyPort<Result<Vec<DbExplanationRequest>, ComicLensError>>,
    ),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn create_user(&self, create: UserCreate) -> Result<String, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::CreateUser, create).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor CreateUser RPC failed: {e}"))
        })?
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>, ComicLensError> {
        ractor::call!(
            self.actor,
            DbActorMessage::GetUserByEmail,
            email.to_string()
        )
        .map_err(|e| {
            ComicLensError::RactorError(format!("DbActor GetUserByEmail RPC failed: {e}"))
        })?
    }

    pub async fn upsert_preferences(
        &self,
        upsert: PreferencesUpsert,
    ) -> Result<String, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::UpsertPreferences, upsert).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor UpsertPreferences RPC failed: {e}"))
        })?
    }

    pub async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<DbUserPreferences>, ComicLensError> {
        ractor::call!(
            self.actor,
            DbActorMessage::GetPreferences,
            user_id.to_string()
        )
        .map_err(|e| {
            ComicLensError::RactorError(format!("DbActor GetPreferences RPC failed: {e}"))
        })?
    }

    pub async fn record_comic(&self, create: ComicCreate) -> Result<bool, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::RecordComic, create).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor RecordComic RPC failed: {e}"))
        })?
    }

    pub async fn get_comic(&self, id: &str) -> Result<Option<DbComic>, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::GetComic, id.to_string()).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor GetComic RPC failed: {e}"))
        })?
    }

    pub async fn patch_comic(&self, update: ComicUpdate) -> Result<PatchOutcome, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::PatchComic, update).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor PatchComic RPC failed: {e}"))
        })?
    }

    pub async fn create_explanation(
        &self,
        create: ExplanationCreate,
    ) -> Result<i64, ComicLensError> {
        ractor::call!(self.actor, DbActorMessage::CreateExplanation, create).map_err(|e| {
            ComicLensError::RactorError(format!("DbActor CreateExplanation RPC failed: {e}"))
        })?
    }

    pub async fn list_explanations(
        &self,
        comic_id: &str,
    ) -> Result<Vec<DbExplanationRequest>, ComicLensError> {
        ractor::call!(
            self.actor,
            DbActorMessage::ListExplanations,
            comic_id.to_string()
        )
        .map_err(|e| {
            ComicLensError::RactorError(format!("DbActor ListExplanations RPC failed: {e}"))
        })?
    }

    /// Stop the actor and wait for it to close the pool.
    pub async fn stop(&self) -> Result<(), ComicLensError> {
        self.actor
            .stop_and_wait(None, Some(Duration::from_secs(10)))
            .await
            .map_err(|e| ComicLensError::RactorError(format!("DbActor stop failed: {e}")))
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("DbActor stopped, pool closed");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            DbActorMessage::CreateUser(create, reply) => {
                let res = self.create_user(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetUserByEmail(email, reply) => {
                let res = self.get_user_by_email(&state.pool, &email).await;
                let _ = reply.send(res);
            }
            DbActorMessage::UpsertPreferences(upsert, reply) => {
                let res = self.upsert_preferences(&state.pool, upsert).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetPreferences(user_id, reply) => {
                let res = self.get_preferences(&state.pool, &user_id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::RecordComic(create, reply) => {
                let res = self.record_comic(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::GetComic(id, reply) => {
                let res = self.get_comic(&state.pool, &id).await;
                let _ = reply.send(res);
            }
            DbActorMessage::PatchComic(update, reply) => {
                let res = update.apply_patch(&state.pool).await;
                let _ = reply.send(res);
            }
            DbActorMessage::CreateExplanation(create, reply) => {
                let res = self.create_explanation(&state.pool, create).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ListExplanations(comic_id, reply) => {
                let res = self.list_explanations(&state.pool, &comic_id).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

#[derive(FromRow)]
struct PreferencesRow {
    id: String,
    user_id: String,
    exclude_nsfw: bool,
    updated_at: DateTime<Utc>,
}

impl DbActor {
    async fn create_user(
        &self,
        pool: &SqlitePool,
        create: UserCreate,
    ) -> Result<String, ComicLensError> {
        let now = Utc::now();
        let user_id = Uuid::new_v4().to_string();
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, hashed_password, role, avatar_url, created_at)
            VALUES (?, ?, ?, ?, NULL, ?)
            "#,
        )
        .bind(user_id.as_str())
        .bind(create.email)
        .bind(create.hashed_password)
        .bind(create.role)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if let Some(prefs) = create.preferences {
            let prefs_id = Uuid::new_v4().to_string();
            sqlx::query(
                r#"
                INSERT INTO user_preferences (id, user_id, exclude_nsfw, updated_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(prefs_id.as_str())
            .bind(user_id.as_str())
            .bind(prefs.exclude_nsfw)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            for name in &prefs.preferred_tags {
                // Connect-or-create: the no-op update makes RETURNING yield the existing id.
                let tag_id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO tag (name) VALUES (?)
                    ON CONFLICT(name) DO UPDATE SET name = excluded.name
                    RETURNING id
                    "#,
                )
                .bind(name.as_str())
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query(
                    r#"
                    INSERT OR IGNORE INTO user_preference_tag (preferences_id, tag_id)
                    VALUES (?, ?)
                    "#,
                )
                .bind(prefs_id.as_str())
                .bind(tag_id)
                .execute(&mut *tx)
                .await?;
            }

            debug!(
                user_id = %user_id,
                preferences_id = %prefs_id,
                tags = prefs.preferred_tags.len(),
                "user preferences created"
            );
        }

        tx.commit().await?;
        Ok(user_id)
    }

    async fn get_user_by_email(
        &self,
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<DbUser>, ComicLensError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"
        SELECT id, email, hashed_password, role, avatar_url, created_at
        FROM users
        WHERE email = ?
        "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn upsert_preferences(
        &self,
        pool: &SqlitePool,
        upsert: PreferencesUpsert,
    ) -> Result<String, ComicLensError> {
        let now = Utc::now();
        let id: String = sqlx::query_scalar(
            r#"
            INSERT INTO user_preferences (id, user_id, exclude_nsfw, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                exclude_nsfw = excluded.exclude_nsfw,
                updated_at = excluded.updated_at
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(upsert.user_id)
        .bind(upsert.exclude_nsfw)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    async fn get_preferences(
        &self,
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Option<DbUserPreferences>, ComicLensError> {
        let Some(row) = sqlx::query_as::<_, PreferencesRow>(
            r#"
        SELECT id, user_id, exclude_nsfw, updated_at
        FROM user_preferences
        WHERE user_id = ?
        "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        else {
            return Ok(None);
        };

        let preferred_tags: Vec<String> = sqlx::query_scalar(
            r#"
        SELECT t.name
        FROM tag t
        JOIN user_preference_tag upt ON upt.tag_id = t.id
        WHERE upt.preferences_id = ?
        ORDER BY t.name
        "#,
        )
        .bind(row.id.as_str())
        .fetch_all(pool)
        .await?;

        Ok(Some(DbUserPreferences {
            id: row.id,
            user_id: row.user_id,
            exclude_nsfw: row.exclude_nsfw,
            preferred_tags,
            updated_at: row.updated_at,
        }))
    }

    async fn record_comic(
        &self,
        pool: &SqlitePool,
        create: ComicCreate,
    ) -> Result<bool, ComicLensError> {
        let res = sqlx::query(
            r#"
            INSERT INTO comic (id, title, img_url, pub_date, is_nsfw, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(create.id)
        .bind(create.title)
        .bind(create.img_url)
        .bind(create.pub_date)
        .bind(create.is_nsfw)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn get_comic(
        &self,
        pool: &SqlitePool,
        id: &str,
    ) -> Result<Option<DbComic>, ComicLensError> {
        let row = sqlx::query_as::<_, DbComic>(
            r#"
        SELECT id, title, img_url, pub_date, is_nsfw, updated_at
        FROM comic
        WHERE id = ?
        "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    async fn create_explanation(
        &self,
        pool: &SqlitePool,
        create: ExplanationCreate,
    ) -> Result<i64, ComicLensError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO ai_explanation_request (comic_id, request_id, response, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(create.comic_id)
        .bind(create.request_id)
        .bind(create.response)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(id)
    }

    async fn list_explanations(
        &self,
        pool: &SqlitePool,
        comic_id: &str,
    ) -> Result<Vec<DbExplanationRequest>, ComicLensError> {
        let rows = sqlx::query_as::<_, DbExplanationRequest>(
            r#"
        SELECT id, comic_id, request_id, response, created_at
        FROM ai_explanation_request
        WHERE comic_id = ?
        ORDER BY id
        "#,
        )
        .bind(comic_id)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbActorHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbActorHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), ComicLensError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
