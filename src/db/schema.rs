//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema includes:
/// - `users` table (one row per registered account, unique email)
/// - `user_preferences` table (zero or one row per user, unique `user_id`)
/// - `tag` table plus the `user_preference_tag` link table
/// - `comic` table (curated metadata keyed by the upstream comic id)
/// - `ai_explanation_request` table (append-only explanation log)
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Accounts
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL, -- Argon2id PHC string
    role TEXT NOT NULL DEFAULT 'SUBSCRIBER' CHECK (role IN ('ADMIN', 'SUBSCRIBER', 'GUEST')),
    avatar_url TEXT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Preferences (one per user) and tags (unique by name)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user_preferences (
    id TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    exclude_nsfw INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS tag (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS user_preference_tag (
    preferences_id TEXT NOT NULL REFERENCES user_preferences(id) ON DELETE CASCADE,
    tag_id INTEGER NOT NULL REFERENCES tag(id) ON DELETE CASCADE,
    PRIMARY KEY (preferences_id, tag_id)
);

-- ---------------------------------------------------------------------------
-- Comics
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS comic (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    img_url TEXT NOT NULL,
    pub_date TEXT NULL, -- YYYY-MM-DD
    is_nsfw INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL -- RFC3339
);

-- ---------------------------------------------------------------------------
-- Explanation log (append-only)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS ai_explanation_request (
    id INTEGER PRIMARY KEY NOT NULL,
    comic_id TEXT NOT NULL,
    request_id TEXT NOT NULL,
    response TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_ai_explanation_request_comic ON ai_explanation_request(comic_id);
"#;
