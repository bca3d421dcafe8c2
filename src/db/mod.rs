//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `patch.rs`: create/upsert payloads and the partial comic update
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `actor.rs`: the actor that owns the pool; everything else talks to its handle

pub mod actor;
pub mod models;
pub mod patch;
pub mod schema;
pub mod traits;

mod patch_impl;

pub use models::{DbComic, DbExplanationRequest, DbUser, DbUserPreferences, UserRole};
pub use patch::{
    ComicCreate, ComicPatch, ComicUpdate, ExplanationCreate, PreferencesCreate,
    PreferencesUpsert, UserCreate,
};
pub use schema::SQLITE_INIT;
pub use traits::{DbPatchable, PatchOutcome};

pub use actor::{DbActorHandle, spawn};
