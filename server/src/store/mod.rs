//! Persistence behind two async traits, with a diesel/Postgres backend and an
//! in-process backend for tests and demos.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dapur_core::{Category, LoadedRecipe, NewRecipe, Recipe, RecipeWithCategory, Role, User};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database connection failed: {0}")]
    Connection(String),
    #[error("slug already taken: {0}")]
    SlugTaken(String),
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    #[error("category {0} does not exist")]
    UnknownCategory(i64),
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// A user together with the stored password hash, as needed by login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: User,
    pub password_hash: String,
}

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Every recipe with its category, newest first. Ties on `created_at`
    /// are broken by id, descending.
    async fn list_recipes(&self) -> Result<Vec<RecipeWithCategory>, StoreError>;

    /// All categories ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn category_exists(&self, id: i64) -> Result<bool, StoreError>;

    async fn create_category(&self, name: &str) -> Result<Category, StoreError>;

    /// Persist a recipe. Fails with [`StoreError::SlugTaken`] if another
    /// recipe already owns the slug.
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    async fn find_recipe(&self, slug: &str) -> Result<Option<Recipe>, StoreError>;

    /// The recipe with its category, comments and ratings attached.
    async fn load_recipe(&self, slug: &str) -> Result<Option<LoadedRecipe>, StoreError>;

    /// Remove a recipe along with its comments and ratings. Returns false if
    /// nothing was deleted.
    async fn delete_recipe(&self, id: i64) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::UsernameTaken`] when the name is already used,
    /// compared case-insensitively.
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, StoreError>;

    /// Case-insensitive lookup by username.
    async fn find_credentials(&self, username: &str) -> Result<Option<Credentials>, StoreError>;

    /// Store a new session. Sessions that have already expired are removed
    /// at the same time.
    async fn create_session(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// The owner of an unexpired session with this token hash.
    async fn user_for_token_hash(&self, token_hash: &str) -> Result<Option<User>, StoreError>;
}
