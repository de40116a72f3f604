use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::debug;

use crate::auth::repo_types::{NewUser, User};
use crate::recipes::repo as recipe_repo;
use crate::recipes::repo_types::{NewRecipe, RecipeWithOwner};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated")]
    UniqueViolation,

    /// Foreign key or check constraint.
    #[error("integrity constraint violated")]
    ConstraintViolation,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StoreError::UniqueViolation;
            }
            if db.is_foreign_key_violation() || db.is_check_violation() {
                return StoreError::ConstraintViolation;
            }
        }
        StoreError::Database(e)
    }
}

/// Persistence for users and recipes. Every write is a single transaction:
/// it either commits fully or leaves the store untouched.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    /// Deletes the user together with all of its recipes.
    async fn delete_user(&self, id: i64) -> Result<bool, StoreError>;
    async fn list_recipes(&self) -> Result<Vec<RecipeWithOwner>, StoreError>;
    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<RecipeWithOwner, StoreError>;
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.db, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_username(&self.db, username).await?)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await?;
        let created = User::insert_tx(&mut tx, &user).await?;
        tx.commit().await?;
        debug!(user_id = created.id, "user row committed");
        Ok(created)
    }

    async fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await?;
        let deleted = User::delete_cascade_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeWithOwner>, StoreError> {
        Ok(recipe_repo::list_all(&self.db).await?)
    }

    async fn insert_recipe(&self, recipe: NewRecipe) -> Result<RecipeWithOwner, StoreError> {
        let mut tx = self.db.begin().await?;
        let created = recipe_repo::insert_tx(&mut tx, &recipe).await?;
        tx.commit().await?;
        debug!(recipe_id = created.id, user_id = created.user_id, "recipe row committed");
        Ok(created)
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
