use async_trait::async_trait;

use super::{
    filter::UserFilter,
    repo_types::{NewUser, User, UserPatch},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a user with this email already exists")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Backend(e.into()),
        }
    }
}

/// Persistence seam for users. Implemented over PostgreSQL in production and
/// over an in-process table for tests.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError>;

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError>;

    async fn create(&self, fields: NewUser) -> Result<User, StoreError>;

    /// Applies `patch` to every row matching `filter` and bumps `updated_at`.
    /// Returns the number of rows touched.
    async fn update(&self, patch: &UserPatch, filter: &UserFilter) -> Result<u64, StoreError>;
}
