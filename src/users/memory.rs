use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    filter::UserFilter,
    repo_types::{NewUser, User, UserPatch},
    store::{StoreError, UserStore},
};

/// In-process `UserStore`. Rows keep insertion order and emails are unique,
/// like the `users` table.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryUserStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            rows: RwLock::new(users),
        }
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| filter.matches(u)).cloned())
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn create(&self, fields: NewUser) -> Result<User, StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.email == fields.email) {
            return Err(StoreError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            name: fields.name,
            email: fields.email,
            password_hash: fields.password_hash,
            cellphone: fields.cellphone,
            status: fields.status,
            created_at: now,
            updated_at: now,
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, patch: &UserPatch, filter: &UserFilter) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let now = OffsetDateTime::now_utc();
        let mut touched = 0;
        for user in rows.iter_mut().filter(|u| filter.matches(u)) {
            patch.apply(user);
            user.updated_at = now;
            touched += 1;
        }
        Ok(touched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".into(),
            email: email.into(),
            password_hash: "hash".into(),
            cellphone: "555".into(),
            status: true,
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("ann@example.com")).await.unwrap();
        assert!(!user.id.is_nil());
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("ann@example.com")).await.unwrap();
        let err = store.create(new_user("ann@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_touches_only_matching_rows() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("a@example.com")).await.unwrap();
        let b = store.create(new_user("b@example.com")).await.unwrap();

        let n = store
            .update(&UserPatch::soft_delete(), &UserFilter::new().id(a.id))
            .await
            .unwrap();
        assert_eq!(n, 1);

        let a = store.find_one(&UserFilter::new().id(a.id)).await.unwrap().unwrap();
        let b_after = store.find_one(&UserFilter::new().id(b.id)).await.unwrap().unwrap();
        assert!(!a.status);
        assert!(a.updated_at >= a.created_at);
        assert_eq!(b_after, b);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryUserStore::new();
        for email in ["1@x.io", "2@x.io", "3@x.io"] {
            store.create(new_user(email)).await.unwrap();
        }
        let emails: Vec<_> = store
            .find_all(&UserFilter::new())
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.email)
            .collect();
        assert_eq!(emails, ["1@x.io", "2@x.io", "3@x.io"]);
    }
}
