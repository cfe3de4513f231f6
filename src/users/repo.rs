use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::{
    filter::UserFilter,
    repo_types::{NewUser, User, UserPatch},
    store::{StoreError, UserStore},
};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, cellphone, status, created_at, updated_at";

/// `UserStore` backed by the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn select(filter: &UserFilter) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        filter.push_where(&mut qb);
        qb
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_one(&self, filter: &UserFilter) -> Result<Option<User>, StoreError> {
        let mut qb = Self::select(filter);
        qb.push(" LIMIT 1");
        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
        if filter.is_empty() {
            debug!("find_all without predicates");
        }
        let mut qb = Self::select(filter);
        let users = qb.build_query_as::<User>().fetch_all(&self.db).await?;
        Ok(users)
    }

    async fn create(&self, fields: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, cellphone, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, cellphone, status, created_at, updated_at
            "#,
        )
        .bind(fields.name)
        .bind(fields.email)
        .bind(fields.password_hash)
        .bind(fields.cellphone)
        .bind(fields.status)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, patch: &UserPatch, filter: &UserFilter) -> Result<u64, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");
        if let Some(name) = &patch.name {
            qb.push(", name = ").push_bind(name.clone());
        }
        if let Some(hash) = &patch.password_hash {
            qb.push(", password_hash = ").push_bind(hash.clone());
        }
        if let Some(cellphone) = &patch.cellphone {
            qb.push(", cellphone = ").push_bind(cellphone.clone());
        }
        if let Some(status) = patch.status {
            qb.push(", status = ").push_bind(status);
        }
        filter.push_where(&mut qb);

        let res = qb.build().execute(&self.db).await?;
        Ok(res.rows_affected())
    }
}
