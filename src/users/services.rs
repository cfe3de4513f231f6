use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{
    dto::{
        parse_timestamp, BulkOutcome, BulkReport, CreateUserRequest, FindUsersQuery,
        UpdateUserRequest,
    },
    error::UserError,
    filter::UserFilter,
    password::PasswordHasher,
    repo_types::{NewUser, User, UserPatch},
    store::UserStore,
};

/// Treats empty query values as absent.
fn non_empty(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

/// CRUD and search over users. Cheap to clone; collaborators are shared.
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    /// Validates and inserts one user. Shared by single and bulk creation.
    async fn register(&self, input: CreateUserRequest) -> Result<User, UserError> {
        if input.password != input.password_second {
            return Err(UserError::PasswordMismatch);
        }

        let email = input.email.trim().to_string();

        // Any status: a soft-deleted user still owns its email.
        if self
            .store
            .find_one(&UserFilter::new().email(email.as_str()))
            .await?
            .is_some()
        {
            return Err(UserError::AlreadyExists);
        }

        let password_hash = self.hasher.hash(&input.password).map_err(UserError::Hash)?;

        let user = self
            .store
            .create(NewUser {
                name: input.name,
                email,
                password_hash,
                cellphone: input.cellphone,
                status: true,
            })
            .await?;
        Ok(user)
    }

    pub async fn create_user(&self, input: CreateUserRequest) -> Result<User, UserError> {
        match self.register(input).await {
            Ok(user) => {
                info!(user_id = %user.id, email = %user.email, "user created");
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "create user rejected");
                Err(e)
            }
        }
    }

    /// Active user with `id`, if any. Absence is not an error here.
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>, UserError> {
        let user = self
            .store
            .find_one(&UserFilter::new().id(id).active())
            .await?;
        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUserRequest) -> Result<(), UserError> {
        let Some(existing) = self.get_user_by_id(id).await? else {
            warn!(user_id = %id, "update of missing or deleted user");
            return Err(UserError::NotFound);
        };

        let password_hash = match non_empty(input.password.as_deref()) {
            Some(plain) => self.hasher.hash(plain).map_err(UserError::Hash)?,
            None => existing.password_hash,
        };
        let patch = UserPatch {
            name: Some(input.name.unwrap_or(existing.name)),
            password_hash: Some(password_hash),
            cellphone: Some(input.cellphone.unwrap_or(existing.cellphone)),
            status: None,
        };

        self.store
            .update(&patch, &UserFilter::new().id(id))
            .await?;
        info!(user_id = %id, "user updated");
        Ok(())
    }

    /// Soft delete: flips `status` to false, the row stays.
    pub async fn delete_user(&self, id: Uuid) -> Result<(), UserError> {
        if self.get_user_by_id(id).await?.is_none() {
            warn!(user_id = %id, "delete of missing or deleted user");
            return Err(UserError::NotFound);
        }
        self.store
            .update(&UserPatch::soft_delete(), &UserFilter::new().id(id))
            .await?;
        info!(user_id = %id, "user soft-deleted");
        Ok(())
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>, UserError> {
        let users = self.store.find_all(&UserFilter::new().active()).await?;
        Ok(users)
    }

    pub async fn find_users(&self, query: FindUsersQuery) -> Result<Vec<User>, UserError> {
        let filter = build_search_filter(&query)?;
        debug!(?filter, "searching users");

        let users = self.store.find_all(&filter).await?;
        if users.is_empty() {
            return Err(UserError::NoMatches);
        }
        Ok(users)
    }

    /// Inserts each entry independently; one bad entry never stops the batch.
    /// Entries arrive undecoded so a malformed one is reported, not fatal.
    pub async fn bulk_create(&self, entries: Vec<serde_json::Value>) -> BulkReport {
        let mut report = BulkReport::default();

        for (index, entry) in entries.into_iter().enumerate() {
            let email = entry
                .get("email")
                .and_then(|v| v.as_str())
                .map(|e| e.trim().to_string())
                .unwrap_or_default();

            let input = match serde_json::from_value::<CreateUserRequest>(entry) {
                Ok(input) => input,
                Err(e) => {
                    warn!(error = %e, index, "bulk entry malformed");
                    report.record(index, email, BulkOutcome::Invalid);
                    continue;
                }
            };

            let outcome = match self.register(input).await {
                Ok(user) => BulkOutcome::Created { id: user.id },
                Err(UserError::PasswordMismatch) => BulkOutcome::PasswordMismatch,
                Err(UserError::AlreadyExists) => BulkOutcome::AlreadyExists,
                Err(e) => {
                    error!(error = %e, index, email = %email, "bulk entry failed");
                    BulkOutcome::Failed
                }
            };
            report.record(index, email, outcome);
        }

        info!(
            created = report.created,
            failed = report.failed,
            "bulk create finished"
        );
        report
    }
}

fn build_search_filter(query: &FindUsersQuery) -> Result<UserFilter, UserError> {
    let mut filter = UserFilter::new();

    if let Some(flag) = query.eliminado.as_deref() {
        filter = filter.status(flag != "true");
    }
    if let Some(name) = non_empty(query.name.as_deref()) {
        filter = filter.name_contains(name);
    }
    if let Some(raw) = non_empty(query.last_login_before.as_deref()) {
        let at = parse_timestamp(raw).ok_or_else(|| UserError::InvalidDate(raw.to_string()))?;
        filter = filter.updated_before(at);
    }
    if let Some(raw) = non_empty(query.last_login_after.as_deref()) {
        let at = parse_timestamp(raw).ok_or_else(|| UserError::InvalidDate(raw.to_string()))?;
        filter = filter.updated_after(at);
    }

    Ok(filter)
}
