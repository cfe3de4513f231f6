use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    state::AppState,
    users::{
        dto::{BulkCreateRequest, BulkReport, CreateUserRequest, FindUsersQuery, UpdateUserRequest},
        error::UserError,
        reply::Reply,
        repo_types::User,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_all_users).post(create_user))
        .route("/users/search", get(find_users))
        .route("/users/bulk", post(bulk_create))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Reply<String>, UserError> {
    let user = state.users.create_user(payload).await?;
    Ok(Reply::ok(format!(
        "User created successfully with ID: {}",
        user.id
    )))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Reply<Option<User>>, UserError> {
    let user = state.users.get_user_by_id(id).await?;
    Ok(Reply::ok(user))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Reply<&'static str>, UserError> {
    state.users.update_user(id, payload).await?;
    Ok(Reply::ok("User updated successfully"))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Reply<&'static str>, UserError> {
    state.users.delete_user(id).await?;
    Ok(Reply::ok("User deleted successfully"))
}

#[instrument(skip(state))]
pub async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Reply<Vec<User>>, UserError> {
    let users = state.users.get_all_users().await?;
    Ok(Reply::ok(users))
}

#[instrument(skip(state))]
pub async fn find_users(
    State(state): State<AppState>,
    Query(query): Query<FindUsersQuery>,
) -> Result<Reply<Vec<User>>, UserError> {
    let users = state.users.find_users(query).await?;
    Ok(Reply::ok(users))
}

#[instrument(skip(state, payload))]
pub async fn bulk_create(
    State(state): State<AppState>,
    Json(payload): Json<BulkCreateRequest>,
) -> Reply<BulkReport> {
    let report = state.users.bulk_create(payload.users).await;
    info!(created = report.created, failed = report.failed, "bulk request done");
    Reply::ok(report)
}
