mod dto;
mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod password;
mod reply;
pub mod repo;
mod repo_types;
pub mod services;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
