mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod services;
pub mod timeline;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::goal_routes()
}
