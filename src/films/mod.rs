pub mod dto;
pub mod filter;
pub mod handlers;
pub mod repo;
mod repo_types;
pub mod validation;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::films_routes()
}
