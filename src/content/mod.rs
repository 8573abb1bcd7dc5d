pub mod dto;
pub mod handlers;
pub mod homepage;
pub mod repo;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::content_routes()
}
