use std::collections::BTreeMap;

use axum::{extract::State, routing::get, Json, Router};
use tracing::{info, instrument};

use crate::{
    auth::services::AuthUser,
    content::{
        dto::{Content, UpdateContentRequest},
        homepage::load_homepage,
    },
    envelope::Envelope,
    error::{AppError, AppResult, DataError},
    extract::{ApiJson, ApiPath},
    state::AppState,
};

pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/content", get(list_content))
        .route("/content/:key", get(get_content).put(update_content))
        .route("/homepage", get(homepage))
}

#[instrument(skip(state))]
pub async fn list_content(State(state): State<AppState>) -> AppResult<Json<Envelope<Vec<Content>>>> {
    Ok(Json(Envelope::ok(state.content.list().await?)))
}

#[instrument(skip(state))]
pub async fn get_content(
    State(state): State<AppState>,
    ApiPath(key): ApiPath<String>,
) -> AppResult<Json<Envelope<Content>>> {
    let block = state
        .content
        .get(&key)
        .await?
        .ok_or_else(|| DataError::NotFound(format!("no content for key {key}")))?;
    Ok(Json(Envelope::ok(block)))
}

#[instrument(skip(state, body))]
pub async fn update_content(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(key): ApiPath<String>,
    ApiJson(body): ApiJson<UpdateContentRequest>,
) -> AppResult<Json<Envelope<Content>>> {
    let text = body.content.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("content must not be empty".into()));
    }
    let block = state.content.upsert(&key, text).await?;
    info!(%user_id, key = %block.key, "content saved");
    Ok(Json(Envelope::ok(block)))
}

#[instrument(skip(state))]
pub async fn homepage(State(state): State<AppState>) -> Json<Envelope<BTreeMap<String, String>>> {
    Json(Envelope::ok(load_homepage(state.content.as_ref()).await))
}
