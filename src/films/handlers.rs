use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::services::AuthUser,
    envelope::{Envelope, Outcome},
    error::{AppError, AppResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    films::{
        dto::{Film, FilmPatch, FilmStatus},
        filter::FilmFilter,
        validation::validate_new_film,
    },
    state::AppState,
};

/// Body of `POST /films`; raw form input, checked before insert.
#[derive(Debug, Deserialize)]
pub struct CreateFilmRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FilmStatus,
}

pub fn films_routes() -> Router<AppState> {
    Router::new()
        .route("/films", get(list_films).post(create_film))
        .route(
            "/films/:id",
            get(get_film).patch(update_film).delete(delete_film),
        )
}

#[instrument(skip(state))]
pub async fn list_films(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<FilmFilter>,
) -> AppResult<Json<Envelope<Vec<Film>>>> {
    let films = state.films.list().await?;
    let visible: Vec<Film> = films.into_iter().filter(|f| filter.matches(f)).collect();
    Ok(Json(Envelope::ok(visible)))
}

#[instrument(skip(state))]
pub async fn get_film(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Envelope<Film>>> {
    let film = state.films.get(id).await?;
    Ok(Json(Envelope::ok(film)))
}

#[instrument(skip(state, body))]
pub async fn create_film(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiJson(body): ApiJson<CreateFilmRequest>,
) -> AppResult<(StatusCode, Json<Envelope<Film>>)> {
    let new_film = validate_new_film(&body.title, &body.description, body.status).map_err(
        |fields| AppError::InvalidForm {
            message: "Film form is invalid".into(),
            fields: serde_json::to_value(fields).unwrap_or_default(),
        },
    )?;

    let film = state.films.create(new_film).await?;
    info!(%user_id, film_id = %film.id, "film created");
    Ok((StatusCode::CREATED, Json(Envelope::ok(film))))
}

#[instrument(skip(state, patch))]
pub async fn update_film(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<FilmPatch>,
) -> AppResult<Json<Envelope<Film>>> {
    let film = state.films.update(id, patch).await?;
    info!(%user_id, film_id = %film.id, status = %film.status, "film updated");
    Ok(Json(Envelope::ok(film)))
}

#[instrument(skip(state))]
pub async fn delete_film(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> AppResult<Json<Outcome>> {
    state.films.delete(id).await?;
    info!(%user_id, film_id = %id, "film deleted");
    Ok(Json(Outcome::success()))
}
