use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::DataError;
use crate::films::dto::{Film, FilmPatch, NewFilm};
use crate::films::repo_types::FilmRow;

/// Data-access contract for film records.
///
/// Every method is a single round trip to the store and never panics on
/// backend failure; failures come back as a tagged [`DataError`]. No
/// validation happens here.
#[async_trait]
pub trait FilmRepo: Send + Sync {
    /// All films, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Film>, DataError>;

    async fn get(&self, id: Uuid) -> Result<Film, DataError>;

    /// Inserts a film; the store assigns the id and both timestamps.
    async fn create(&self, film: NewFilm) -> Result<Film, DataError>;

    /// Applies `patch` and advances `updated_at`.
    async fn update(&self, id: Uuid, patch: FilmPatch) -> Result<Film, DataError>;

    /// Removes the film. Deleting an absent id is `NotFound`, not a no-op.
    async fn delete(&self, id: Uuid) -> Result<(), DataError>;

    /// Row count; doubles as the connection test.
    async fn count(&self) -> Result<i64, DataError>;
}

#[derive(Clone)]
pub struct PgFilmRepo {
    db: PgPool,
}

impl PgFilmRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FilmRepo for PgFilmRepo {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Film>, DataError> {
        let rows = sqlx::query_as::<_, FilmRow>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM films
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        debug!(count = rows.len(), "films listed");
        rows.into_iter().map(Film::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn get(&self, id: Uuid) -> Result<Film, DataError> {
        let row = sqlx::query_as::<_, FilmRow>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM films
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| DataError::not_found("film"))?;
        Film::try_from(row)
    }

    #[instrument(skip(self, film), fields(title = %film.title))]
    async fn create(&self, film: NewFilm) -> Result<Film, DataError> {
        let row = sqlx::query_as::<_, FilmRow>(
            r#"
            INSERT INTO films (title, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(&film.title)
        .bind(&film.description)
        .bind(film.status.as_str())
        .fetch_one(&self.db)
        .await?;
        debug!(film_id = %row.id, "film created");
        Film::try_from(row)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: FilmPatch) -> Result<Film, DataError> {
        // clock_timestamp() moves inside a transaction; the GREATEST keeps
        // updated_at strictly increasing even on coarse clocks.
        let row = sqlx::query_as::<_, FilmRow>(
            r#"
            UPDATE films
            SET title       = COALESCE($2, title),
                description = COALESCE($3, description),
                status      = COALESCE($4, status),
                updated_at  = GREATEST(clock_timestamp(), updated_at + interval '1 microsecond')
            WHERE id = $1
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.title)
        .bind(patch.description)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| DataError::not_found("film"))?;
        Film::try_from(row)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), DataError> {
        let res = sqlx::query(r#"DELETE FROM films WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(DataError::not_found("film"));
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, DataError> {
        let (n,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM films"#)
            .fetch_one(&self.db)
            .await?;
        Ok(n)
    }
}
