use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::DataError;
use crate::films::dto::Film;

/// Row shape of the `films` table; `status` is stored as text.
#[derive(Debug, FromRow)]
pub struct FilmRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl TryFrom<FilmRow> for Film {
    type Error = DataError;

    fn try_from(r: FilmRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            title: r.title,
            description: r.description,
            status: r.status.parse().map_err(DataError::Transport)?,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}
