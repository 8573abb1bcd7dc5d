use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Publication status of a film.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FilmStatus {
    #[default]
    Draft,
    Published,
}

impl FilmStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FilmStatus::Draft => "draft",
            FilmStatus::Published => "published",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FilmStatus::Draft => FilmStatus::Published,
            FilmStatus::Published => FilmStatus::Draft,
        }
    }
}

impl fmt::Display for FilmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilmStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(FilmStatus::Draft),
            "published" => Ok(FilmStatus::Published),
            other => Err(format!("unknown film status: {other}")),
        }
    }
}

/// A film record as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Film {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: FilmStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Film {
    pub fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// Fields supplied when inserting a film.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFilm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: FilmStatus,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilmPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FilmStatus>,
}

impl FilmPatch {
    pub fn status(status: FilmStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
