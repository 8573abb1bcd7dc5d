//! In-process store backing every repo trait. Used when no database is
//! configured and by the test suite.

use std::collections::HashMap;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{repo::UserRepo, repo_types::User};
use crate::content::{dto::Content, repo::ContentRepo};
use crate::error::DataError;
use crate::films::{
    dto::{Film, FilmPatch, NewFilm},
    repo::FilmRepo,
};

#[derive(Default)]
struct Tables {
    films: HashMap<Uuid, Film>,
    content: HashMap<String, Content>,
    users: HashMap<Uuid, User>,
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    content_table: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            content_table: true,
        }
    }

    /// Behaves like a deployment whose `content` table was never created.
    pub fn without_content_table() -> Self {
        Self {
            content_table: false,
            ..Self::new()
        }
    }

    fn content_table(&self) -> Result<(), DataError> {
        if self.content_table {
            Ok(())
        } else {
            Err(DataError::SchemaMissing(
                r#"relation "content" does not exist"#.into(),
            ))
        }
    }
}

/// Wall clock, bumped past `previous` so successive writes stay ordered.
fn next_timestamp(previous: OffsetDateTime) -> OffsetDateTime {
    OffsetDateTime::now_utc().max(previous + Duration::microseconds(1))
}

/// Same rule as the `films` check constraints: stored text is never blank.
fn require_text(title: Option<&str>, description: Option<&str>) -> Result<(), DataError> {
    if [title, description]
        .into_iter()
        .flatten()
        .any(|t| t.trim().is_empty())
    {
        return Err(DataError::ValidationFailed(
            "title and description must not be empty".into(),
        ));
    }
    Ok(())
}

/// Postgres keeps microseconds; match it so values survive a round trip.
fn now() -> OffsetDateTime {
    let t = OffsetDateTime::now_utc();
    t.replace_nanosecond(t.nanosecond() / 1_000 * 1_000).unwrap_or(t)
}

#[async_trait]
impl FilmRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Film>, DataError> {
        let tables = self.tables.read().await;
        let mut films: Vec<Film> = tables.films.values().cloned().collect();
        films.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(films)
    }

    async fn get(&self, id: Uuid) -> Result<Film, DataError> {
        self.tables
            .read()
            .await
            .films
            .get(&id)
            .cloned()
            .ok_or_else(|| DataError::not_found("film"))
    }

    async fn create(&self, film: NewFilm) -> Result<Film, DataError> {
        require_text(Some(&film.title), Some(&film.description))?;
        let mut tables = self.tables.write().await;
        let latest = tables.films.values().map(|f| f.created_at).max();
        let created_at = match latest {
            Some(prev) => next_timestamp(prev).max(now()),
            None => now(),
        };
        let record = Film {
            id: Uuid::new_v4(),
            title: film.title,
            description: film.description,
            status: film.status,
            created_at,
            updated_at: created_at,
        };
        tables.films.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: FilmPatch) -> Result<Film, DataError> {
        require_text(patch.title.as_deref(), patch.description.as_deref())?;
        let mut tables = self.tables.write().await;
        let film = tables
            .films
            .get_mut(&id)
            .ok_or_else(|| DataError::not_found("film"))?;
        if let Some(title) = patch.title {
            film.title = title;
        }
        if let Some(description) = patch.description {
            film.description = description;
        }
        if let Some(status) = patch.status {
            film.status = status;
        }
        film.updated_at = next_timestamp(film.updated_at);
        Ok(film.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DataError> {
        self.tables
            .write()
            .await
            .films
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DataError::not_found("film"))
    }

    async fn count(&self) -> Result<i64, DataError> {
        Ok(self.tables.read().await.films.len() as i64)
    }
}

#[async_trait]
impl ContentRepo for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Content>, DataError> {
        self.content_table()?;
        Ok(self.tables.read().await.content.get(key).cloned())
    }

    async fn upsert(&self, key: &str, content: &str) -> Result<Content, DataError> {
        self.content_table()?;
        let mut tables = self.tables.write().await;
        let block = tables
            .content
            .entry(key.to_string())
            .and_modify(|b| {
                b.content = content.to_string();
                b.updated_at = next_timestamp(b.updated_at);
            })
            .or_insert_with(|| {
                let at = now();
                Content {
                    id: Uuid::new_v4(),
                    key: key.to_string(),
                    content: content.to_string(),
                    created_at: at,
                    updated_at: at,
                }
            });
        Ok(block.clone())
    }

    async fn list(&self) -> Result<Vec<Content>, DataError> {
        self.content_table()?;
        let mut blocks: Vec<Content> = self.tables.read().await.content.values().cloned().collect();
        blocks.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(blocks)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DataError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DataError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create(
        &self,
        email: &str,
        password_hash: &str,
        name: Option<&str>,
    ) -> Result<User, DataError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(DataError::ValidationFailed(format!(
                "email {email} already exists"
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.map(str::to_string),
            avatar_url: None,
            created_at: now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}
