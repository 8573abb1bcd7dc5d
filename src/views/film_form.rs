use std::sync::Arc;

use crate::films::{
    dto::{Film, FilmStatus},
    repo::FilmRepo,
    validation::{validate_new_film, FieldErrors},
};
use crate::session::SessionContext;
use crate::views::{Route, ViewError, ViewState};

/// The "new film" form. Validation runs before any request is made.
pub struct FilmForm {
    films: Arc<dyn FilmRepo>,
    session: SessionContext,
    pub title: String,
    pub description: String,
    pub status: FilmStatus,
    pub errors: FieldErrors,
    pub submission: ViewState<Film>,
}

impl FilmForm {
    pub fn new(films: Arc<dyn FilmRepo>, session: SessionContext) -> Self {
        Self {
            films,
            session,
            title: String::new(),
            description: String::new(),
            status: FilmStatus::Draft,
            errors: FieldErrors::new(),
            submission: ViewState::Idle,
        }
    }

    pub fn is_available(&self) -> bool {
        self.session.is_signed_in()
    }

    pub fn set_title(&mut self, value: &str) {
        self.title = value.to_string();
        self.errors.remove("title");
    }

    pub fn set_description(&mut self, value: &str) {
        self.description = value.to_string();
        self.errors.remove("description");
    }

    pub fn set_status(&mut self, status: FilmStatus) {
        self.status = status;
    }

    /// Validates, then creates the film. Returns the new film's route.
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        let new_film = match validate_new_film(&self.title, &self.description, self.status) {
            Ok(f) => f,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(ViewError::Invalid(errors));
            }
        };
        self.errors.clear();

        let pending = self.submission.begin().ok_or(ViewError::Busy)?;
        let res = self.films.create(new_film).await;
        let outcome = match &res {
            Ok(film) => Ok(Route::FilmDetail(film.id)),
            Err(e) => Err(ViewError::Data(e.clone())),
        };
        pending.settle(res);
        outcome
    }
}
