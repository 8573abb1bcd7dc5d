use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::DataError;
use crate::films::{
    dto::{Film, FilmPatch},
    repo::FilmRepo,
};
use crate::session::SessionContext;
use crate::views::{Route, ViewError, ViewState};

/// Delete flow: a confirmation step sits in front of the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeleteState {
    #[default]
    Idle,
    Confirming,
    Pending,
    Failed(DataError),
    Deleted,
}

pub struct FilmDetailView {
    id: Uuid,
    films: Arc<dyn FilmRepo>,
    session: SessionContext,
    pub state: ViewState<Film>,
    pub status_change: ViewState<()>,
    pub delete: DeleteState,
}

impl FilmDetailView {
    pub fn new(id: Uuid, films: Arc<dyn FilmRepo>, session: SessionContext) -> Self {
        Self {
            id,
            films,
            session,
            state: ViewState::Idle,
            status_change: ViewState::Idle,
            delete: DeleteState::Idle,
        }
    }

    pub fn film(&self) -> Option<&Film> {
        self.state.ready()
    }

    /// Edit and delete controls are hidden from anonymous visitors.
    pub fn can_edit(&self) -> bool {
        self.session.is_signed_in() && self.film().is_some()
    }

    pub async fn load(&mut self) -> Result<(), ViewError> {
        let pending = self.state.begin().ok_or(ViewError::Busy)?;
        let res = self.films.get(self.id).await;
        let outcome = res.as_ref().map(|_| ()).map_err(|e| ViewError::Data(e.clone()));
        pending.settle(res);
        outcome
    }

    /// Flips draft ↔ published. Title and description are untouched.
    pub async fn toggle_status(&mut self) -> Result<(), ViewError> {
        let next = self.film().ok_or(ViewError::NotLoaded)?.status.toggled();
        let pending = self.status_change.begin().ok_or(ViewError::Busy)?;
        match self.films.update(self.id, FilmPatch::status(next)).await {
            Ok(film) => {
                debug!(film_id = %film.id, status = %film.status, "status toggled");
                self.state = ViewState::Ready(film);
                pending.settle(Ok(()));
                Ok(())
            }
            Err(e) => {
                pending.settle(Err(e.clone()));
                Err(e.into())
            }
        }
    }

    pub fn request_delete(&mut self) -> Result<(), ViewError> {
        self.film().ok_or(ViewError::NotLoaded)?;
        self.delete = DeleteState::Confirming;
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        if self.delete == DeleteState::Confirming {
            self.delete = DeleteState::Idle;
        }
    }

    /// Issues the delete once confirmed; on success the caller navigates
    /// to the returned route.
    pub async fn confirm_delete(&mut self) -> Result<Route, ViewError> {
        if self.delete != DeleteState::Confirming {
            return Err(ViewError::NotConfirmed);
        }
        self.delete = DeleteState::Pending;
        match self.films.delete(self.id).await {
            Ok(()) => {
                self.delete = DeleteState::Deleted;
                self.state = ViewState::Idle;
                Ok(Route::FilmList)
            }
            Err(e) => {
                self.delete = DeleteState::Failed(e.clone());
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::films::dto::{FilmStatus, NewFilm};
    use crate::memory::MemoryStore;
    use crate::session::test_session;

    async fn view_of_new_film() -> (FilmDetailView, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let film = FilmRepo::create(
            store.as_ref(),
            NewFilm {
                title: "Test".into(),
                description: "A sufficiently long description.".into(),
                status: FilmStatus::Draft,
            },
        )
        .await
        .unwrap();
        let session = SessionContext::signed_in(test_session());
        (FilmDetailView::new(film.id, store.clone(), session), store)
    }

    #[tokio::test]
    async fn toggle_publishes_and_keeps_text() {
        let (mut view, _) = view_of_new_film().await;
        view.load().await.unwrap();
        assert!(view.can_edit());

        view.toggle_status().await.unwrap();
        let film = view.film().unwrap();
        assert_eq!(film.status, FilmStatus::Published);
        assert_eq!(film.title, "Test");
        assert_eq!(film.description, "A sufficiently long description.");
        assert!(film.was_edited());
        assert_eq!(view.status_change, ViewState::Ready(()));
    }

    #[tokio::test]
    async fn toggle_before_load_is_rejected() {
        let (mut view, _) = view_of_new_film().await;
        assert_eq!(view.toggle_status().await, Err(ViewError::NotLoaded));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (mut view, store) = view_of_new_film().await;
        view.load().await.unwrap();

        assert_eq!(view.confirm_delete().await, Err(ViewError::NotConfirmed));

        view.request_delete().unwrap();
        view.cancel_delete();
        assert_eq!(view.delete, DeleteState::Idle);

        view.request_delete().unwrap();
        assert_eq!(view.confirm_delete().await, Ok(Route::FilmList));
        assert_eq!(view.delete, DeleteState::Deleted);
        assert_eq!(FilmRepo::count(store.as_ref()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_film_fails_the_view() {
        let store = Arc::new(MemoryStore::new());
        let mut view = FilmDetailView::new(Uuid::new_v4(), store, SessionContext::anonymous());
        let err = view.load().await.unwrap_err();
        assert!(matches!(err, ViewError::Data(DataError::NotFound(_))));
        assert!(view.state.error().is_some());
        assert!(!view.can_edit());
    }

    #[tokio::test]
    async fn failed_delete_can_be_retried_after_reconfirming() {
        let (mut view, store) = view_of_new_film().await;
        view.load().await.unwrap();
        FilmRepo::delete(store.as_ref(), view.id).await.unwrap();

        view.request_delete().unwrap();
        assert!(view.confirm_delete().await.is_err());
        assert!(matches!(view.delete, DeleteState::Failed(DataError::NotFound(_))));

        view.request_delete().unwrap();
        assert_eq!(view.delete, DeleteState::Confirming);
    }
}
