use std::sync::Arc;

use crate::films::{
    dto::Film,
    filter::{FilmFilter, StatusFilter},
    repo::FilmRepo,
};
use crate::session::SessionContext;
use crate::views::{Route, ViewError, ViewState};

pub struct FilmListView {
    films: Arc<dyn FilmRepo>,
    session: SessionContext,
    pub state: ViewState<Vec<Film>>,
    pub filter: FilmFilter,
}

impl FilmListView {
    pub fn new(films: Arc<dyn FilmRepo>, session: SessionContext) -> Self {
        Self {
            films,
            session,
            state: ViewState::Idle,
            filter: FilmFilter::default(),
        }
    }

    /// Fetches the list; also used to retry after a failure.
    pub async fn load(&mut self) -> Result<(), ViewError> {
        let pending = self.state.begin().ok_or(ViewError::Busy)?;
        let res = self.films.list().await;
        let outcome = res.as_ref().map(|_| ()).map_err(|e| ViewError::Data(e.clone()));
        pending.settle(res);
        outcome
    }

    pub fn set_search(&mut self, term: &str) {
        self.filter.search = Some(term.to_string()).filter(|t| !t.trim().is_empty());
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Loaded films that pass the current filter, newest first.
    pub fn visible(&self) -> Vec<&Film> {
        match self.state.ready() {
            Some(films) => self.filter.apply(films),
            None => Vec::new(),
        }
    }

    /// The "new film" affordance is only offered to signed-in users.
    pub fn create_link(&self) -> Option<Route> {
        self.session.is_signed_in().then_some(Route::NewFilm)
    }
}
