//! Presentation state machines driven by the data-access layer.
//!
//! Every view operation is an `async fn` taking `&mut self`, and the request
//! lives inside the returned future. [`ViewState::begin`] hands out a
//! [`Pending`] guard: it refuses a second request while one is in flight,
//! and if the future is dropped before the guard settles, the state falls
//! back to `Idle` instead of staying `Pending`.

pub mod film_detail;
pub mod film_form;
pub mod film_list;
pub mod inline_edit;
pub mod route;

use crate::error::DataError;
use crate::films::validation::FieldErrors;

pub use film_detail::{DeleteState, FilmDetailView};
pub use film_form::FilmForm;
pub use film_list::FilmListView;
pub use inline_edit::{EditorMode, InlineEditor};
pub use route::Route;

/// `Idle → Pending → Ready | Failed`; a failed view may go back to Pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Idle,
    Pending,
    Ready(T),
    Failed(DataError),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// Moves to `Pending`. Returns `None` if a request is already pending.
    pub fn begin(&mut self) -> Option<Pending<'_, T>> {
        if self.is_pending() {
            return None;
        }
        *self = ViewState::Pending;
        Some(Pending {
            state: self,
            settled: false,
        })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ViewState::Pending)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DataError> {
        match self {
            ViewState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// In-flight request on a [`ViewState`].
pub struct Pending<'a, T> {
    state: &'a mut ViewState<T>,
    settled: bool,
}

impl<T> Pending<'_, T> {
    pub fn settle(mut self, res: Result<T, DataError>) {
        *self.state = match res {
            Ok(v) => ViewState::Ready(v),
            Err(e) => ViewState::Failed(e),
        };
        self.settled = true;
    }
}

impl<T> Drop for Pending<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            *self.state = ViewState::Idle;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("a request is already in flight")]
    Busy,

    #[error("nothing has been loaded yet")]
    NotLoaded,

    #[error("delete has not been confirmed")]
    NotConfirmed,

    #[error("form has invalid fields")]
    Invalid(FieldErrors),

    #[error(transparent)]
    Data(#[from] DataError),
}
