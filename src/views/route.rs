use std::fmt;

use uuid::Uuid;

/// Navigable pages; film detail carries the record id in its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    FilmList,
    NewFilm,
    FilmDetail(Uuid),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["films"] => Some(Route::FilmList),
            ["films", "new"] => Some(Route::NewFilm),
            ["films", id] => Uuid::parse_str(id).ok().map(Route::FilmDetail),
            _ => None,
        }
    }

    /// Whether the page is only offered to signed-in users.
    pub fn requires_session(&self) -> bool {
        matches!(self, Route::NewFilm)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Login => f.write_str("/login"),
            Route::FilmList => f.write_str("/films"),
            Route::NewFilm => f.write_str("/films/new"),
            Route::FilmDetail(id) => write!(f, "/films/{id}"),
        }
    }
}
