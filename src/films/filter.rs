use serde::Deserialize;

use crate::films::dto::{Film, FilmStatus};

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Draft,
    Published,
}

impl StatusFilter {
    fn admits(self, status: FilmStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Draft => status == FilmStatus::Draft,
            StatusFilter::Published => status == FilmStatus::Published,
        }
    }
}

/// Search term plus status filter applied to an already-fetched list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct FilmFilter {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub status: StatusFilter,
}

impl FilmFilter {
    /// Case-insensitive match on title or description.
    pub fn matches(&self, film: &Film) -> bool {
        if !self.status.admits(film.status) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                film.title.to_lowercase().contains(&term)
                    || film.description.to_lowercase().contains(&term)
            }
        }
    }

    pub fn apply<'a>(&self, films: &'a [Film]) -> Vec<&'a Film> {
        films.iter().filter(|f| self.matches(f)).collect()
    }
}
