use std::collections::BTreeMap;

use crate::films::dto::{FilmStatus, NewFilm};

pub const TITLE_MIN_CHARS: usize = 3;
pub const DESCRIPTION_MIN_CHARS: usize = 10;

/// Length as a browser form counts it: UTF-16 code units, so an emoji is two.
fn form_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Per-field messages keyed by field name (`title`, `description`).
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Checks the create-film form and returns the trimmed record to insert.
pub fn validate_new_film(
    title: &str,
    description: &str,
    status: FilmStatus,
) -> Result<NewFilm, FieldErrors> {
    let title = title.trim();
    let description = description.trim();
    let mut errors = FieldErrors::new();

    if title.is_empty() {
        errors.insert("title", "Title is required".into());
    } else if form_len(title) < TITLE_MIN_CHARS {
        errors.insert(
            "title",
            format!("Title must be at least {TITLE_MIN_CHARS} characters long"),
        );
    }

    if description.is_empty() {
        errors.insert("description", "Description is required".into());
    } else if form_len(description) < DESCRIPTION_MIN_CHARS {
        errors.insert(
            "description",
            format!("Description must be at least {DESCRIPTION_MIN_CHARS} characters long"),
        );
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(NewFilm {
        title: title.to_string(),
        description: description.to_string(),
        status,
    })
}
