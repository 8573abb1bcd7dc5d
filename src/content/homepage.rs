use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::warn;

use crate::content::repo::ContentRepo;

pub const HOMEPAGE_KEYS: [&str; 4] = [
    "homepage_subtitle",
    "homepage_description",
    "film_management_description",
    "admin_tools_description",
];

const FALLBACK_COPY: &str = "Click to edit this content...";

/// Copy shown for a key that has never been saved.
pub fn default_copy(key: &str) -> &'static str {
    match key {
        "homepage_subtitle" => "Contemporary arts from the Middle East and North Africa",
        "homepage_description" => {
            "A modern, streamlined CMS built specifically for ARTE EAST. Manage films, \
             exhibitions, and content with ease using our custom-built platform."
        }
        "film_management_description" => {
            "Create, edit, and manage film entries with an intuitive interface. Support for \
             drafts, publishing, and inline editing."
        }
        "admin_tools_description" => {
            "Comprehensive admin interface with user management, content moderation, and \
             publishing workflows."
        }
        _ => FALLBACK_COPY,
    }
}

/// Fetches every homepage key concurrently. Keys that are absent, empty or
/// fail to load fall back to their default copy.
pub async fn load_homepage(repo: &dyn ContentRepo) -> BTreeMap<String, String> {
    let results = join_all(HOMEPAGE_KEYS.iter().map(|key| repo.get(key))).await;

    HOMEPAGE_KEYS
        .iter()
        .zip(results)
        .map(|(key, res)| {
            let text = match res {
                Ok(Some(block)) if !block.content.is_empty() => block.content,
                Ok(_) => default_copy(key).to_string(),
                Err(e) => {
                    warn!(key, kind = e.kind(), error = %e, "homepage content unavailable");
                    default_copy(key).to_string()
                }
            };
            (key.to_string(), text)
        })
        .collect()
}
