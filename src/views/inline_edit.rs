use std::sync::Arc;

use tracing::warn;

use crate::content::repo::ContentRepo;
use crate::error::DataError;
use crate::session::SessionContext;

const SCHEMA_MISSING_HINT: &str =
    "Content table not found. Run the database migrations to enable inline editing.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Display,
    Editing,
    Saving,
    Failed(String),
}

/// Click-to-edit text bound to one content key.
pub struct InlineEditor {
    key: String,
    content: Arc<dyn ContentRepo>,
    session: SessionContext,
    placeholder: String,
    saved: String,
    pub draft: String,
    pub mode: EditorMode,
}

impl InlineEditor {
    pub fn new(
        key: impl Into<String>,
        initial: impl Into<String>,
        content: Arc<dyn ContentRepo>,
        session: SessionContext,
    ) -> Self {
        let initial = initial.into();
        Self {
            key: key.into(),
            content,
            session,
            placeholder: "Click to edit...".into(),
            draft: initial.clone(),
            saved: initial,
            mode: EditorMode::Display,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn text(&self) -> &str {
        if self.saved.is_empty() {
            &self.placeholder
        } else {
            &self.saved
        }
    }

    /// Enters edit mode; anonymous visitors only ever see the text.
    pub fn begin_edit(&mut self) -> bool {
        if !self.session.is_signed_in() {
            return false;
        }
        self.mode = EditorMode::Editing;
        true
    }

    pub fn set_draft(&mut self, value: &str) {
        self.draft = value.to_string();
    }

    pub fn can_save(&self) -> bool {
        !self.draft.trim().is_empty() && self.mode != EditorMode::Saving
    }

    pub fn cancel(&mut self) {
        self.draft = self.saved.clone();
        self.mode = EditorMode::Display;
    }

    /// Saves the trimmed draft. A blank draft is ignored.
    pub async fn save(&mut self) -> Result<(), DataError> {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return Ok(());
        }

        self.mode = EditorMode::Saving;
        match self.content.upsert(&self.key, &text).await {
            Ok(block) => {
                self.saved = block.content;
                self.draft = self.saved.clone();
                self.mode = EditorMode::Display;
                Ok(())
            }
            Err(e) => {
                warn!(key = %self.key, kind = e.kind(), error = %e, "inline save failed");
                let message = match &e {
                    DataError::SchemaMissing(_) => SCHEMA_MISSING_HINT.to_string(),
                    other => format!("Failed to save content: {other}"),
                };
                self.mode = EditorMode::Failed(message);
                Err(e)
            }
        }
    }
}
