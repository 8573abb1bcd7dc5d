//! Explicit session context handed to every view.
//!
//! A [`SessionContext`] is created once at start-up (anonymous), established
//! when the user signs in and invalidated on sign-out. Clones share the same
//! session, so a sign-out is seen by every view holding a handle.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::auth::dto::{AuthResponse, PublicUser};

/// Credentials and profile of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthResponse> for SignedIn {
    fn from(r: AuthResponse) -> Self {
        Self {
            user: r.user,
            access_token: r.access_token,
            refresh_token: r.refresh_token,
        }
    }
}

#[derive(Clone)]
pub struct SessionContext {
    tx: Arc<watch::Sender<Option<SignedIn>>>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl SessionContext {
    pub fn anonymous() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn signed_in(session: SignedIn) -> Self {
        let ctx = Self::anonymous();
        ctx.establish(session);
        ctx
    }

    pub fn establish(&self, session: SignedIn) {
        info!(user_id = %session.user.id, "session established");
        self.tx.send_replace(Some(session));
    }

    /// Replaces the tokens after a refresh, keeping the user.
    pub fn refresh_tokens(&self, access_token: String, refresh_token: String) {
        self.tx.send_if_modified(|current| match current {
            Some(s) => {
                s.access_token = access_token;
                s.refresh_token = refresh_token;
                true
            }
            None => false,
        });
    }

    pub fn invalidate(&self) {
        if let Some(prev) = self.tx.send_replace(None) {
            info!(user_id = %prev.user.id, "session invalidated");
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn user(&self) -> Option<PublicUser> {
        self.tx.borrow().as_ref().map(|s| s.user.clone())
    }

    pub fn access_token(&self) -> Option<String> {
        self.tx.borrow().as_ref().map(|s| s.access_token.clone())
    }

    /// Notified on every sign-in, refresh and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<SignedIn>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
pub(crate) fn test_session() -> SignedIn {
    SignedIn {
        user: PublicUser {
            id: uuid::Uuid::new_v4(),
            email: "editor@arteeast.org".into(),
            name: Some("Editor".into()),
            avatar_url: None,
        },
        access_token: "access".into(),
        refresh_token: "refresh".into(),
    }
}
