//! Editor sessions as signed JWTs.
//!
//! Sign-in hands out a pair: a short-lived access token sent with every
//! mutating request, and a refresh token whose only use is minting the next
//! pair. Each token carries its [`TokenKind`], so one cannot stand in for
//! the other.

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub kind: TokenKind,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid or expired token")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token")]
    WrongKind { expected: TokenKind },

    #[error("Could not sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => AppError::Internal(format!("jwt signing failed: {e}")),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtKeys {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::minutes(cfg.ttl_minutes.max(0)),
            refresh_ttl: Duration::minutes(cfg.refresh_ttl_minutes.max(0)),
        }
    }

    fn sign(&self, user_id: Uuid, kind: TokenKind) -> Result<String, TokenError> {
        let issued = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            kind,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: issued.unix_timestamp(),
            exp: (issued + ttl).unix_timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Fresh access + refresh tokens for `user_id`.
    pub fn issue(&self, user_id: Uuid) -> Result<TokenPair, TokenError> {
        let pair = TokenPair {
            access_token: self.sign(user_id, TokenKind::Access)?,
            refresh_token: self.sign(user_id, TokenKind::Refresh)?,
        };
        debug!(%user_id, "token pair issued");
        Ok(pair)
    }

    /// Checks signature, expiry, issuer and audience, then the token kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(TokenError::Invalid)?
            .claims;
        if claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(issuer: &str, audience: &str) -> JwtKeys {
        JwtKeys::new(&JwtConfig {
            secret: "same-secret".into(),
            issuer: issuer.into(),
            audience: audience.into(),
            ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        })
    }

    #[test]
    fn issued_pair_verifies_by_kind() {
        let keys = keys("artecms", "editors");
        let editor = Uuid::new_v4();
        let pair = keys.issue(editor).unwrap();

        let access = keys.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, editor);
        assert_eq!(access.aud, "editors");
        assert_eq!(access.exp - access.iat, 5 * 60);

        let refresh = keys.verify(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.sub, editor);
        assert_eq!(refresh.exp - refresh.iat, 60 * 60);
    }

    #[test]
    fn tokens_do_not_stand_in_for_each_other() {
        let keys = keys("artecms", "editors");
        let pair = keys.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            keys.verify(&pair.access_token, TokenKind::Refresh),
            Err(TokenError::WrongKind { expected: TokenKind::Refresh })
        ));
        assert!(matches!(
            keys.verify(&pair.refresh_token, TokenKind::Access),
            Err(TokenError::WrongKind { expected: TokenKind::Access })
        ));
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let ours = keys("artecms", "editors");
        let theirs = keys("elsewhere", "others");
        let pair = theirs.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(
            ours.verify(&pair.access_token, TokenKind::Access),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn keys_follow_app_config() {
        let keys = JwtKeys::from_ref(&AppState::fake());
        let pair = keys.issue(Uuid::new_v4()).unwrap();
        let claims = keys.verify(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.iss, "test-issuer");
    }

    #[test]
    fn token_errors_are_unauthorized() {
        let err = AppError::from(TokenError::WrongKind {
            expected: TokenKind::Refresh,
        });
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
