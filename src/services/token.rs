//! Signed bearer token codec

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Token claim set. Ephemeral: lives only inside a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's unique identifier (e-mail).
    pub sub: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Any additional claims the caller attached at issue time.
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

/// Encodes and decodes HS256-signed bearer tokens.
///
/// The signing key and TTL are fixed at construction from configuration.
/// Expiry is *not* checked by [`parse`](TokenCodec::parse); callers decide
/// via [`is_expired`](TokenCodec::is_expired).
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: Duration::minutes(config.token_ttl_minutes as i64),
        }
    }

    /// Issue a signed token for `subject` with no extra claims.
    pub fn issue(&self, subject: &str) -> AppResult<String> {
        self.issue_with_claims(subject, Map::new())
    }

    /// Issue a signed token carrying additional claims.
    pub fn issue_with_claims(&self, subject: &str, extra: Map<String, Value>) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            extra,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Fault(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and shape, returning the claims.
    ///
    /// Fails with [`AppError::InvalidToken`] on a bad signature, malformed
    /// encoding, or missing `sub`/`exp` claims.
    pub fn parse(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);
        // Expiry is a separate check, not a parse failure.
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    pub fn is_expired(&self, claims: &Claims) -> bool {
        claims.exp <= Utc::now().timestamp()
    }
}
