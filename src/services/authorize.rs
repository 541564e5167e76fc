//! Bearer-token authorization

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
    services::token::TokenCodec,
    store::UserStore,
};

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves a bearer header to a user record and checks the role gate.
#[derive(Clone)]
pub struct Authorizer {
    codec: Arc<TokenCodec>,
    users: Arc<dyn UserStore>,
}

impl Authorizer {
    pub fn new(codec: Arc<TokenCodec>, users: Arc<dyn UserStore>) -> Self {
        Self { codec, users }
    }

    /// Validate the `Authorization` header value against `required` and
    /// return the authenticated user.
    ///
    /// Roles compare by exact equality: an admin token does not pass a
    /// user-gated check. The audit events are observability only and carry
    /// no control flow.
    pub async fn authorize(&self, header_value: &str, required: Role) -> AppResult<User> {
        let token = header_value
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AppError::MalformedHeader)?;

        let claims = self.codec.parse(token)?;
        if self.codec.is_expired(&claims) {
            return Err(AppError::InvalidToken);
        }

        let user = match self.users.find_by_identifier(&claims.sub).await? {
            Some(user) => user,
            None => {
                tracing::warn!(subject = %claims.sub, "User not found");
                return Err(AppError::Unauthorized(format!(
                    "User with identifier '{}' not found",
                    claims.sub
                )));
            }
        };

        if user.role != required {
            tracing::warn!(
                subject = %claims.sub,
                required = %required,
                actual = %user.role,
                "User is not authorized with required role"
            );
            return Err(AppError::Unauthorized(format!(
                "User '{}' does not have role '{}'",
                claims.sub, required
            )));
        }

        tracing::info!(subject = %claims.sub, role = %required, "User authorized");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AuthConfig, store::MockUserStore};

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_ttl_minutes: 30,
        }))
    }

    fn user(email: &str, role: Role) -> User {
        User::new("Stanko Stankovic", email, "hash".into(), role)
    }

    #[tokio::test]
    async fn test_authorize_happy_path() {
        let codec = codec();
        let mut users = MockUserStore::new();
        let stored = user("stanko@example.com", Role::User);
        let returned = stored.clone();
        users
            .expect_find_by_identifier()
            .returning(move |_| Ok(Some(returned.clone())));

        let authorizer = Authorizer::new(codec.clone(), Arc::new(users));
        let token = codec.issue("stanko@example.com").unwrap();
        let header = format!("Bearer {}", token);

        let authorized = authorizer.authorize(&header, Role::User).await.unwrap();
        assert_eq!(authorized.id, stored.id);
    }

    #[tokio::test]
    async fn test_missing_bearer_prefix_fails_before_parsing() {
        // A mock with no expectations panics if the store is ever consulted.
        let users = MockUserStore::new();
        let authorizer = Authorizer::new(codec(), Arc::new(users));

        let err = authorizer
            .authorize("Token xyz", Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedHeader));
    }

    #[tokio::test]
    async fn test_role_mismatch_is_unauthorized() {
        let codec = codec();
        let mut users = MockUserStore::new();
        let stored = user("stanko@example.com", Role::User);
        users
            .expect_find_by_identifier()
            .returning(move |_| Ok(Some(stored.clone())));

        let authorizer = Authorizer::new(codec.clone(), Arc::new(users));
        let token = codec.issue("stanko@example.com").unwrap();
        let header = format!("Bearer {}", token);

        // A valid USER token against an ADMIN gate.
        let err = authorizer.authorize(&header, Role::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_unknown_subject_is_unauthorized() {
        let codec = codec();
        let mut users = MockUserStore::new();
        users.expect_find_by_identifier().returning(|_| Ok(None));

        let authorizer = Authorizer::new(codec.clone(), Arc::new(users));
        let token = codec.issue("ghost@example.com").unwrap();
        let header = format!("Bearer {}", token);

        let err = authorizer.authorize(&header, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_expired_token_never_authorizes() {
        use jsonwebtoken::{encode, EncodingKey, Header};
        use serde_json::Map;

        let codec = codec();
        let users = MockUserStore::new();
        let authorizer = Authorizer::new(codec, Arc::new(users));

        let claims = crate::services::token::Claims {
            sub: "stanko@example.com".to_string(),
            iat: chrono::Utc::now().timestamp() - 3600,
            exp: chrono::Utc::now().timestamp() - 1,
            extra: Map::new(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();
        let header = format!("Bearer {}", token);

        let err = authorizer.authorize(&header, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn test_tampered_token_is_invalid() {
        let codec = codec();
        let users = MockUserStore::new();
        let authorizer = Authorizer::new(codec.clone(), Arc::new(users));

        let mut token = codec.issue("stanko@example.com").unwrap();
        token.push('x');
        let header = format!("Bearer {}", token);

        let err = authorizer.authorize(&header, Role::User).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
