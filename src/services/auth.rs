//! Registration and login

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Role, User},
    services::token::TokenCodec,
    store::UserStore,
};

/// New-account submission.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name can't be blank"))]
    pub name: String,
    #[validate(email(message = "Not a valid e-mail address"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

/// Successful registration or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
}

impl AuthResponse {
    fn bearer(token: String) -> Self {
        Self {
            token,
            token_type: "Bearer",
        }
    }
}

/// Creates accounts and exchanges credentials for signed tokens.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, codec: Arc<TokenCodec>) -> Self {
        Self { users, codec }
    }

    /// Register a new user and issue their first token.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<(AuthResponse, User)> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self
            .users
            .find_by_identifier(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Email already taken".to_string()));
        }

        let password_hash = self.hash_password(&request.password)?;
        let user = User::new(&request.name, &request.email, password_hash, request.role);
        let user = self.users.save(user).await?;

        tracing::info!(user = %user.email, role = %user.role, "User registered");

        let token = self.codec.issue(&user.email)?;
        Ok((AuthResponse::bearer(token), user))
    }

    /// Exchange credentials for a fresh token.
    ///
    /// Unknown e-mail and wrong password fail identically.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<AuthResponse> {
        let invalid = || AppError::Authentication("Invalid login or password".to_string());

        let user = self
            .users
            .find_by_identifier(email)
            .await?
            .ok_or_else(invalid)?;

        if !self.verify_password(&user, password)? {
            return Err(invalid());
        }

        let token = self.codec.issue(&user.email)?;
        Ok(AuthResponse::bearer(token))
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Fault(format!("Failed to hash password: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Fault("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
