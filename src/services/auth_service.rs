//! Authentication service - Handles registration, login and session tokens.
//!
//! SOLID (SRP): Handles authentication concerns only.
//! DDD: Uses domain Password value object for hashing.
//! DDD: Uses Unit of Work for repository access.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewUser, UnitOfWork};

#[cfg(test)]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// A signed-in user together with the session credential issued for them
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new customer account and sign it in
    async fn register(&self, name: String, email: String, password: String) -> AppResult<Session>;

    /// Check credentials and issue a session token
    async fn login(&self, email: String, password: String) -> AppResult<Session>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Replace the caller's password after checking the current one
    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()>;
}

/// Sign a session token for `user`
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.jwt_expiration_days);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<Session> {
        // Field shapes are validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::validation("User already exists"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                name,
                email,
                password_hash,
                role: UserRole::User,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        let token = generate_token(&user, &self.config)?;
        Ok(Session { user, token })
    }

    async fn login(&self, email: String, password: String) -> AppResult<Session> {
        let user = self.uow.users().find_by_email(&email).await?;

        // Verify against a dummy hash for unknown emails so both failure paths
        // take the same time and return the same error.
        let stored_password = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored_password.verify(&password);

        match user {
            Some(user) if password_valid => {
                let token = generate_token(&user, &self.config)?;
                Ok(Session { user, token })
            }
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn change_password(
        &self,
        user_id: Uuid,
        current_password: String,
        new_password: String,
    ) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;

        if !Password::from_hash(user.password_hash).verify(&current_password) {
            return Err(AppError::unauthorized("Current password is incorrect"));
        }

        let password_hash = Password::new(&new_password)?.into_string();
        self.uow.users().update_password(user_id, password_hash).await?;

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }
}
