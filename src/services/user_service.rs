//! User service - Handles profile use cases.
//!
//! SOLID (SRP): Handles user-related use cases only.
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{ProfileUpdate, User};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(test)]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Update name, phone or avatar of a user
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("User")
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        update.validate()?;

        if update.is_empty() {
            return self.get_user(id).await;
        }

        let user = self.uow.users().update_profile(id, update).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(user)
    }
}
