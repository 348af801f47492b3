//! User repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::{ProfileUpdate, User, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};

#[cfg(test)]
use mockall::automock;

/// Data for a new user row. The password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// User repository trait for dependency injection.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by email address (exact, case-sensitive match)
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create a new user
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Apply a profile update
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User>;

    /// Replace the stored password hash
    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()>;
}

/// SeaORM-backed user repository
pub struct UserStore {
    db: Arc<DatabaseConnection>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<user::Model> {
        UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(AppError::from)?;

        Ok(result.map(User::from))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash),
            avatar: Set(None),
            phone: Set(None),
            role: Set(user.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_profile(&self, id: Uuid, update: ProfileUpdate) -> AppResult<User> {
        let mut active: ActiveModel = self.find_model(id).await?.into();

        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(phone) = update.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(avatar) = update.avatar {
            active.avatar = Set(Some(avatar));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update_password(&self, id: Uuid, password_hash: String) -> AppResult<()> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.password_hash = Set(password_hash);
        active.updated_at = Set(chrono::Utc::now());

        active.update(self.db.as_ref()).await.map_err(AppError::from)?;
        Ok(())
    }
}
