//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::booking::MOBILE_PATTERN;
use crate::config::{ROLE_ADMIN, ROLE_USER};
use crate::errors::{AppError, AppResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl From<&str> for UserRole {
    fn from(s: &str) -> Self {
        match s {
            ROLE_ADMIN => UserRole::Admin,
            _ => UserRole::User,
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", ROLE_ADMIN),
            UserRole::User => write!(f, "{}", ROLE_USER),
        }
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Fields accepted by a profile update. `None` leaves the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.avatar.is_none()
    }

    /// Check the fields that are present.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Name cannot be empty"));
            }
        }
        if let Some(phone) = &self.phone {
            if !MOBILE_PATTERN.is_match(phone) {
                return Err(AppError::validation("Phone number must be exactly 10 digits"));
            }
        }
        Ok(())
    }
}

/// User profile (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "Asha Verma")]
    pub name: String,
    /// User email address
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Avatar image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Contact phone
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    /// User role
    #[schema(example = "user")]
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            phone: user.phone,
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_update_checks_present_fields() {
        assert!(ProfileUpdate::default().validate().is_ok());

        let short_phone = ProfileUpdate {
            phone: Some("12345".into()),
            ..Default::default()
        };
        assert!(matches!(short_phone.validate(), Err(AppError::Validation(_))));

        let blank_name = ProfileUpdate {
            name: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank_name.validate().is_err());

        let valid = ProfileUpdate {
            name: Some("Asha".into()),
            phone: Some("9876543210".into()),
            avatar: None,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_role_from_str_defaults_to_user() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("user"), UserRole::User);
        assert_eq!(UserRole::from("superuser"), UserRole::User);
    }

    #[test]
    fn test_response_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "secret-hash".to_string(),
            avatar: None,
            phone: Some("9876543210".to_string()),
            role: UserRole::User,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&UserResponse::from(user.clone())).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"user\""));

        let raw = serde_json::to_string(&user).unwrap();
        assert!(!raw.contains("secret-hash"));
    }
}
