//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use ucarx_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses.
/// [`UserResponse`] is the only serializable projection.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: String,
    pub phone_verified_at: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses.
///
/// Strips the password hash and any credential material; every handler that
/// returns a user goes through this type, so redaction cannot be skipped at
/// a call site.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: String,
    pub phone_verified_at: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub notifications_enabled: bool,
    pub dark_mode: bool,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            phone: user.phone,
            email: user.email,
            role: user.role,
            phone_verified_at: user.phone_verified_at,
            last_login_at: user.last_login_at,
            notifications_enabled: user.notifications_enabled,
            dark_mode: user.dark_mode,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user at registration.
#[derive(Debug)]
pub struct CreateUser {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = chrono::Utc::now();
        User {
            id: 1,
            name: "Ada".to_string(),
            phone: "1000000001".to_string(),
            email: None,
            password_hash: Some("$argon2id$not-a-real-hash".to_string()),
            role: "OWNER".to_string(),
            phone_verified_at: None,
            last_login_at: None,
            notifications_enabled: true,
            dark_mode: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// The serialized response must never contain the password hash, under
    /// any key casing.
    #[test]
    fn test_user_response_has_no_password_hash() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("passwordHash"));
        assert!(!obj.contains_key("password_hash"));
        assert!(!json.to_string().contains("argon2id"));
    }

    #[test]
    fn test_user_response_uses_camel_case_keys() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_value(&response).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("phoneVerifiedAt"));
        assert!(obj.contains_key("notificationsEnabled"));
        assert!(obj.contains_key("darkMode"));
        assert_eq!(json["phone"], "1000000001");
    }
}
