//! Authentication types for tokens and login payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// JWT claims carried in the access token cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i32,
    /// User email at the time the token was issued.
    pub email: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: i32, email: &str, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i32 {
        self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email)]
    pub email: String,
    /// User password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email)]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    /// User full name.
    #[validate(length(min = 1, max = 120))]
    pub full_name: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i32,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn claims_sets_expiration_and_iat() {
        let expires_at = Utc::now() + Duration::minutes(30);
        let before = Utc::now().timestamp();
        let claims = Claims::new(42, "ana@example.com", expires_at);
        let after = Utc::now().timestamp();

        assert_eq!(claims.user_id(), 42);
        assert_eq!(claims.email, "ana@example.com");
        assert!(claims.iat >= before);
        assert!(claims.iat <= after);
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn register_request_rejects_short_password() {
        let request = RegisterRequest {
            email: "ana@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Ana".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn register_request_rejects_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            password: "long-enough-password".to_string(),
            full_name: "Ana".to_string(),
        };

        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn register_request_accepts_valid_payload() {
        let request = RegisterRequest {
            email: "ana@example.com".to_string(),
            password: "long-enough-password".to_string(),
            full_name: "Ana Souza".to_string(),
        };

        assert!(request.validate().is_ok());
    }

    #[test]
    fn login_request_deserializes() {
        let request: LoginRequest = serde_json::from_value(serde_json::json!({
            "email": "ana@example.com",
            "password": "secret"
        }))
        .unwrap();

        assert_eq!(request.email, "ana@example.com");
        assert!(request.validate().is_ok());
    }
}
