use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "must be 8 to 128 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 320))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_short_password_and_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            name: "Hero".into(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn register_accepts_reasonable_input() {
        let request = RegisterRequest {
            email: "hero@example.com".into(),
            password: "correct horse".into(),
            name: "Hero".into(),
        };
        assert!(request.validate().is_ok());
    }
}
