use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,

    #[serde(default)]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl RegisterRequest {
    /// 이메일은 소문자로, 이름은 앞뒤 공백 없이 저장합니다.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_validation() {
        let valid: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha", "email": "asha@example.com", "password": "secret1"}"#,
        ).unwrap();
        assert!(valid.validate().is_ok());

        let short_password: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha", "email": "asha@example.com", "password": "12345"}"#,
        ).unwrap();
        assert!(short_password.validate().is_err());

        let bad_email: RegisterRequest = serde_json::from_str(
            r#"{"name": "Asha", "email": "not-an-email", "password": "secret1"}"#,
        ).unwrap();
        assert!(bad_email.validate().is_err());

        let missing_name: RegisterRequest = serde_json::from_str(
            r#"{"email": "asha@example.com", "password": "secret1"}"#,
        ).unwrap();
        assert!(missing_name.validate().is_err());
    }

    #[test]
    fn test_register_normalization() {
        let request = RegisterRequest {
            name: "  Asha  ".to_string(),
            email: " Asha@Example.COM ".to_string(),
            password: " keep spaces ".to_string(),
        }.normalized();

        assert_eq!(request.name, "Asha");
        assert_eq!(request.email, "asha@example.com");
        assert_eq!(request.password, " keep spaces ");
    }

    #[test]
    fn test_reset_password_validation() {
        let request = ResetPasswordRequest { token: String::new(), password: "secret1".to_string() };
        assert!(request.validate().is_err());

        let request = ResetPasswordRequest { token: "abc".to_string(), password: "secret1".to_string() };
        assert!(request.validate().is_ok());
    }
}
