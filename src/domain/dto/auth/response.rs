use serde::Serialize;
use crate::domain::dto::to_rfc3339;
use crate::domain::entities::users::User;

/// 회원가입/로그인 응답. 클라이언트는 이 객체를 통째로 localStorage에 저장합니다.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub token: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            token,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id_string().unwrap_or_default(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            created_at: to_rfc3339(user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordResponse {
    pub message: String,
    pub reset_url: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_auth_response_shape() {
        let mut user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        let id = ObjectId::new();
        user.id = Some(id);

        let json = serde_json::to_value(AuthResponse::new(&user, "jwt".to_string())).unwrap();

        assert_eq!(json["_id"], id.to_hex());
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["token"], "jwt");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_profile_hides_password() {
        let user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        let json = serde_json::to_value(UserProfileResponse::from(user)).unwrap();

        assert!(json.get("password").is_none());
        assert!(json["createdAt"].as_str().unwrap().contains('T'));
    }
}
