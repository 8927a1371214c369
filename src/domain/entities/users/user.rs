//! User Entity Implementation
//!
//! `users` 컬렉션의 문서 구조입니다. 기존 데이터와 호환되도록 camelCase 필드명을 유지합니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::Roles;

/// 사용자 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    /// 로그인 이메일 (unique)
    pub email: String,
    /// bcrypt 해시
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    /// 비밀번호 재설정 토큰의 SHA-256 hex. 원본 토큰은 저장하지 않습니다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_expires: Option<DateTime>,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

impl User {
    /// 새 일반 사용자 생성. 비밀번호는 이미 해시된 값이어야 합니다.
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            email,
            password: password_hash,
            is_admin: false,
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    /// JWT에 담을 역할 목록
    pub fn roles(&self) -> Vec<String> {
        Roles::for_user(self.is_admin)
    }

    /// 재설정 토큰이 `now` 시점에 아직 유효한지 여부
    pub fn has_valid_reset_token(&self, token_hash: &str, now: DateTime) -> bool {
        match (&self.reset_password_token, self.reset_password_expires) {
            (Some(stored), Some(expires)) => stored == token_hash && expires > now,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    #[test]
    fn test_new_user_is_not_admin() {
        let user = User::new("Asha".to_string(), "asha@example.com".to_string(), "$2b$04$hash".to_string());

        assert!(!user.is_admin);
        assert!(user.id.is_none());
        assert_eq!(user.roles(), vec!["user"]);
    }

    #[test]
    fn test_admin_roles() {
        let mut user = User::new("Admin".to_string(), "admin@example.com".to_string(), "hash".to_string());
        user.is_admin = true;

        assert_eq!(user.roles(), vec!["user", "admin"]);
    }

    #[test]
    fn test_reset_token_validity() {
        let now = DateTime::now();
        let mut user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        assert!(!user.has_valid_reset_token("abc", now));

        user.reset_password_token = Some("abc".to_string());
        user.reset_password_expires = Some(DateTime::from_millis(now.timestamp_millis() + 60_000));
        assert!(user.has_valid_reset_token("abc", now));
        assert!(!user.has_valid_reset_token("other", now));

        user.reset_password_expires = Some(DateTime::from_millis(now.timestamp_millis() - 1));
        assert!(!user.has_valid_reset_token("abc", now));
    }

    #[test]
    fn test_reads_legacy_document() {
        let document = bson::doc! {
            "_id": ObjectId::new(),
            "name": "Legacy",
            "email": "legacy@example.com",
            "password": "$2a$10$legacyhash",
            "isAdmin": true,
            "createdAt": DateTime::now(),
            "updatedAt": DateTime::now(),
            "__v": 0,
        };

        let user: User = bson::from_document(document).unwrap();
        assert!(user.is_admin);
        assert!(user.reset_password_token.is_none());
    }

    #[test]
    fn test_serializes_camel_case() {
        let user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        let document = bson::to_document(&user).unwrap();

        assert!(document.contains_key("isAdmin"));
        assert!(document.contains_key("createdAt"));
        assert!(!document.contains_key("_id"));
        assert!(!document.contains_key("resetPasswordToken"));
    }
}
