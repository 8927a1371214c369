//! # Authentication Configuration Module
//!
//! JWT 토큰 서명과 역할(role) 이름을 관리하는 모듈입니다.
//!
//! ```bash
//! export JWT_SECRET="your-super-secret-jwt-key"
//! export JWT_EXPIRATION_DAYS="30"
//! ```

use std::env;

pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "your-secret-key".to_string()
            })
    }

    /// 액세스 토큰 유효 기간(일). 브라우저 클라이언트는 토큰을 localStorage에 보관하고
    /// 갱신 흐름이 없으므로 기본값은 30일입니다.
    pub fn expiration_days() -> i64 {
        env::var("JWT_EXPIRATION_DAYS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|days: &i64| *days > 0)
            .unwrap_or(30)
    }
}

/// 역할 이름 상수
pub struct Roles;

impl Roles {
    pub const USER: &'static str = "user";
    pub const ADMIN: &'static str = "admin";

    /// 관리자 여부로부터 토큰에 담을 역할 목록을 만듭니다.
    pub fn for_user(is_admin: bool) -> Vec<String> {
        let mut roles = vec![Self::USER.to_string()];
        if is_admin {
            roles.push(Self::ADMIN.to_string());
        }
        roles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_for_user() {
        assert_eq!(Roles::for_user(false), vec!["user"]);
        assert_eq!(Roles::for_user(true), vec!["user", "admin"]);
    }

    #[test]
    fn test_expiration_default() {
        if env::var("JWT_EXPIRATION_DAYS").is_err() {
            assert_eq!(JwtConfig::expiration_days(), 30);
        }
    }
}
