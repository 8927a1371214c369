//! # 인증 서비스
//!
//! 회원가입, 로그인, 비밀번호 재설정을 담당합니다.
//!
//! ## 비밀번호 재설정 흐름
//!
//! ```text
//! POST /api/auth/forgot-password {email}
//!    ├─ 무작위 토큰 생성 (UUID v4 두 개, 64 hex)
//!    ├─ SHA-256(token)과 만료 시각만 users 문서에 저장
//!    └─ resetUrl = <origin>/reset-password.html?token=<token> 응답
//!
//! POST /api/auth/reset-password {token, password}
//!    ├─ SHA-256(token) + 만료 전 조건으로 사용자 조회
//!    └─ 비밀번호 교체, 토큰 필드 삭제
//! ```
//!
//! 메일 발송 연동이 없어 재설정 링크를 응답 본문으로 돌려줍니다.

use std::sync::Arc;
use bcrypt::hash;
use mongodb::bson::{oid::ObjectId, DateTime};
use sha2::{Digest, Sha256};
use singleton_macro::service;
use uuid::Uuid;
use crate::{
    config::PasswordConfig,
    domain::{
        dto::auth::{
            normalize_email, AuthResponse, ForgotPasswordResponse, LoginRequest, MessageResponse,
            RegisterRequest, ResetPasswordRequest, UserProfileResponse,
        },
        entities::users::User,
    },
    repositories::users::UserRepository,
    services::auth::TokenService,
};
use crate::errors::errors::AppError;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let request = request.normalized();
        let start_time = std::time::Instant::now();

        let password_hash = hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
        log::debug!("Password hashing took: {:?}", start_time.elapsed());

        let user = self.user_repo
            .create(User::new(request.name, request.email, password_hash))
            .await?;

        let token = self.token_service.generate_token(&user)?;
        log::info!("신규 가입: {} ({:?})", user.email, user.id);

        Ok(AuthResponse::new(&user, token))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&request.email);

        let user = self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let is_valid = bcrypt::verify(&request.password, &user.password)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;

        if !is_valid {
            log::warn!("로그인 실패: {}", email);
            return Err(AppError::AuthenticationError(INVALID_CREDENTIALS.to_string()));
        }

        let token = self.token_service.generate_token(&user)?;
        log::info!("로그인 성공: {}", email);

        Ok(AuthResponse::new(&user, token))
    }

    /// 재설정 토큰을 발급하고 링크를 만듭니다.
    ///
    /// `origin`은 `scheme://host` 형태의 요청 출처입니다.
    pub async fn forgot_password(&self, email: &str, origin: &str) -> Result<ForgotPasswordResponse, AppError> {
        let email = normalize_email(email);

        let user = self.user_repo
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        let user_id = user.id
            .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

        let token = generate_reset_token();
        let ttl_millis = PasswordConfig::reset_token_ttl_minutes() * 60 * 1000;
        let expires = DateTime::from_millis(DateTime::now().timestamp_millis() + ttl_millis);

        self.user_repo
            .set_reset_token(&user_id, &hash_reset_token(&token), expires)
            .await?;

        log::info!("비밀번호 재설정 토큰 발급: {}", email);

        Ok(ForgotPasswordResponse {
            message: "Password reset link sent".to_string(),
            reset_url: build_reset_url(origin, &token),
        })
    }

    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<MessageResponse, AppError> {
        let token_hash = hash_reset_token(request.token.trim());
        let invalid = || AppError::ValidationError("Invalid or expired token".to_string());

        let now = DateTime::now();
        let user = self.user_repo
            .find_by_reset_token(&token_hash, now)
            .await?
            .filter(|user| user.has_valid_reset_token(&token_hash, now))
            .ok_or_else(invalid)?;
        let user_id = user.id.ok_or_else(invalid)?;

        let password_hash = hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        if !self.user_repo.reset_password(&user_id, &token_hash, &password_hash).await? {
            return Err(invalid());
        }

        log::info!("비밀번호 재설정 완료: {}", user.email);
        Ok(MessageResponse::new("Password reset successful"))
    }

    pub async fn profile(&self, user_id: &ObjectId) -> Result<UserProfileResponse, AppError> {
        let user = self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserProfileResponse::from(user))
    }
}

/// 256비트에 가까운 무작위 토큰 (UUID v4 두 개를 이어 붙인 64자리 hex)
pub fn generate_reset_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// 저장용 토큰 해시 (SHA-256 hex)
pub fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn build_reset_url(origin: &str, token: &str) -> String {
    format!(
        "{}/reset-password.html?token={}",
        origin.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_reset_token());
    }

    #[test]
    fn test_hash_reset_token() {
        assert_eq!(
            hash_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(hash_reset_token("abc"), hash_reset_token("abd"));
    }

    #[test]
    fn test_build_reset_url() {
        assert_eq!(
            build_reset_url("https://shop.example.com/", "deadbeef"),
            "https://shop.example.com/reset-password.html?token=deadbeef"
        );
    }
}
