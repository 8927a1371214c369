//! JWT 토큰 관리 서비스
//!
//! HS256으로 서명한 액세스 토큰을 발급하고 검증합니다. 브라우저 클라이언트는 갱신 흐름 없이
//! 토큰을 보관하므로 리프레시 토큰은 없고, 유효 기간은 [`JwtConfig::expiration_days`]를 따릅니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    domain::entities::users::User,
    domain::models::token::TokenClaims,
};
use crate::errors::errors::AppError;

#[service(name = "token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let user_id = user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?;

        let claims = build_claims(user_id, user.roles(), JwtConfig::expiration_days());
        encode_claims(&claims, &JwtConfig::secret())
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_claims(token, &JwtConfig::secret())
    }
}

/// `Authorization: Bearer <token>` 헤더 값에서 토큰을 꺼냅니다.
pub fn parse_bearer(auth_header: &str) -> Result<&str, AppError> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::AuthenticationError("Not authorized, no token".to_string()))
}

fn build_claims(user_id: String, roles: Vec<String>, expiration_days: i64) -> TokenClaims {
    let now = Utc::now();
    let expiration = now + Duration::days(expiration_days);

    TokenClaims {
        sub: user_id,
        roles,
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    }
}

fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String, AppError> {
    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    decode::<TokenClaims>(token, &decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("Not authorized, token expired".to_string())
            }
            _ => {
                log::debug!("토큰 검증 실패: {}", e);
                AppError::AuthenticationError("Not authorized, token failed".to_string())
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_claims_round_trip() {
        let claims = build_claims("65a1f0c2e4b0a1b2c3d4e5f6".to_string(), vec!["user".to_string()], 30);
        let token = encode_claims(&claims, SECRET).unwrap();

        let decoded = decode_claims(&token, SECRET).unwrap();
        assert_eq!(decoded.sub, "65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(decoded.roles, vec!["user"]);
        assert_eq!(decoded.exp - decoded.iat, 30 * 24 * 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = build_claims("abc".to_string(), vec![], 1);
        let token = encode_claims(&claims, SECRET).unwrap();

        assert!(matches!(
            decode_claims(&token, "other-secret"),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = build_claims("abc".to_string(), vec![], -1);
        let token = encode_claims(&claims, SECRET).unwrap();

        match decode_claims(&token, SECRET) {
            Err(AppError::AuthenticationError(msg)) => assert!(msg.contains("expired")),
            other => panic!("expected expiry error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
        assert!(parse_bearer("Basic dXNlcjpwYXNz").is_err());
        assert!(parse_bearer("Bearer ").is_err());
    }
}
