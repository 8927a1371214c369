//! Authentication HTTP Handlers
//!
//! 이메일/비밀번호 기반 회원가입과 로그인, 비밀번호 재설정 엔드포인트입니다.
//! 응답의 `token`은 이후 요청의 `Authorization: Bearer` 헤더로 사용됩니다.
//!
//! | Method | Path | 인증 |
//! |--------|------|------|
//! | POST | `/api/auth/register` | - |
//! | POST | `/api/auth/login` | - |
//! | POST | `/api/auth/forgot-password` | - |
//! | POST | `/api/auth/reset-password` | - |
//! | GET | `/api/auth/me` | 필요 |
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;
use crate::domain::dto::auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::auth::AuthService;

/// 회원가입
///
/// # Endpoint
/// `POST /api/auth/register`
#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance()
        .register(payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

/// 로그인
///
/// # Endpoint
/// `POST /api/auth/login`
#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance()
        .login(payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 비밀번호 재설정 링크 발급
///
/// 링크의 출처는 요청의 scheme과 host로 만듭니다. 프록시 뒤에서는
/// `X-Forwarded-Proto`/`X-Forwarded-Host`가 반영됩니다.
#[post("/forgot-password")]
pub async fn forgot_password(
    req: HttpRequest,
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let origin = {
        let info = req.connection_info();
        format!("{}://{}", info.scheme(), info.host())
    };

    let response = AuthService::instance()
        .forgot_password(&payload.email, &origin)
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/reset-password")]
pub async fn reset_password(
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let response = AuthService::instance()
        .reset_password(payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 현재 로그인한 사용자 정보
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = AuthService::instance()
        .profile(&user.object_id()?)
        .await?;

    Ok(HttpResponse::Ok().json(profile))
}
