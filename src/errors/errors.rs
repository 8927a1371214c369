//! 애플리케이션 전역에서 사용하는 에러 시스템
//!
//! 스토어프론트 API의 통합 에러 처리 시스템입니다.
//! `thiserror`와 `actix_web::ResponseError`를 사용하여 모든 핸들러가
//! 동일한 JSON 에러 형식(`{"error": ..., "message": ...}`)으로 응답합니다.
//!
//! 브라우저 클라이언트는 실패 응답의 `message` 필드를 그대로 사용자에게 노출하므로,
//! 5xx 계열 에러는 상세 내용을 로그로만 남기고 일반 메시지로 응답합니다.
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use crate::errors::errors::AppError;
//!
//! async fn add_to_cart(quantity: u32) -> Result<(), AppError> {
//!     if quantity == 0 {
//!         return Err(AppError::ValidationError("수량은 1 이상이어야 합니다".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::HttpRequest;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 관련 에러 (500 Internal Server Error)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 관련 에러 (500 Internal Server Error)
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 에러 (400 Bad Request)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 찾을 수 없음 에러 (404 Not Found)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 충돌/중복 에러 (409 Conflict)
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 에러 (401 Unauthorized)
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 에러 (403 Forbidden)
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 결제 게이트웨이 등 외부 서비스 에러 (502 Bad Gateway)
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 내부 서버 에러 (500 Internal Server Error)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 필드에 들어가는 기계 판독용 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "database_error",
            AppError::RedisError(_) => "cache_error",
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::ConflictError(_) => "conflict",
            AppError::AuthenticationError(_) => "authentication_required",
            AppError::AuthorizationError(_) => "insufficient_permissions",
            AppError::ExternalServiceError(_) => "external_service_error",
            AppError::InternalError(_) => "internal_error",
        }
    }

    /// 클라이언트에게 노출해도 되는 메시지
    ///
    /// 4xx 에러는 원인 메시지를 그대로, 5xx 에러는 일반 메시지를 반환합니다.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg) => msg.clone(),
            AppError::ExternalServiceError(_) => "Payment gateway error".to_string(),
            _ => "Server error".to_string(),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// HTTP 에러 응답을 생성합니다.
    fn error_response(&self) -> actix_web::HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            log::error!("{}", self);
        }

        actix_web::HttpResponse::build(status)
            .json(serde_json::json!({
                "error": self.code(),
                "message": self.public_message()
            }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

/// 클라이언트가 그대로 보여줄 수 있도록 첫 번째 검증 메시지만 사용합니다.
impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(first_validation_message(&e).unwrap_or_else(|| e.to_string()))
    }
}

fn first_validation_message(errors: &validator::ValidationErrors) -> Option<String> {
    use validator::ValidationErrorsKind;

    errors.errors().values().find_map(|kind| match kind {
        ValidationErrorsKind::Field(field_errors) => field_errors
            .iter()
            .find_map(|error| error.message.as_ref().map(|m| m.to_string())),
        ValidationErrorsKind::Struct(inner) => first_validation_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_validation_message(inner)),
    })
}

/// `web::Json` 추출 실패도 `{error, message}` 본문의 400으로 응답합니다.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::debug!("JSON 본문 거부: {}", err);

    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {}", e),
        _ => "Invalid request body".to_string(),
    };

    AppError::ValidationError(message).into()
}

/// 편의성을 위한 Result 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 라이브러리 에러를 AppError로 변환하는 확장 trait
pub trait ErrorContext<T> {
    /// 컨텍스트 정보와 함께 에러를 변환합니다.
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use actix_web::ResponseError;

    fn body_json(error: &AppError) -> serde_json::Value {
        let bytes = error.error_response().into_body().try_into_bytes().unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("No order items".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(&error);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "No order items");
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Order not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_auth_error_responses() {
        let unauthenticated = AppError::AuthenticationError("Invalid email or password".to_string());
        let forbidden = AppError::AuthorizationError("Not authorized as an admin".to_string());

        assert_eq!(unauthenticated.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(forbidden.error_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_gateway_error_maps_to_bad_gateway() {
        let error = AppError::ExternalServiceError("razorpay: 503".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(&error)["message"], "Payment gateway error");
    }

    #[test]
    fn test_internal_error_hides_details() {
        let error = AppError::DatabaseError("connection refused 10.0.0.3:27017".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(&error);
        assert_eq!(body["message"], "Server error");
        assert!(!body.to_string().contains("10.0.0.3"));
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_validation_errors_use_field_message() {
        use validator::Validate;

        #[derive(Validate)]
        struct Login {
            #[validate(email(message = "Please enter a valid email"))]
            email: String,
        }

        let errors = Login { email: "nope".to_string() }.validate().unwrap_err();
        match AppError::from(errors) {
            AppError::ValidationError(msg) => assert_eq!(msg, "Please enter a valid email"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
