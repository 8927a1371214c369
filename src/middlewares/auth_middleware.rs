//! JWT 인증 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 JWT 토큰을 검증하고 [`AuthenticatedUser`]를 request
//! extension에 넣습니다. 핸들러는 `AuthenticatedUser`, `OptionalUser`, `AdminUser` 추출자로
//! 꺼내 씁니다.
//!
//! [`AuthenticatedUser`]: crate::domain::models::auth::AuthenticatedUser

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    /// 새로운 인증 미들웨어 생성
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    /// 역할 요구사항이 있는 인증 미들웨어 생성
    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증 미들웨어 생성
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 미들웨어 생성
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구 인증 미들웨어 생성
    pub fn required_with_role(role: &str) -> Self {
        Self::new_with_role(
            AuthMode::Required,
            RequiredRole::Single(role.to_string())
        )
    }

    /// 복수 역할 중 하나 요구 인증 미들웨어 생성
    pub fn required_with_roles(roles: Vec<&str>) -> Self {
        let role_strings: Vec<String> = roles.into_iter().map(|s| s.to_string()).collect();
        Self::new_with_role(
            AuthMode::Required,
            RequiredRole::Any(role_strings)
        )
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpResponse};
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use actix_web::http::StatusCode;
    use crate::config::Roles;
    use crate::domain::models::auth::OptionalUser;

    async fn whoami(user: OptionalUser) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "authenticated": user.0.is_some() }))
    }

    #[test]
    fn test_required_role_single() {
        let required = RequiredRole::Single(Roles::ADMIN.to_string());
        let admin_roles = vec!["user".to_string(), "admin".to_string()];
        let user_roles = vec!["user".to_string()];

        assert!(required.is_satisfied(&admin_roles));
        assert!(!required.is_satisfied(&user_roles));
    }

    #[test]
    fn test_required_role_any() {
        let middleware = AuthMiddleware::required_with_roles(vec!["admin", "staff"]);
        let required = middleware.required_role.unwrap();

        assert!(required.is_satisfied(&["staff".to_string()]));
        assert!(!required.is_satisfied(&["user".to_string()]));
    }

    #[actix_web::test]
    async fn test_required_rejects_missing_token() {
        let app = init_service(
            App::new().service(
                web::scope("/api/cart")
                    .wrap(AuthMiddleware::required_with_role(Roles::USER))
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = TestRequest::get().uri("/api/cart").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Not authorized, no token");
    }

    #[actix_web::test]
    async fn test_required_rejects_non_bearer_scheme() {
        let app = init_service(
            App::new().service(
                web::scope("/api/orders")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = TestRequest::get()
            .uri("/api/orders")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_optional_passes_anonymous_requests() {
        let app = init_service(
            App::new().service(
                web::scope("/api/products")
                    .wrap(AuthMiddleware::optional())
                    .route("", web::get().to(whoami)),
            ),
        )
        .await;

        let req = TestRequest::get().uri("/api/products").to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = read_body_json(resp).await;
        assert_eq!(body["authenticated"], false);
    }
}
