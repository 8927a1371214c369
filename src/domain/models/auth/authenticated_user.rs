//! 인증된 사용자 정보와 요청 추출자
//!
//! [`AuthMiddleware`](crate::middlewares::AuthMiddleware)가 토큰을 검증한 뒤
//! Request Extensions에 넣어 둔 사용자 정보를 핸들러 인자로 꺼내 줍니다.
//!
//! ```rust,ignore
//! #[get("/myorders")]
//! async fn my_orders(user: AuthenticatedUser) -> Result<HttpResponse, AppError> { ... }
//!
//! #[get("")]
//! async fn all_orders(admin: AdminUser) -> Result<HttpResponse, AppError> { ... }
//! ```

use std::future::{ready, Ready};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use crate::config::Roles;
use crate::errors::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// 사용자 ObjectId (hex)
    pub user_id: String,

    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|&role| self.has_role(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Roles::ADMIN)
    }

    pub fn object_id(&self) -> Result<ObjectId, AppError> {
        ObjectId::parse_str(&self.user_id)
            .map_err(|_| AppError::AuthenticationError("Not authorized, token failed".to_string()))
    }
}

fn not_authenticated() -> Error {
    AppError::AuthenticationError("Not authorized, no token".to_string()).into()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(not_authenticated())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

/// 관리자 전용 핸들러용 추출자. 인증이 없으면 401, 관리자가 아니면 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
    type Error = Error;
    type Future = Ready<actix_web::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthenticatedUser>() {
            Some(user) if user.is_admin() => Ok(AdminUser(user.clone())),
            Some(user) => {
                log::warn!("관리자 권한 없음: 사용자 ID {}", user.user_id);
                Err(AppError::AuthorizationError("Not authorized as an admin".to_string()).into())
            }
            None => Err(not_authenticated()),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: ObjectId::new().to_hex(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_roles() {
        let admin = user(&["user", "admin"]);
        let customer = user(&["user"]);

        assert!(admin.is_admin());
        assert!(!customer.is_admin());
        assert!(customer.has_any_role(&["admin", "user"]));
        assert!(!customer.has_any_role(&["admin"]));
    }

    #[test]
    fn test_object_id() {
        assert!(user(&["user"]).object_id().is_ok());

        let broken = AuthenticatedUser { user_id: "1".to_string(), roles: vec![] };
        assert!(broken.object_id().is_err());
    }

    #[actix_web::test]
    async fn test_extractors_without_user() {
        let req = TestRequest::default().to_http_request();

        let err = AuthenticatedUser::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);

        let optional = OptionalUser::extract(&req).await.unwrap();
        assert!(optional.0.is_none());

        let err = AdminUser::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_admin_extractor_rejects_customer() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user(&["user"]));

        let err = AdminUser::extract(&req).await.unwrap_err();
        assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_extractor_accepts_admin() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user(&["user", "admin"]));

        let admin = AdminUser::extract(&req).await.unwrap();
        assert!(admin.0.is_admin());
    }
}
