//! 미들웨어 모듈
//!
//! 요청 처리 파이프라인의 횡단 관심사를 담당합니다.
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - `Authorization: Bearer <JWT>` 추출 및 검증
//! - 사용자 정보를 request extension에 저장
//! - 선택적/강제 인증 모드, 역할 요구 지원
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::AuthMiddleware;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/cart")
//!             .wrap(AuthMiddleware::required())
//!             .route("", web::get().to(get_cart))
//!     )
//!     .service(
//!         web::scope("/api/products")
//!             .wrap(AuthMiddleware::optional())
//!             .route("", web::get().to(list_products))
//!     )
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
