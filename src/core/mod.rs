//! # Core Framework Module
//!
//! 매크로 기반 싱글톤 의존성 주입의 런타임 부분을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입 기반 싱글톤 저장소
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 서비스 등록
//! - **의존성 해결**: `Arc<T>` 필드 자동 주입
//!
//! 에러 타입은 [`crate::errors`]에 있으며 편의를 위해 여기서도 재export합니다.
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! #[repository(name = "cart", collection = "carts")]
//! pub struct CartRepository {
//!     db: Arc<Database>,
//! }
//!
//! #[service(name = "cart")]
//! pub struct CartService {
//!     cart_repo: Arc<CartRepository>,       // 자동 주입
//!     product_repo: Arc<ProductRepository>, // 자동 주입
//! }
//!
//! let cart_service = CartService::instance();
//! ```
//!
//! ## 트러블슈팅
//!
//! ```text
//! panic: No registration named 'paymentgateway' for ...::PaymentGatewayService
//! ```
//! **해결**: 타입 이름에서 접미사를 뗀 소문자 이름을 `#[service(name = "...")]`에 지정

pub mod registry;

pub use registry::*;
pub use crate::errors::errors::{AppError, AppResult, ErrorContext};
