//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 정의하는 모듈입니다.
//! 핸들러는 요청 역직렬화와 검증, 인증 추출자 확인까지만 담당하고
//! 나머지는 싱글톤 서비스에 위임합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Browser storefront (fetch + localStorage)
//! └─────────────────────┬───────────────────────┘
//!                       │ JSON / multipart
//! ┌─────────────────────▼───────────────────────┐
//!   Handlers (이 모듈)                             ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - MongoDB / Redis               ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 핸들러 작성 규칙
//!
//! ```rust,ignore
//! #[post("")]
//! pub async fn add_to_cart(
//!     user: AuthenticatedUser,                 // 인증 미들웨어가 넣은 사용자
//!     payload: web::Json<AddToCartRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()?;                     // ValidationErrors → 400
//!     let cart = CartService::instance()
//!         .add_item(&user.object_id()?, &payload.product_id, payload.quantity)
//!         .await?;
//!     Ok(HttpResponse::Created().json(cart))
//! }
//! ```
//!
//! - 관리자 전용 핸들러는 [`AdminUser`](crate::domain::models::auth::AdminUser) 추출자를 받습니다.
//! - 경로의 ObjectId는 `parse_object_id`로 파싱해 형식 오류를 400으로 돌려줍니다.
//! - 모든 에러는 `AppError`의 `{error, message}` JSON 형식으로 응답합니다.
//!
//! ## 모듈 구성
//!
//! - **`auth`**: 회원가입, 로그인, 비밀번호 재설정, 내 정보
//! - **`products`**: 카탈로그 조회, 관리자 상품 관리 (multipart 업로드)
//! - **`cart`**: 장바구니 조회/담기/동기화/삭제
//! - **`orders`**: 체크아웃, 주문 조회, 결제 기록, 관리자 주문 관리
//! - **`payments`**: 결제 위젯 설정, Razorpay 웹훅

pub mod auth;
pub mod products;
pub mod cart;
pub mod orders;
pub mod payments;
