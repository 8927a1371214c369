//! 스토어프론트 백엔드
//!
//! 꽃과 선물 소품을 파는 작은 온라인 상점의 REST API입니다.
//! 카탈로그, 서버 측 장바구니, Razorpay 체크아웃, 주문 추적과 관리자 기능을
//! MongoDB(`users`, `products`, `carts`, `orders`) 위에 제공합니다.
//!
//! # Features
//!
//! - **인증**: 이메일/비밀번호 가입, HS256 JWT, 비밀번호 재설정 링크
//! - **카탈로그**: Redis 캐시 조회, 관리자 multipart 이미지 업로드
//! - **장바구니**: 원자적 upsert로 담기, localStorage 동기화용 일괄 교체
//! - **주문**: 카탈로그 가격 재계산, 결제/배송 플래그의 단방향 전환
//! - **결제**: Razorpay 주문 생성, 콜백/웹훅 서명 검증, 웹훅 중복 제거
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//!
//! # Architecture
//!
//! ```text
//! routes      스코프별 AuthMiddleware (required / optional)
//!   └─ handlers      JSON/multipart 추출, AuthenticatedUser/AdminUser 추출자
//!        └─ services       가격 계산, 결제 상태 전이, Razorpay 호출
//!             └─ repositories   조건부 업데이트, 상품 캐시
//!                  └─ MongoDB + Redis
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use storefront_backend::services::carts::CartService;
//! use storefront_backend::services::orders::OrderService;
//!
//! let cart = CartService::instance().add_item(&user_id, &product_id, 2).await?;
//! let orders = OrderService::instance().my_orders(&user_id).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
