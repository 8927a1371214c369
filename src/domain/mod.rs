//! # Domain Layer Module
//!
//! 스토어프론트의 도메인 계층입니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - MongoDB 문서 (User, Product, Cart, Order)
//! ├── dto       - HTTP 요청/응답 본문
//! └── models    - 인증 정보, JWT 클레임, 결제 게이트웨이 구조
//!      │
//!      ▼
//! Services → Repositories → MongoDB / Redis
//! ```
//!
//! 엔티티는 기존 컬렉션과 호환되도록 camelCase 필드명을 사용하며, 가격 계산이나
//! 상태 전환처럼 저장소와 무관한 규칙은 엔티티 메서드로 둡니다.
//!
//! | 규칙 | 위치 |
//! |------|------|
//! | 장바구니 중복 상품 병합 | [`entities::carts::merge_duplicate_items`] |
//! | 주문 금액 합계, paise 변환 | [`entities::orders::total_price`], [`entities::orders::to_minor_units`] |
//! | 결제/배송 플래그 단방향 전환 | [`entities::orders::Order::status_transition`] |
//! | 결제 재시도 판정 | [`entities::orders::Order::payment_state`] |

pub mod entities;
pub mod dto;
pub mod models;
