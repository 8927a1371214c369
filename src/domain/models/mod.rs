//! # 도메인 모델
//!
//! 저장되지 않는 값 객체들입니다.
//!
//! - [`auth`] - 인증된 사용자, 요청 추출자, 인증 정책
//! - [`token`] - JWT 클레임
//! - [`payment`] - Razorpay 주문/웹훅 구조

pub mod auth;
pub mod token;
pub mod payment;
