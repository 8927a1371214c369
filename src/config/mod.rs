//! # Configuration Module
//!
//! 스토어프론트 백엔드의 설정 관리를 담당하는 모듈입니다.
//! 모든 설정값은 환경 변수에서 읽으며, `main`에서 `PROFILE`에 맞는
//! `.env` 파일을 먼저 로드합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 실행 환경, 서버, 비밀번호, 업로드, CORS, Rate Limiting 설정
//! - [`auth_config`] - JWT 및 역할 설정
//! - [`payment_config`] - Razorpay 결제 게이트웨이 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 서버
//! export HOST="0.0.0.0"
//! export PORT="8080"
//! export ENVIRONMENT="production"   # development, test, staging, production
//!
//! # 저장소
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="storefront"
//! export REDIS_URL="redis://localhost:6379"
//!
//! # 인증
//! export JWT_SECRET="your-super-secret-key"
//! export JWT_EXPIRATION_DAYS="30"
//! export BCRYPT_COST="12"
//!
//! # 결제
//! export RAZORPAY_KEY_ID="rzp_live_xxx"
//! export RAZORPAY_KEY_SECRET="xxx"
//! export RAZORPAY_WEBHOOK_SECRET="xxx"
//!
//! # 업로드 / CORS
//! export UPLOAD_DIR="uploads"
//! export CORS_ALLOWED_ORIGINS="https://shop.example.com"
//! ```

pub mod data_config;
pub mod auth_config;
pub mod payment_config;

pub use data_config::*;
pub use auth_config::*;
pub use payment_config::*;
