//! # Payment Gateway Configuration
//!
//! Razorpay 결제 게이트웨이 연동 설정입니다.
//!
//! ```bash
//! export RAZORPAY_KEY_ID="rzp_test_xxxxxxxx"
//! export RAZORPAY_KEY_SECRET="xxxxxxxxxxxxxxxx"
//! export RAZORPAY_WEBHOOK_SECRET="webhook-secret"
//! export RAZORPAY_REQUIRE_SIGNATURE="true"
//! ```

use std::env;
use crate::config::Environment;

pub struct RazorpayConfig;

impl RazorpayConfig {
    pub fn key_id() -> String {
        env::var("RAZORPAY_KEY_ID").unwrap_or_default()
    }

    pub fn key_secret() -> String {
        env::var("RAZORPAY_KEY_SECRET").unwrap_or_default()
    }

    /// 웹훅 서명 검증용 시크릿. 설정되지 않으면 웹훅 엔드포인트는 모든 요청을 거부합니다.
    pub fn webhook_secret() -> Option<String> {
        env::var("RAZORPAY_WEBHOOK_SECRET").ok().filter(|s| !s.is_empty())
    }

    pub fn api_base() -> String {
        env::var("RAZORPAY_API_BASE")
            .unwrap_or_else(|_| "https://api.razorpay.com/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn currency() -> String {
        env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "INR".to_string())
    }

    /// 결제 완료 콜백에 게이트웨이 서명이 반드시 포함되어야 하는지 여부.
    /// 명시하지 않으면 운영 환경에서만 강제합니다.
    pub fn require_signature() -> bool {
        match env::var("RAZORPAY_REQUIRE_SIGNATURE") {
            Ok(raw) => matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => Environment::current().is_production(),
        }
    }

    pub fn is_configured() -> bool {
        !Self::key_id().is_empty() && !Self::key_secret().is_empty()
    }
}
