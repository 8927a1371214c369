//! # Razorpay 결제 게이트웨이 연동
//!
//! 서버는 체크아웃 직전에 게이트웨이 주문을 만들고, 결제 결과는 두 경로로 받습니다.
//!
//! ```text
//! 브라우저 체크아웃 위젯 ──(razorpay_payment_id, razorpay_signature)──▶ PUT /api/orders/{id}/pay
//! Razorpay 서버 ──(X-Razorpay-Signature)──▶ POST /api/payments/razorpay/webhook
//! ```
//!
//! | 서명 | 메시지 | 키 |
//! |------|--------|----|
//! | 결제 콜백 | `{order_id}\|{payment_id}` | key secret |
//! | 웹훅 | 요청 본문 원문 | webhook secret |

use std::time::Duration;
use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use sha2::Sha256;
use singleton_macro::service;
use crate::{
    config::RazorpayConfig,
    domain::models::payment::{CreateGatewayOrder, GatewayOrder},
};
use crate::errors::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

#[service(name = "razorpay")]
pub struct RazorpayService {}

impl RazorpayService {
    /// 게이트웨이 주문을 생성합니다. `amount`는 최소 화폐 단위입니다.
    pub async fn create_order(&self, amount: i64, currency: &str, receipt: &str) -> Result<GatewayOrder, AppError> {
        if !RazorpayConfig::is_configured() {
            return Err(AppError::ExternalServiceError("Razorpay 키가 설정되지 않았습니다".to_string()));
        }

        let request = CreateGatewayOrder {
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
        };

        let response = HTTP_CLIENT
            .post(format!("{}/orders", RazorpayConfig::api_base()))
            .basic_auth(RazorpayConfig::key_id(), Some(RazorpayConfig::key_secret()))
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Razorpay 주문 요청 실패: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Razorpay 주문 생성 실패 ({}): {}", status, error_text
            )));
        }

        let order = response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Razorpay 응답 파싱 실패: {}", e)))?;

        log::info!("Razorpay 주문 생성: {} (receipt={}, amount={})", order.id, receipt, amount);
        Ok(order)
    }

    pub fn authenticate_webhook(&self, body: &[u8], signature: Option<&str>) -> Result<(), AppError> {
        check_webhook_signature(body, signature, RazorpayConfig::webhook_secret().as_deref())
    }
}

/// 웹훅 요청의 서명을 확인합니다. 서명이 없거나 틀리거나, 시크릿이 설정되지 않았으면 401.
pub fn check_webhook_signature(body: &[u8], signature: Option<&str>, secret: Option<&str>) -> Result<(), AppError> {
    let signature = signature
        .ok_or_else(|| AppError::AuthenticationError("Missing webhook signature".to_string()))?;

    let Some(secret) = secret else {
        log::warn!("RAZORPAY_WEBHOOK_SECRET 미설정으로 웹훅 거부");
        return Err(AppError::AuthenticationError("Invalid webhook signature".to_string()));
    };

    if verify_webhook_signature(body, signature, secret) {
        Ok(())
    } else {
        Err(AppError::AuthenticationError("Invalid webhook signature".to_string()))
    }
}

pub fn verify_payment_signature(gateway_order_id: &str, payment_id: &str, signature: &str, secret: &str) -> bool {
    let message = format!("{}|{}", gateway_order_id, payment_id);
    verify_hmac(message.as_bytes(), signature, secret)
}

pub fn verify_webhook_signature(body: &[u8], signature: &str, secret: &str) -> bool {
    verify_hmac(body, signature, secret)
}

fn verify_hmac(message: &[u8], signature_hex: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Ok(signature) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };

    mac.update(message);
    // verify_slice는 상수 시간 비교
    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_signature() {
        let signature = "a982c20f48234e966ccc8d903bff75730b34341007236ad8c8a9d7c0ae5848c5";

        assert!(verify_payment_signature("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", signature, "test_secret"));
        assert!(!verify_payment_signature("order_9A33XWu170gUtm", "pay_other", signature, "test_secret"));
        assert!(!verify_payment_signature("order_9A33XWu170gUtm", "pay_29QQoUBi66xm2f", signature, "wrong"));
    }

    #[test]
    fn test_webhook_signature() {
        let body = br#"{"event":"payment.captured"}"#;
        let signature = "4673dd707ef4c41b987cb7fefe1583142dc702388c93145b7814b9ad3d3c183e";

        assert!(verify_webhook_signature(body, signature, "whsec"));
        assert!(!verify_webhook_signature(br#"{"event":"order.paid"}"#, signature, "whsec"));
    }

    #[test]
    fn test_check_webhook_signature() {
        let body = br#"{"event":"payment.captured"}"#;
        let signature = "4673dd707ef4c41b987cb7fefe1583142dc702388c93145b7814b9ad3d3c183e";

        assert!(check_webhook_signature(body, Some(signature), Some("whsec")).is_ok());

        for result in [
            check_webhook_signature(body, None, Some("whsec")),
            check_webhook_signature(body, Some("deadbeef"), Some("whsec")),
            check_webhook_signature(body, Some(signature), None),
        ] {
            assert!(matches!(result, Err(AppError::AuthenticationError(_))));
        }
    }

    #[test]
    fn test_malformed_signature_rejected() {
        assert!(!verify_webhook_signature(b"{}", "not-hex", "whsec"));
        assert!(!verify_webhook_signature(b"{}", "", "whsec"));
        assert!(!verify_webhook_signature(b"{}", "00", ""));
    }
}
