//! 결제 웹훅 처리
//!
//! 게이트웨이는 같은 이벤트를 여러 번 보낼 수 있으므로 결제 ID 단위로 Redis에
//! `SET NX EX` 표식을 남겨 중복 전달을 걸러냅니다. 처리에 실패하면 표식을 지워
//! 게이트웨이 재전송 때 다시 처리되도록 합니다.

use std::sync::Arc;
use singleton_macro::service;
use crate::{
    caching::redis::RedisClient,
    config::RazorpayConfig,
    domain::{
        dto::payments::{PaymentConfigResponse, WebhookOutcome},
        models::payment::WebhookEvent,
    },
    services::{orders::OrderService, payments::RazorpayService},
};
use crate::errors::errors::AppError;

/// 웹훅 중복 표식 보관 기간 (7일)
const WEBHOOK_DEDUPE_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;

#[service(name = "payment")]
pub struct PaymentService {
    razorpay_service: Arc<RazorpayService>,
    order_service: Arc<OrderService>,
    redis: Arc<RedisClient>,
}

impl PaymentService {
    pub fn client_config(&self) -> PaymentConfigResponse {
        PaymentConfigResponse {
            key_id: RazorpayConfig::key_id(),
            currency: RazorpayConfig::currency(),
        }
    }

    /// 서명을 확인한 뒤 결제 완료 이벤트를 주문에 반영합니다.
    pub async fn handle_webhook(&self, body: &[u8], signature: Option<&str>) -> Result<WebhookOutcome, AppError> {
        self.razorpay_service.authenticate_webhook(body, signature)?;

        let event: WebhookEvent = serde_json::from_slice(body)
            .map_err(|e| AppError::ValidationError(format!("Invalid webhook payload: {}", e)))?;

        let Some(captured) = event.captured_payment() else {
            log::debug!("처리하지 않는 웹훅 이벤트: {}", event.event);
            return Ok(WebhookOutcome::Ignored);
        };

        let dedupe_key = dedupe_key(&captured.payment_id);
        let first_delivery = self.redis
            .set_nx_with_expiry(&dedupe_key, &event.event, WEBHOOK_DEDUPE_TTL_SECONDS)
            .await
            .unwrap_or_else(|e| {
                // Redis 장애 시에도 주문 쪽 조건부 업데이트가 중복을 막는다
                log::warn!("웹훅 중복 확인 실패: {}", e);
                true
            });
        if !first_delivery {
            log::info!("중복 웹훅 무시: {} ({})", captured.payment_id, event.event);
            return Ok(WebhookOutcome::Duplicate);
        }

        match self.order_service.mark_paid_from_webhook(&captured).await {
            Ok(outcome) => {
                log::info!("웹훅 처리: {} {} → {:?}", event.event, captured.payment_id, outcome);
                Ok(outcome)
            }
            Err(e) => {
                if let Err(del_err) = self.redis.del(&dedupe_key).await {
                    log::warn!("웹훅 중복 표식 삭제 실패: {}", del_err);
                }
                Err(e)
            }
        }
    }
}

fn dedupe_key(payment_id: &str) -> String {
    format!("payment_event:{}", payment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_key() {
        assert_eq!(dedupe_key("pay_29QQoUBi66xm2f"), "payment_event:pay_29QQoUBi66xm2f");
    }

    #[test]
    fn test_dedupe_ttl_is_a_week() {
        assert_eq!(WEBHOOK_DEDUPE_TTL_SECONDS, 604_800);
    }
}
