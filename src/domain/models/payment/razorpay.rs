//! Razorpay API 모델
//!
//! 게이트웨이가 주고받는 JSON 구조입니다. 필드명은 Razorpay 문서의 snake_case를 따릅니다.

use serde::{Deserialize, Serialize};

/// `POST /v1/orders` 요청 본문
#[derive(Debug, Clone, Serialize)]
pub struct CreateGatewayOrder {
    /// 최소 화폐 단위 금액 (paise)
    pub amount: i64,
    pub currency: String,
    /// 우리 쪽 주문 ID
    pub receipt: String,
}

/// 게이트웨이 주문. 클라이언트 체크아웃 위젯에 그대로 전달됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    #[serde(default)]
    pub created_at: i64,
}

/// 웹훅 이벤트 봉투
///
/// ```json
/// { "event": "payment.captured",
///   "payload": { "payment": { "entity": { "id": "pay_...", "order_id": "order_..." } } } }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    #[serde(default)]
    pub payload: WebhookPayload,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    pub payment: Option<EntityWrapper<GatewayPayment>>,
    pub order: Option<EntityWrapper<GatewayOrderEntity>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityWrapper<T> {
    pub entity: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPayment {
    pub id: String,
    pub order_id: Option<String>,
    #[serde(default)]
    pub status: String,
    pub email: Option<String>,
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrderEntity {
    pub id: String,
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// 결제 완료로 처리해야 하는 웹훅에서 뽑아낸 정보
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedPayment {
    pub payment_id: String,
    pub gateway_order_id: String,
    pub status: String,
    pub email: String,
    pub created_at: Option<i64>,
}

impl WebhookEvent {
    pub const PAYMENT_CAPTURED: &'static str = "payment.captured";
    pub const ORDER_PAID: &'static str = "order.paid";

    /// 결제 완료 이벤트라면 결제/주문 ID를 뽑아냅니다. 그 외 이벤트는 `None`.
    pub fn captured_payment(&self) -> Option<CapturedPayment> {
        if self.event != Self::PAYMENT_CAPTURED && self.event != Self::ORDER_PAID {
            return None;
        }

        let payment = self.payload.payment.as_ref().map(|p| &p.entity)?;
        let gateway_order_id = payment
            .order_id
            .clone()
            .or_else(|| self.payload.order.as_ref().map(|o| o.entity.id.clone()))?;

        Some(CapturedPayment {
            payment_id: payment.id.clone(),
            gateway_order_id,
            status: if payment.status.is_empty() { "captured".to_string() } else { payment.status.clone() },
            email: payment.email.clone().unwrap_or_default(),
            created_at: payment.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_captured_event() {
        let event: WebhookEvent = serde_json::from_str(r#"{
            "entity": "event",
            "event": "payment.captured",
            "payload": {
                "payment": {
                    "entity": {
                        "id": "pay_29QQoUBi66xm2f",
                        "order_id": "order_9A33XWu170gUtm",
                        "status": "captured",
                        "email": "buyer@example.com",
                        "created_at": 1700000000
                    }
                }
            }
        }"#).unwrap();

        let captured = event.captured_payment().unwrap();
        assert_eq!(captured.payment_id, "pay_29QQoUBi66xm2f");
        assert_eq!(captured.gateway_order_id, "order_9A33XWu170gUtm");
        assert_eq!(captured.email, "buyer@example.com");
    }

    #[test]
    fn test_order_paid_event_uses_order_entity() {
        let event: WebhookEvent = serde_json::from_str(r#"{
            "event": "order.paid",
            "payload": {
                "payment": { "entity": { "id": "pay_1", "status": "captured" } },
                "order": { "entity": { "id": "order_1", "receipt": "65a1", "status": "paid" } }
            }
        }"#).unwrap();

        let captured = event.captured_payment().unwrap();
        assert_eq!(captured.gateway_order_id, "order_1");
        assert_eq!(captured.email, "");
    }

    #[test]
    fn test_other_events_are_ignored() {
        let event: WebhookEvent = serde_json::from_str(r#"{
            "event": "payment.failed",
            "payload": { "payment": { "entity": { "id": "pay_1", "order_id": "order_1" } } }
        }"#).unwrap();
        assert!(event.captured_payment().is_none());

        let event: WebhookEvent = serde_json::from_str(r#"{"event": "refund.created"}"#).unwrap();
        assert!(event.captured_payment().is_none());
    }

    #[test]
    fn test_gateway_order_response() {
        let order: GatewayOrder = serde_json::from_str(r#"{
            "id": "order_EKwxwAgItmmXdp",
            "entity": "order",
            "amount": 69700,
            "amount_paid": 0,
            "amount_due": 69700,
            "currency": "INR",
            "receipt": "65a1f0c2e4b0a1b2c3d4e5f6",
            "offer_id": null,
            "status": "created",
            "attempts": 0,
            "notes": [],
            "created_at": 1582628071
        }"#).unwrap();

        assert_eq!(order.amount, 69700);
        assert_eq!(order.status, "created");
    }
}
