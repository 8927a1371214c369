//! Order Entity
//!
//! 주문은 체크아웃 시점의 장바구니 스냅샷입니다. 생성 이후에는 결제/배송 플래그만
//! false → true 방향으로 바뀌고, `paidAt`/`deliveredAt`은 처음 전환될 때 한 번만 기록됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub qty: i64,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    pub product: ObjectId,
}

impl OrderItem {
    /// 단가 × 수량. 범위를 넘으면 `None`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.qty))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// 게이트웨이가 돌려준 결제 결과. 기존 문서의 snake_case 필드명을 그대로 사용합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub email_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    pub order_items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    /// 게이트웨이 주문 ID (`order_...`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime>,
    #[serde(default)]
    pub is_delivered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime>,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

/// 이미 결제된 주문에 결제 기록이 다시 들어왔을 때의 판정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentState {
    Unpaid,
    /// 같은 결제 ID로 이미 결제 완료 (재시도)
    PaidWithSameId,
    /// 다른 결제 ID로 이미 결제 완료
    PaidWithOtherId,
}

/// 관리자 상태 변경 요청에서 실제로 일어날 전환
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusTransition {
    pub mark_paid: bool,
    pub mark_delivered: bool,
}

impl StatusTransition {
    pub fn is_noop(&self) -> bool {
        !self.mark_paid && !self.mark_delivered
    }
}

impl Order {
    pub fn id_string(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    pub fn is_owned_by(&self, user_id: &ObjectId) -> bool {
        &self.user == user_id
    }

    pub fn payment_state(&self, payment_id: &str) -> PaymentState {
        if !self.is_paid {
            return PaymentState::Unpaid;
        }

        match &self.payment_result {
            Some(result) if result.id == payment_id => PaymentState::PaidWithSameId,
            // 관리자가 수동으로 결제 처리한 주문에는 결제 기록이 없다
            None => PaymentState::PaidWithSameId,
            Some(_) => PaymentState::PaidWithOtherId,
        }
    }

    /// 요청된 플래그 중 false → true 전환만 골라냅니다. `false` 요청은 무시됩니다.
    pub fn status_transition(&self, is_paid: Option<bool>, is_delivered: Option<bool>) -> StatusTransition {
        StatusTransition {
            mark_paid: is_paid == Some(true) && !self.is_paid,
            mark_delivered: is_delivered == Some(true) && !self.is_delivered,
        }
    }
}

/// 항목 소계의 합. 어느 단계에서든 범위를 넘으면 `None`.
pub fn items_price(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.subtotal()?))
}

pub fn total_price(items_price: Decimal, tax_price: Decimal, shipping_price: Decimal) -> Option<Decimal> {
    items_price.checked_add(tax_price)?.checked_add(shipping_price)
}

/// 금액을 최소 화폐 단위(paise)로 변환합니다. 소수 둘째 자리에서 반올림합니다.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    amount.checked_mul(Decimal::ONE_HUNDRED)?.round().to_i64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson;

    fn item(price: i64, qty: i64) -> OrderItem {
        OrderItem {
            name: "Pink Flower".to_string(),
            qty,
            price: Decimal::from(price),
            image: "assets/p1.jpeg".to_string(),
            product: ObjectId::new(),
        }
    }

    fn order() -> Order {
        let order_items = vec![item(199, 2), item(249, 1)];
        let items = items_price(&order_items).unwrap();

        Order {
            id: Some(ObjectId::new()),
            user: ObjectId::new(),
            order_items,
            shipping_address: ShippingAddress {
                address: "12 MG Road".to_string(),
                city: "Pune".to_string(),
                postal_code: "411001".to_string(),
                country: "India".to_string(),
                phone: None,
            },
            payment_method: "Razorpay".to_string(),
            payment_result: None,
            gateway_order_id: None,
            items_price: items,
            tax_price: Decimal::ZERO,
            shipping_price: Decimal::from(50),
            total_price: total_price(items, Decimal::ZERO, Decimal::from(50)).unwrap(),
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_prices() {
        let order = order();
        assert_eq!(order.items_price, Decimal::from(647));
        assert_eq!(order.total_price, Decimal::from(697));
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::from(697)), Some(69700));
        assert_eq!(to_minor_units(Decimal::new(19999, 2)), Some(19999));
        assert_eq!(to_minor_units(Decimal::new(10004, 3)), Some(1000));
    }

    #[test]
    fn test_money_overflow_returns_none() {
        assert_eq!(to_minor_units(Decimal::from_i128_with_scale(10_i128.pow(27), 0)), None);
        assert_eq!(to_minor_units(Decimal::MAX), None);
        assert_eq!(total_price(Decimal::ZERO, Decimal::MAX, Decimal::ONE), None);

        let mut huge = item(0, 99);
        huge.price = Decimal::MAX;
        assert_eq!(huge.subtotal(), None);
        assert_eq!(items_price(&[huge]), None);
    }

    #[test]
    fn test_payment_state() {
        let mut order = order();
        assert_eq!(order.payment_state("pay_1"), PaymentState::Unpaid);

        order.is_paid = true;
        order.payment_result = Some(PaymentResult {
            id: "pay_1".to_string(),
            status: "captured".to_string(),
            update_time: String::new(),
            email_address: String::new(),
        });
        assert_eq!(order.payment_state("pay_1"), PaymentState::PaidWithSameId);
        assert_eq!(order.payment_state("pay_2"), PaymentState::PaidWithOtherId);
    }

    #[test]
    fn test_status_transition_is_monotonic() {
        let mut order = order();

        let transition = order.status_transition(Some(true), None);
        assert!(transition.mark_paid);
        assert!(!transition.mark_delivered);

        order.is_paid = true;
        assert!(order.status_transition(Some(true), Some(false)).is_noop());
        assert!(order.status_transition(Some(false), None).is_noop());

        let transition = order.status_transition(None, Some(true));
        assert!(transition.mark_delivered);
    }

    #[test]
    fn test_ownership() {
        let order = order();
        assert!(order.is_owned_by(&order.user));
        assert!(!order.is_owned_by(&ObjectId::new()));
    }

    #[test]
    fn test_serializes_legacy_field_names() {
        let mut order = order();
        order.payment_result = Some(PaymentResult {
            id: "pay_1".to_string(),
            status: "captured".to_string(),
            update_time: "2024-01-01T00:00:00Z".to_string(),
            email_address: "buyer@example.com".to_string(),
        });

        let document = bson::to_document(&order).unwrap();
        assert!(document.contains_key("orderItems"));
        assert!(document.contains_key("shippingAddress"));
        assert!(document.contains_key("totalPrice"));
        assert!(!document.contains_key("paidAt"));

        let payment = document.get_document("paymentResult").unwrap();
        assert!(payment.contains_key("update_time"));
        assert!(payment.contains_key("email_address"));

        let address = document.get_document("shippingAddress").unwrap();
        assert!(address.contains_key("postalCode"));
    }
}
