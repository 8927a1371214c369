use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::dto::to_rfc3339;
use crate::domain::entities::orders::{Order, OrderItem, PaymentResult, ShippingAddress};
use crate::domain::entities::users::User;
use crate::domain::models::payment::GatewayOrder;

/// 주문의 `user` 필드. 조회 경로에 따라 ID만 내보내거나 이름/이메일을 채웁니다.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OrderUserResponse {
    Id(String),
    Summary {
        #[serde(rename = "_id")]
        id: String,
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl OrderUserResponse {
    pub fn id(user: &ObjectId) -> Self {
        OrderUserResponse::Id(user.to_hex())
    }

    pub fn summary(user: &User, include_email: bool) -> Self {
        OrderUserResponse::Summary {
            id: user.id_string().unwrap_or_default(),
            name: user.name.clone(),
            email: include_email.then(|| user.email.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub name: String,
    pub qty: i64,
    pub price: Decimal,
    pub image: String,
    pub product: String,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            name: item.name,
            qty: item.qty,
            price: item.price,
            image: item.image,
            product: item.product.to_hex(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user: OrderUserResponse,
    pub order_items: Vec<OrderItemResponse>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_result: Option<PaymentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gateway_order_id: Option<String>,
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<String>,
    pub is_delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl OrderResponse {
    pub fn new(order: Order, user: OrderUserResponse) -> Self {
        Self {
            id: order.id_string().unwrap_or_default(),
            user,
            order_items: order.order_items.into_iter().map(OrderItemResponse::from).collect(),
            shipping_address: order.shipping_address,
            payment_method: order.payment_method,
            payment_result: order.payment_result,
            gateway_order_id: order.gateway_order_id,
            items_price: order.items_price,
            tax_price: order.tax_price,
            shipping_price: order.shipping_price,
            total_price: order.total_price,
            is_paid: order.is_paid,
            paid_at: order.paid_at.map(to_rfc3339),
            is_delivered: order.is_delivered,
            delivered_at: order.delivered_at.map(to_rfc3339),
            created_at: to_rfc3339(order.created_at),
            updated_at: to_rfc3339(order.updated_at),
        }
    }
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let user = OrderUserResponse::id(&order.user);
        Self::new(order, user)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub created_order: OrderResponse,
    pub razorpay_order: GatewayOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    fn order() -> Order {
        Order {
            id: Some(ObjectId::new()),
            user: ObjectId::new(),
            order_items: vec![OrderItem {
                name: "Pink Flower".to_string(),
                qty: 1,
                price: Decimal::from(199),
                image: "assets/p1.jpeg".to_string(),
                product: ObjectId::new(),
            }],
            shipping_address: ShippingAddress {
                address: "12 MG Road".to_string(),
                city: "Pune".to_string(),
                postal_code: "411001".to_string(),
                country: "India".to_string(),
                phone: Some("9999999999".to_string()),
            },
            payment_method: "Razorpay".to_string(),
            payment_result: None,
            gateway_order_id: Some("order_1".to_string()),
            items_price: Decimal::from(199),
            tax_price: Decimal::ZERO,
            shipping_price: Decimal::ZERO,
            total_price: Decimal::from(199),
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_order_response_with_user_id() {
        let order = order();
        let user_hex = order.user.to_hex();
        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();

        assert_eq!(json["user"], user_hex);
        assert_eq!(json["orderItems"][0]["qty"], 1);
        assert_eq!(json["shippingAddress"]["postalCode"], "411001");
        assert_eq!(json["isPaid"], false);
        assert!(json.get("paidAt").is_none());
    }

    #[test]
    fn test_order_response_with_user_summary() {
        let mut user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        user.id = Some(ObjectId::new());

        let with_email = serde_json::to_value(OrderResponse::new(order(), OrderUserResponse::summary(&user, true))).unwrap();
        assert_eq!(with_email["user"]["name"], "Asha");
        assert_eq!(with_email["user"]["email"], "asha@example.com");

        let without_email = serde_json::to_value(OrderResponse::new(order(), OrderUserResponse::summary(&user, false))).unwrap();
        assert!(without_email["user"].get("email").is_none());
    }
}
