use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;
use crate::domain::entities::orders::ShippingAddress;
use crate::utils::string_utils::deserialize_optional_string;

/// 주문 항목의 상품 참조. 클라이언트는 ObjectId 문자열 또는 `1`, `"2"` 같은 로컬 ID를 보냅니다.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Text(String),
    Number(i64),
}

impl ProductRef {
    /// 유효한 ObjectId라면 그 값을 반환합니다.
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            ProductRef::Text(raw) => ObjectId::parse_str(raw.trim()).ok(),
            ProductRef::Number(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    #[serde(default)]
    pub name: String,
    pub qty: Option<i64>,
    pub quantity: Option<i64>,
    /// 클라이언트가 보낸 가격. 카탈로그 가격으로 다시 계산되므로 참고용입니다.
    pub price: Option<Decimal>,
    pub image: Option<String>,
    #[serde(alias = "productId", alias = "_id")]
    pub product: Option<ProductRef>,
}

impl OrderItemRequest {
    /// `qty`가 없으면 `quantity`를 사용합니다.
    pub fn quantity(&self) -> Option<i64> {
        self.qty.or(self.quantity)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddressRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Address is required"))]
    pub address: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 20, message = "Postal code is required"))]
    pub postal_code: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,

    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub phone: Option<String>,
}

impl From<ShippingAddressRequest> for ShippingAddress {
    fn from(request: ShippingAddressRequest) -> Self {
        Self {
            address: request.address.trim().to_string(),
            city: request.city.trim().to_string(),
            postal_code: request.postal_code.trim().to_string(),
            country: request.country.trim().to_string(),
            phone: request.phone,
        }
    }
}

fn default_payment_method() -> String {
    "Razorpay".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_items: Vec<OrderItemRequest>,

    #[validate(nested)]
    pub shipping_address: ShippingAddressRequest,

    #[serde(default = "default_payment_method")]
    pub payment_method: String,

    pub items_price: Option<Decimal>,
    pub tax_price: Option<Decimal>,
    pub shipping_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
}

/// 결제 완료 콜백 본문. 체크아웃 위젯의 응답 필드명을 그대로 받습니다.
#[derive(Debug, Deserialize, Validate)]
pub struct PayOrderRequest {
    #[serde(default, alias = "razorpay_payment_id")]
    #[validate(length(min = 1, message = "Payment ID is required"))]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub update_time: String,
    #[serde(default)]
    pub email_address: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub razorpay_order_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub razorpay_signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub is_paid: Option<bool>,
    pub is_delivered: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_from_checkout_page() {
        let request: CreateOrderRequest = serde_json::from_str(r#"{
            "orderItems": [
                {"name": "Pink Flower", "quantity": 2, "price": 199, "image": "assets/p1.jpeg", "product": "1"},
                {"name": "Bear Keychain", "qty": 1, "price": 249, "product": "65a1f0c2e4b0a1b2c3d4e5f6"},
                {"name": "Colorful Tulips", "qty": 1, "product": 5}
            ],
            "shippingAddress": {"address": "12 MG Road", "city": "Pune", "postalCode": "411001", "country": "India"},
            "paymentMethod": "Razorpay",
            "itemsPrice": 647,
            "taxPrice": 0,
            "shippingPrice": 50,
            "totalPrice": 697
        }"#).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.order_items[0].quantity(), Some(2));
        assert_eq!(request.order_items[0].product.as_ref().unwrap().object_id(), None);
        assert!(request.order_items[1].product.as_ref().unwrap().object_id().is_some());
        assert_eq!(request.order_items[2].product, Some(ProductRef::Number(5)));
        assert_eq!(request.total_price, Some(Decimal::from(697)));
    }

    #[test]
    fn test_shipping_address_required() {
        let request: CreateOrderRequest = serde_json::from_str(r#"{
            "orderItems": [],
            "shippingAddress": {"address": "", "city": "Pune", "postalCode": "411001", "country": "India"}
        }"#).unwrap();

        assert!(request.validate().is_err());
        assert_eq!(request.payment_method, "Razorpay");
    }

    #[test]
    fn test_pay_request_accepts_checkout_field_names() {
        let request: PayOrderRequest = serde_json::from_str(r#"{
            "razorpay_payment_id": "pay_123",
            "razorpay_order_id": "order_456",
            "razorpay_signature": "abc",
            "status": "COMPLETED"
        }"#).unwrap();

        assert_eq!(request.id, "pay_123");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_blank_signature_treated_as_missing() {
        let request: PayOrderRequest = serde_json::from_str(
            r#"{"id": "pay_123", "razorpay_order_id": "order_456", "razorpay_signature": "  "}"#,
        ).unwrap();

        assert_eq!(request.razorpay_order_id.as_deref(), Some("order_456"));
        assert_eq!(request.razorpay_signature, None);
    }

    #[test]
    fn test_status_request() {
        let request: UpdateOrderStatusRequest = serde_json::from_str(r#"{"isDelivered": true}"#).unwrap();
        assert_eq!(request.is_paid, None);
        assert_eq!(request.is_delivered, Some(true));
    }
}
