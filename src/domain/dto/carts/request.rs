use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_quantity() -> i64 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CartLineRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,

    #[validate(range(min = 1, max = 99, message = "Quantity must be between 1 and 99"))]
    pub quantity: i64,
}

/// 브라우저 localStorage의 장바구니 전체를 서버에 동기화할 때 사용합니다.
#[derive(Debug, Deserialize, Validate)]
pub struct ReplaceCartRequest {
    #[serde(default)]
    #[validate(length(max = 100, message = "Too many cart items"), nested)]
    pub items: Vec<CartLineRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_cart_defaults_quantity() {
        let request: AddToCartRequest = serde_json::from_str(r#"{"productId": "65a1"}"#).unwrap();
        assert_eq!(request.quantity, 1);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_add_to_cart_rejects_zero_quantity() {
        let request: AddToCartRequest =
            serde_json::from_str(r#"{"productId": "65a1", "quantity": 0}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_replace_cart_validates_each_line() {
        let request: ReplaceCartRequest = serde_json::from_str(
            r#"{"items": [{"productId": "a", "quantity": 2}, {"productId": "b", "quantity": -1}]}"#,
        ).unwrap();
        assert!(request.validate().is_err());

        let empty: ReplaceCartRequest = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(empty.validate().is_ok());
    }
}
