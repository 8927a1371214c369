use std::collections::HashMap;
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::Serialize;
use crate::domain::dto::products::ProductResponse;
use crate::domain::entities::carts::CartItem;
use crate::domain::entities::products::Product;
use crate::errors::errors::AppError;

#[derive(Debug, Serialize)]
pub struct CartLineResponse {
    pub product: ProductResponse,
    pub quantity: i64,
    pub subtotal: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub total: Decimal,
    pub item_count: i64,
}

impl CartResponse {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: Decimal::ZERO,
            item_count: 0,
        }
    }

    /// 장바구니 항목에 상품 정보를 붙입니다. 카탈로그에서 사라진 상품은 제외합니다.
    /// 금액 계산이 범위를 넘으면 에러를 반환합니다.
    pub fn build(items: &[CartItem], products: &HashMap<ObjectId, Product>) -> Result<Self, AppError> {
        let overflow = || AppError::ValidationError("Cart total is out of range".to_string());

        let mut lines = Vec::with_capacity(items.len());
        let mut total = Decimal::ZERO;
        let mut item_count = 0_i64;

        for item in items {
            let Some(product) = products.get(&item.product) else {
                continue;
            };
            let subtotal = product.price
                .checked_mul(Decimal::from(item.quantity))
                .ok_or_else(overflow)?;
            total = total.checked_add(subtotal).ok_or_else(overflow)?;
            item_count = item_count.saturating_add(item.quantity);

            lines.push(CartLineResponse {
                product: ProductResponse::from(product.clone()),
                quantity: item.quantity,
                subtotal,
            });
        }

        Ok(Self { items: lines, total, item_count })
    }
}
