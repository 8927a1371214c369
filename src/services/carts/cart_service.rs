//! 장바구니 서비스
//!
//! 장바구니 문서는 상품 참조와 수량만 저장하고, 응답을 만들 때마다 현재 카탈로그 가격으로
//! 소계와 합계를 계산합니다.

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use crate::{
    domain::{
        dto::carts::{CartLineRequest, CartResponse},
        entities::carts::{merge_duplicate_items, Cart, CartItem},
    },
    repositories::{carts::CartRepository, products::ProductRepository},
    utils::string_utils::parse_object_id,
};
use crate::errors::errors::AppError;

/// 한 상품에 담을 수 있는 최대 수량
pub const MAX_LINE_QUANTITY: i64 = 99;

#[service(name = "cart")]
pub struct CartService {
    cart_repo: Arc<CartRepository>,
    product_repo: Arc<ProductRepository>,
}

impl CartService {
    pub async fn get_cart(&self, user: &ObjectId) -> Result<CartResponse, AppError> {
        match self.cart_repo.find_by_user(user).await? {
            Some(cart) => self.render(&cart).await,
            None => Ok(CartResponse::empty()),
        }
    }

    pub async fn add_item(&self, user: &ObjectId, product_id: &str, quantity: i64) -> Result<CartResponse, AppError> {
        let product_id = parse_object_id(product_id, "product")?;
        let product = self.product_repo
            .find_by_id(&product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if !product.in_stock {
            return Err(AppError::ValidationError(format!("{} is out of stock", product.name)));
        }

        let cart = self.cart_repo
            .add_item(user, &product_id, quantity, MAX_LINE_QUANTITY)
            .await?;
        log::debug!("장바구니 추가: user={} product={} qty={}", user, product_id, quantity);

        self.render(&cart).await
    }

    /// 장바구니 전체를 교체합니다. 같은 상품은 한 줄로 합칩니다.
    pub async fn replace_items(&self, user: &ObjectId, lines: &[CartLineRequest]) -> Result<CartResponse, AppError> {
        let items = build_cart_items(lines)?;

        let ids: Vec<ObjectId> = items.iter().map(|item| item.product).collect();
        let products = self.product_repo.find_by_ids(&ids).await?;
        if let Some(missing) = ids.iter().find(|id| !products.contains_key(id)) {
            log::debug!("장바구니 교체 중 없는 상품: {}", missing);
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let cart = self.cart_repo.replace_items(user, &items).await?;
        CartResponse::build(&cart.items, &products)
    }

    pub async fn remove_item(&self, user: &ObjectId, product_id: &str) -> Result<CartResponse, AppError> {
        let product_id = parse_object_id(product_id, "product")?;

        let cart = self.cart_repo
            .find_by_user(user)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found".to_string()))?;
        if !cart.contains(&product_id) {
            return Err(AppError::NotFound("Item not in cart".to_string()));
        }

        let cart = self.cart_repo
            .remove_item(user, &product_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Item not in cart".to_string()))?;

        self.render(&cart).await
    }

    pub async fn clear(&self, user: &ObjectId) -> Result<(), AppError> {
        self.cart_repo.clear(user).await
    }

    async fn render(&self, cart: &Cart) -> Result<CartResponse, AppError> {
        let ids: Vec<ObjectId> = cart.items.iter().map(|item| item.product).collect();
        let products = self.product_repo.find_by_ids(&ids).await?;

        CartResponse::build(&cart.items, &products)
    }
}

/// 요청 라인을 장바구니 항목으로 바꿉니다. 합친 수량도 한도를 넘을 수 없습니다.
pub fn build_cart_items(lines: &[CartLineRequest]) -> Result<Vec<CartItem>, AppError> {
    let items = lines
        .iter()
        .map(|line| {
            Ok(CartItem {
                product: parse_object_id(&line.product_id, "product")?,
                quantity: line.quantity,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let merged = merge_duplicate_items(items);
    if merged.iter().any(|item| item.quantity < 1 || item.quantity > MAX_LINE_QUANTITY) {
        return Err(AppError::ValidationError(format!(
            "Quantity must be between 1 and {}",
            MAX_LINE_QUANTITY
        )));
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: &str, quantity: i64) -> CartLineRequest {
        CartLineRequest { product_id: product_id.to_string(), quantity }
    }

    #[test]
    fn test_build_cart_items_merges_lines() {
        let flower = "65a1f0c2e4b0a1b2c3d4e5f6";
        let keychain = "65a1f0c2e4b0a1b2c3d4e5f7";

        let items = build_cart_items(&[line(flower, 1), line(keychain, 2), line(flower, 3)]).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product.to_hex(), flower);
        assert_eq!(items[0].quantity, 4);
        assert_eq!(items[1].quantity, 2);
    }

    #[test]
    fn test_build_cart_items_rejects_invalid_lines() {
        assert!(matches!(
            build_cart_items(&[line("p1", 1)]),
            Err(AppError::ValidationError(_))
        ));

        let id = "65a1f0c2e4b0a1b2c3d4e5f6";
        assert!(build_cart_items(&[line(id, 60), line(id, 60)]).is_err());
    }

    #[test]
    fn test_build_cart_items_empty() {
        assert!(build_cart_items(&[]).unwrap().is_empty());
    }
}
