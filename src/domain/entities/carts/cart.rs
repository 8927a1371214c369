//! Cart Entity
//!
//! 사용자당 하나의 장바구니 문서. 한 상품은 최대 한 줄만 가집니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: ObjectId,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user: ObjectId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

impl Cart {
    pub fn contains(&self, product: &ObjectId) -> bool {
        self.items.iter().any(|item| &item.product == product)
    }

    /// 해당 상품 줄의 현재 수량. 장바구니에 없으면 `None`.
    pub fn quantity_of(&self, product: &ObjectId) -> Option<i64> {
        self.items
            .iter()
            .find(|item| &item.product == product)
            .map(|item| item.quantity)
    }

    /// `quantity`를 더했을 때 한 줄 한도를 넘는지
    pub fn exceeds_line_limit(&self, product: &ObjectId, quantity: i64, max_quantity: i64) -> bool {
        self.quantity_of(product)
            .is_some_and(|current| current.saturating_add(quantity) > max_quantity)
    }
}

/// 같은 상품이 여러 번 나오면 수량을 합쳐 한 줄로 만듭니다. 처음 등장한 순서를 유지합니다.
pub fn merge_duplicate_items(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());

    for item in items {
        match merged.iter_mut().find(|existing| existing.product == item.product) {
            Some(existing) => existing.quantity += item.quantity,
            None => merged.push(item),
        }
    }

    merged
}
