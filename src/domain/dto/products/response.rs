use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::dto::to_rfc3339;
use crate::domain::entities::products::Product;

/// 상품 응답
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category: String,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id_string().unwrap_or_default(),
            name: product.name,
            description: product.description,
            price: product.price,
            image: product.image,
            category: product.category,
            in_stock: product.in_stock,
            created_at: to_rfc3339(product.created_at),
            updated_at: to_rfc3339(product.updated_at),
        }
    }
}
