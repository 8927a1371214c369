//! # 상품 리포지토리
//!
//! `products` 컬렉션과 Redis 캐시를 함께 다룹니다. 카탈로그는 읽기가 대부분이라
//! 목록과 개별 상품을 캐시하고, 쓰기가 일어나면 관련 키를 지웁니다.
//!
//! | 키 | TTL |
//! |----|-----|
//! | `products:all` | 5분 |
//! | `product:{id}` | 10분 |

use std::collections::HashMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    options::{IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::products::{Product, ProductChanges},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

const ALL_PRODUCTS_KEY: &str = "products:all";
const LIST_TTL_SECONDS: u64 = 300;
const ITEM_TTL_SECONDS: u64 = 600;

#[repository(name = "product", collection = "products")]
pub struct ProductRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl ProductRepository {
    fn item_key(id: &ObjectId) -> String {
        format!("product:{}", id.to_hex())
    }

    /// 전체 상품 (최신 등록순)
    pub async fn find_all(&self) -> Result<Vec<Product>, AppError> {
        if let Ok(Some(cached)) = self.redis.get::<Vec<Product>>(ALL_PRODUCTS_KEY).await {
            return Ok(cached);
        }

        let products: Vec<Product> = self.collection::<Product>()
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect()
            .await?;

        if let Err(e) = self.redis.set_with_expiry(ALL_PRODUCTS_KEY, &products, LIST_TTL_SECONDS).await {
            log::warn!("상품 목록 캐시 저장 실패: {}", e);
        }

        Ok(products)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Product>, AppError> {
        let cache_key = Self::item_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Product>(&cache_key).await {
            return Ok(Some(cached));
        }

        let product = self.collection::<Product>()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref product) = product {
            let _ = self.redis.set_with_expiry(&cache_key, product, ITEM_TTL_SECONDS).await;
        }

        Ok(product)
    }

    /// 장바구니/주문 가격 계산용 일괄 조회. 캐시를 거치지 않아 항상 최신 가격을 봅니다.
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, Product>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let products: Vec<Product> = self.collection::<Product>()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;

        Ok(products
            .into_iter()
            .filter_map(|product| product.id.map(|id| (id, product)))
            .collect())
    }

    /// 이름으로 조회 (대소문자 무시). 클라이언트가 로컬 ID만 아는 주문 항목에 사용합니다.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Product>, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        if let Some(product) = self.collection::<Product>()
            .find_one(doc! { "name": name })
            .await?
        {
            return Ok(Some(product));
        }

        let pattern = format!("^{}$", regex_escape(name));
        self.collection::<Product>()
            .find_one(doc! { "name": { "$regex": pattern, "$options": "i" } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut product: Product) -> Result<Product, AppError> {
        let result = self.collection::<Product>()
            .insert_one(&product)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        product.id = result.inserted_id.as_object_id();
        self.invalidate_list().await;

        Ok(product)
    }

    pub async fn update(&self, id: &ObjectId, changes: &ProductChanges) -> Result<Option<Product>, AppError> {
        let updated = self.collection::<Product>()
            .find_one_and_update(
                doc! { "_id": *id },
                doc! { "$set": changes.to_set_document(DateTime::now()) },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if updated.is_some() {
            self.invalidate(id).await;
        }

        Ok(updated)
    }

    /// 삭제된 상품을 반환합니다. 업로드 이미지 정리에 사용됩니다.
    pub async fn delete(&self, id: &ObjectId) -> Result<Option<Product>, AppError> {
        let deleted = self.collection::<Product>()
            .find_one_and_delete(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if deleted.is_some() {
            self.invalidate(id).await;
        }

        Ok(deleted)
    }

    /// 카탈로그 전체를 교체합니다. 시드 작업 전용입니다.
    pub async fn replace_all(&self, products: Vec<Product>) -> Result<usize, AppError> {
        let collection = self.collection::<Product>();

        let deleted = collection.delete_many(doc! {}).await?;
        log::info!("기존 상품 {}개 삭제", deleted.deleted_count);

        let inserted = if products.is_empty() {
            0
        } else {
            collection.insert_many(&products).await?.inserted_ids.len()
        };

        let mut keys = self.redis.keys("product:*").await.unwrap_or_default();
        keys.push(ALL_PRODUCTS_KEY.to_string());
        if let Err(e) = self.redis.del_multiple(&keys).await {
            log::warn!("상품 캐시 삭제 실패: {}", e);
        }

        Ok(inserted)
    }

    async fn invalidate(&self, id: &ObjectId) {
        let keys = vec![Self::item_key(id), ALL_PRODUCTS_KEY.to_string()];
        if let Err(e) = self.redis.del_multiple(&keys).await {
            log::warn!("상품 캐시 삭제 실패 ({}): {}", id, e);
        }
    }

    async fn invalidate_list(&self) {
        if let Err(e) = self.redis.del(ALL_PRODUCTS_KEY).await {
            log::warn!("상품 목록 캐시 삭제 실패: {}", e);
        }
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder()
                .name("name".to_string())
                .build())
            .build();

        self.collection::<Product>()
            .create_indexes([created_at_index, name_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

/// 정규식 메타 문자를 이스케이프합니다.
fn regex_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if "\\.+*?()|[]{}^$".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_escape() {
        assert_eq!(regex_escape("Pink Flower"), "Pink Flower");
        assert_eq!(regex_escape("Gift (L)"), "Gift \\(L\\)");
        assert_eq!(regex_escape("a.b*c"), "a\\.b\\*c");
    }

    #[test]
    fn test_item_key() {
        let id = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        assert_eq!(ProductRepository::item_key(&id), "product:65a1f0c2e4b0a1b2c3d4e5f6");
    }
}
