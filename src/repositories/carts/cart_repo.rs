//! # 장바구니 리포지토리
//!
//! 모든 변경은 단일 조건부 업데이트로 처리합니다. 문서를 읽어 수정한 뒤 다시 저장하지
//! 않으므로 같은 사용자의 요청이 동시에 들어와도 수량이 유실되지 않습니다.
//!
//! ```text
//! add_item(user, product, qty)
//!    ├─ 1) {user, items: {$elemMatch: P, qty <= max - n}}  $inc items.$.quantity
//!    ├─ 1)이 빗나가면 현재 줄을 직접 확인
//!    │    ├─ 합친 수량이 한도 초과 → 400
//!    │    └─ 그 사이 다른 요청이 줄을 추가함 → 1)부터 재시도
//!    ├─ 2) {user, items.product: {$ne:P}}                  $push items (upsert)
//!    └─ 2)에서 E11000 → 다른 요청이 먼저 문서를 만듦 → 1)부터 재시도
//!
//! `carts.user` 고유 인덱스는 서버 시작 시 반드시 만들어져야 합니다.
//! ```

use std::sync::Arc;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Bson, DateTime},
    options::{IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    core::registry::Repository,
    db::{is_duplicate_key, Database},
    domain::entities::carts::{Cart, CartItem},
};
use singleton_macro::repository;
use crate::errors::errors::{AppError, ErrorContext};

const MAX_UPSERT_ATTEMPTS: usize = 3;

#[repository(name = "cart", collection = "carts")]
pub struct CartRepository {
    db: Arc<Database>,
}

impl CartRepository {
    pub async fn find_by_user(&self, user: &ObjectId) -> Result<Option<Cart>, AppError> {
        self.collection::<Cart>()
            .find_one(doc! { "user": *user })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 상품을 담습니다. 이미 있으면 수량을 더하되 `max_quantity`를 넘길 수 없습니다.
    pub async fn add_item(
        &self,
        user: &ObjectId,
        product: &ObjectId,
        quantity: i64,
        max_quantity: i64,
    ) -> Result<Cart, AppError> {
        let item = to_bson(&CartItem { product: *product, quantity })
            .context("장바구니 항목 직렬화 실패")?;

        for attempt in 1..=MAX_UPSERT_ATTEMPTS {
            let now = DateTime::now();

            let incremented = self.collection::<Cart>()
                .find_one_and_update(
                    doc! {
                        "user": *user,
                        "items": { "$elemMatch": {
                            "product": *product,
                            "quantity": { "$lte": max_quantity - quantity },
                        } },
                    },
                    doc! {
                        "$inc": { "items.$.quantity": quantity },
                        "$set": { "updatedAt": now },
                    },
                )
                .return_document(ReturnDocument::After)
                .await?;

            if let Some(cart) = incremented {
                return Ok(cart);
            }

            if let Some(cart) = self.find_by_user(user).await? {
                if cart.exceeds_line_limit(product, quantity, max_quantity) {
                    return Err(AppError::ValidationError(format!(
                        "Quantity must be between 1 and {}",
                        max_quantity
                    )));
                }
                if cart.contains(product) {
                    log::debug!("장바구니 줄 동시 추가 감지, 재시도 {}/{}", attempt, MAX_UPSERT_ATTEMPTS);
                    continue;
                }
            }

            let pushed = self.collection::<Cart>()
                .find_one_and_update(
                    doc! { "user": *user, "items.product": { "$ne": *product } },
                    doc! {
                        "$push": { "items": item.clone() },
                        "$set": { "updatedAt": now },
                        "$setOnInsert": { "createdAt": now },
                    },
                )
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await;

            match pushed {
                Ok(Some(cart)) => return Ok(cart),
                Ok(None) => {
                    return Err(AppError::InternalError("cart upsert returned no document".to_string()));
                }
                Err(e) if is_duplicate_key(&e) => {
                    log::debug!("장바구니 동시 생성 감지, 재시도 {}/{}", attempt, MAX_UPSERT_ATTEMPTS);
                    continue;
                }
                Err(e) => return Err(AppError::DatabaseError(e.to_string())),
            }
        }

        Err(AppError::ConflictError("Cart is being updated, please retry".to_string()))
    }

    /// 항목 전체를 한 번에 교체합니다. 장바구니가 없으면 만듭니다.
    pub async fn replace_items(&self, user: &ObjectId, items: &[CartItem]) -> Result<Cart, AppError> {
        let items = to_bson(items).context("장바구니 항목 직렬화 실패")?;

        for attempt in 1..=MAX_UPSERT_ATTEMPTS {
            let now = DateTime::now();

            let result = self.collection::<Cart>()
                .find_one_and_update(
                    doc! { "user": *user },
                    doc! {
                        "$set": { "items": items.clone(), "updatedAt": now },
                        "$setOnInsert": { "createdAt": now },
                    },
                )
                .upsert(true)
                .return_document(ReturnDocument::After)
                .await;

            match result {
                Ok(Some(cart)) => return Ok(cart),
                Ok(None) => {
                    return Err(AppError::InternalError("cart upsert returned no document".to_string()));
                }
                Err(e) if is_duplicate_key(&e) => {
                    log::debug!("장바구니 동시 생성 감지, 재시도 {}/{}", attempt, MAX_UPSERT_ATTEMPTS);
                    continue;
                }
                Err(e) => return Err(AppError::DatabaseError(e.to_string())),
            }
        }

        Err(AppError::ConflictError("Cart is being updated, please retry".to_string()))
    }

    /// 상품 한 줄을 뺍니다. 해당 상품이 장바구니에 없으면 `None`.
    pub async fn remove_item(&self, user: &ObjectId, product: &ObjectId) -> Result<Option<Cart>, AppError> {
        self.collection::<Cart>()
            .find_one_and_update(
                doc! { "user": *user, "items.product": *product },
                doc! {
                    "$pull": { "items": { "product": *product } },
                    "$set": { "updatedAt": DateTime::now() },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 장바구니를 비웁니다. 문서는 남겨 둡니다.
    pub async fn clear(&self, user: &ObjectId) -> Result<(), AppError> {
        self.collection::<Cart>()
            .update_one(
                doc! { "user": *user },
                doc! { "$set": { "items": Bson::Array(Vec::new()), "updatedAt": DateTime::now() } },
            )
            .await?;

        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("user_unique".to_string())
                .build())
            .build();

        self.collection::<Cart>()
            .create_index(user_index)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
