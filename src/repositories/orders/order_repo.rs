//! # 주문 리포지토리
//!
//! 결제/배송 플래그는 `isPaid: false`(또는 `isDelivered: false`) 조건을 건 업데이트로만
//! 바꿉니다. 같은 주문에 결제 콜백과 웹훅이 동시에 도착해도 한 번만 반영됩니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, DateTime},
    options::{IndexOptions, ReturnDocument},
    IndexModel,
};
use crate::{
    core::registry::Repository,
    db::Database,
    domain::entities::orders::{Order, PaymentResult},
};
use singleton_macro::repository;
use crate::errors::errors::{AppError, ErrorContext};

#[repository(name = "order", collection = "orders")]
pub struct OrderRepository {
    db: Arc<Database>,
}

impl OrderRepository {
    pub async fn create(&self, mut order: Order) -> Result<Order, AppError> {
        let result = self.collection::<Order>()
            .insert_one(&order)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        order.id = result.inserted_id.as_object_id();
        if order.id.is_none() {
            return Err(AppError::InternalError("insert_one did not return an ObjectId".to_string()));
        }

        Ok(order)
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Order>, AppError> {
        self.collection::<Order>()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_gateway_order_id(&self, gateway_order_id: &str) -> Result<Option<Order>, AppError> {
        self.collection::<Order>()
            .find_one(doc! { "gatewayOrderId": gateway_order_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 사용자의 주문 (최신순)
    pub async fn find_by_user(&self, user: &ObjectId) -> Result<Vec<Order>, AppError> {
        let orders = self.collection::<Order>()
            .find(doc! { "user": *user })
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(orders)
    }

    /// 전체 주문 (최신순). 관리자 대시보드용.
    pub async fn find_all(&self) -> Result<Vec<Order>, AppError> {
        let orders = self.collection::<Order>()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?
            .try_collect()
            .await?;

        Ok(orders)
    }

    pub async fn set_gateway_order_id(&self, id: &ObjectId, gateway_order_id: &str) -> Result<(), AppError> {
        self.collection::<Order>()
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "gatewayOrderId": gateway_order_id, "updatedAt": DateTime::now() } },
            )
            .await?;

        Ok(())
    }

    /// 결제 전 주문을 삭제합니다. 게이트웨이 주문 생성에 실패한 체크아웃 정리용입니다.
    pub async fn delete_unpaid(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.collection::<Order>()
            .delete_one(doc! { "_id": *id, "isPaid": false })
            .await?;

        Ok(result.deleted_count > 0)
    }

    /// 미결제 주문을 결제 완료로 바꿉니다. 이미 결제된 주문이면 `None`.
    pub async fn mark_paid(&self, id: &ObjectId, payment: &PaymentResult, now: DateTime) -> Result<Option<Order>, AppError> {
        let payment = to_bson(payment).context("결제 결과 직렬화 실패")?;

        self.collection::<Order>()
            .find_one_and_update(
                doc! { "_id": *id, "isPaid": false },
                doc! { "$set": {
                    "isPaid": true,
                    "paidAt": now,
                    "paymentResult": payment,
                    "updatedAt": now,
                } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 관리자 수동 결제 처리. 결제 기록 없이 플래그와 시각만 설정합니다.
    pub async fn mark_paid_manually(&self, id: &ObjectId, now: DateTime) -> Result<bool, AppError> {
        let result = self.collection::<Order>()
            .update_one(
                doc! { "_id": *id, "isPaid": false },
                doc! { "$set": { "isPaid": true, "paidAt": now, "updatedAt": now } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    pub async fn mark_delivered(&self, id: &ObjectId, now: DateTime) -> Result<bool, AppError> {
        let result = self.collection::<Order>()
            .update_one(
                doc! { "_id": *id, "isDelivered": false },
                doc! { "$set": { "isDelivered": true, "deliveredAt": now, "updatedAt": now } },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1, "createdAt": -1 })
            .options(IndexOptions::builder()
                .name("user_created_at".to_string())
                .build())
            .build();

        let gateway_index = IndexModel::builder()
            .keys(doc! { "gatewayOrderId": 1 })
            .options(IndexOptions::builder()
                .sparse(true)
                .name("gateway_order_id".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection::<Order>()
            .create_indexes([user_index, gateway_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
