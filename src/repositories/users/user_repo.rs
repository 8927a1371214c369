//! # 사용자 리포지토리
//!
//! `users` 컬렉션 접근을 담당합니다. 비밀번호 해시와 재설정 토큰이 들어 있는 문서라
//! Redis에 캐시하지 않습니다.

use std::collections::HashMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, DateTime}, options::IndexOptions, IndexModel};
use crate::{
    core::registry::Repository,
    db::{is_duplicate_key, Database},
    domain::entities::users::User,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;

/// 사용자 데이터 액세스 리포지토리
///
/// ## 인덱스
/// - `email` (unique) - 로그인 조회 및 중복 가입 방지
/// - `resetPasswordToken` (sparse) - 비밀번호 재설정 토큰 조회
#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,
}

impl UserRepository {
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "_id": *id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 주문 목록에 사용자 이름을 채우기 위한 일괄 조회
    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, User>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users: Vec<User> = self.collection::<User>()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?
            .try_collect()
            .await?;

        Ok(users
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user)))
            .collect())
    }

    /// 사용자 저장. 이메일이 이미 있으면 `ConflictError`.
    ///
    /// 사전 조회와 유니크 인덱스를 함께 사용해 동시 가입 요청도 한 건만 성공합니다.
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("User already exists".to_string()));
        }

        let result = self.collection::<User>()
            .insert_one(&user)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    AppError::ConflictError("User already exists".to_string())
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        user.id = result.inserted_id.as_object_id();
        if user.id.is_none() {
            return Err(AppError::InternalError("insert_one did not return an ObjectId".to_string()));
        }

        Ok(user)
    }

    pub async fn set_reset_token(&self, id: &ObjectId, token_hash: &str, expires: DateTime) -> Result<(), AppError> {
        self.collection::<User>()
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": {
                    "resetPasswordToken": token_hash,
                    "resetPasswordExpires": expires,
                    "updatedAt": DateTime::now(),
                } },
            )
            .await?;

        Ok(())
    }

    /// 만료되지 않은 재설정 토큰 해시로 사용자를 찾습니다.
    pub async fn find_by_reset_token(&self, token_hash: &str, now: DateTime) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! {
                "resetPasswordToken": token_hash,
                "resetPasswordExpires": { "$gt": now },
            })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 비밀번호를 바꾸고 재설정 토큰을 폐기합니다.
    ///
    /// 같은 토큰으로 동시에 두 번 재설정하지 못하도록 토큰 해시를 조건에 포함합니다.
    pub async fn reset_password(&self, id: &ObjectId, token_hash: &str, password_hash: &str) -> Result<bool, AppError> {
        let result = self.collection::<User>()
            .update_one(
                doc! { "_id": *id, "resetPasswordToken": token_hash },
                doc! {
                    "$set": { "password": password_hash, "updatedAt": DateTime::now() },
                    "$unset": { "resetPasswordToken": "", "resetPasswordExpires": "" },
                },
            )
            .await?;

        Ok(result.modified_count > 0)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        let reset_token_index = IndexModel::builder()
            .keys(doc! { "resetPasswordToken": 1 })
            .options(IndexOptions::builder()
                .sparse(true)
                .name("reset_token".to_string())
                .build())
            .build();

        self.collection::<User>()
            .create_indexes([email_index, reset_token_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
