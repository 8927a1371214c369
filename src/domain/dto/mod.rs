//! # Data Transfer Objects
//!
//! HTTP 요청/응답 본문입니다. 응답은 브라우저 클라이언트가 기대하는 형태
//! (camelCase 필드, 문자열 `_id`, RFC 3339 시각)로 직렬화됩니다.
//!
//! 엔티티를 그대로 JSON으로 내보내면 `ObjectId`가 `{"$oid": ...}` 형태가 되므로
//! 모든 응답은 이 모듈의 타입을 거칩니다.

pub mod auth;
pub mod products;
pub mod carts;
pub mod orders;
pub mod payments;

use mongodb::bson::DateTime;

/// BSON 시각을 RFC 3339 문자열로 변환합니다.
pub fn to_rfc3339(value: DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}
