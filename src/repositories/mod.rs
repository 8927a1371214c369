//! # Repository Layer
//!
//! 컬렉션별 데이터 접근 계층입니다. 모든 리포지토리는 `#[repository]` 매크로로
//! 싱글톤 등록되며 `Database`(필요하면 `RedisClient`)를 자동 주입받습니다.
//!
//! | 리포지토리 | 컬렉션 | 캐시 |
//! |------------|--------|------|
//! | [`users::UserRepository`] | `users` | - |
//! | [`products::ProductRepository`] | `products` | Redis |
//! | [`carts::CartRepository`] | `carts` | - |
//! | [`orders::OrderRepository`] | `orders` | - |

pub mod users;
pub mod products;
pub mod carts;
pub mod orders;

use crate::errors::errors::AppError;

/// 실패하면 서버를 띄우지 않는 컬렉션. 고유 인덱스에 정합성이 걸려 있습니다.
const REQUIRED_INDEX_COLLECTIONS: [&str; 2] = ["users", "carts"];

/// 모든 컬렉션의 인덱스를 만듭니다. 서버 시작 시 한 번 호출됩니다.
///
/// `users.email`, `carts.user` 고유 인덱스 생성이 실패하면 에러를 반환합니다.
/// 나머지 컬렉션은 조회 성능용이라 경고만 남깁니다.
pub async fn ensure_indexes() -> Result<(), AppError> {
    let results = [
        ("users", users::UserRepository::instance().create_indexes().await),
        ("products", products::ProductRepository::instance().create_indexes().await),
        ("carts", carts::CartRepository::instance().create_indexes().await),
        ("orders", orders::OrderRepository::instance().create_indexes().await),
    ];

    let mut failed = Vec::new();
    for (collection, result) in results {
        match result {
            Ok(()) => log::info!("✅ {} 인덱스 확인 완료", collection),
            Err(e) if is_required_index(collection) => {
                log::error!("❌ {} 인덱스 생성 실패: {}", collection, e);
                failed.push(collection);
            }
            Err(e) => log::warn!("⚠️ {} 인덱스 생성 실패: {}", collection, e),
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(AppError::DatabaseError(format!("필수 인덱스 생성 실패: {}", failed.join(", "))))
    }
}

fn is_required_index(collection: &str) -> bool {
    REQUIRED_INDEX_COLLECTIONS.contains(&collection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_index_collections_are_required() {
        assert!(is_required_index("users"));
        assert!(is_required_index("carts"));
        assert!(!is_required_index("products"));
        assert!(!is_required_index("orders"));
    }
}
