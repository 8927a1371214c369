//! 기본 카탈로그 시드
//!
//! `products` 컬렉션을 비우고 기본 상품 다섯 개를 넣습니다. 상품 캐시도 함께 비웁니다.
//!
//! ```bash
//! PROFILE=dev cargo run --bin seed_products
//! ```

use std::io;
use std::sync::Arc;
use env_logger::Env;
use log::{error, info};
use rust_decimal::Decimal;
use storefront_backend::caching::redis::RedisClient;
use storefront_backend::core::registry::ServiceLocator;
use storefront_backend::db::Database;
use storefront_backend::domain::entities::products::Product;
use storefront_backend::services::products::ProductService;

/// (이름, 설명, 가격, 이미지, 카테고리)
const DEFAULT_CATALOG: [(&str, &str, i64, &str, &str); 5] = [
    ("Pink Flower", "Beautiful handmade pink flower made with love", 199, "assets/p1.jpeg", "Flower"),
    ("Bear Keychain", "Adorable bear keychain - perfect for keys or bags", 249, "assets/p2.jpeg", "Keychain"),
    ("Flower Bouquet", "Colorful flower bouquet - a perfect gift", 299, "assets/p3.jpeg", "Bouquet"),
    ("Custom Gift", "Custom made gift - personalize your order", 349, "assets/p5.jpeg", "Gift"),
    ("Colorful Tulips", "Beautiful colorful tulips arrangement", 399, "assets/p6.jpeg", "Flower"),
];

fn default_products() -> Vec<Product> {
    DEFAULT_CATALOG
        .iter()
        .map(|(name, description, price, image, category)| {
            Product::new(
                name.to_string(),
                description.to_string(),
                Decimal::from(*price),
                image.to_string(),
                category.to_string(),
                true,
            )
        })
        .collect()
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());
    let _ = match profile.as_str() {
        "prod" => dotenv::from_filename(".env.prod"),
        "dev" => dotenv::from_filename(".env.dev"),
        _ => dotenv::dotenv(),
    };
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let database = Database::new()
        .await
        .map_err(|e| io::Error::other(format!("데이터베이스 연결 실패: {}", e)))?;
    info!("Database connected: {}", database.database_name());

    let redis_client = RedisClient::new()
        .await
        .map_err(|e| io::Error::other(format!("Redis 연결 실패: {}", e)))?;

    ServiceLocator::set(Arc::new(database));
    ServiceLocator::set(Arc::new(redis_client));

    match ProductService::instance().replace_catalog(default_products()).await {
        Ok(count) => {
            info!("✅ Products seeded successfully! ({} products)", count);
            Ok(())
        }
        Err(e) => {
            error!("❌ Error seeding products: {}", e);
            Err(io::Error::other(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_products() {
        let products = default_products();

        assert_eq!(products.len(), 5);
        assert!(products.iter().all(|p| p.in_stock && p.id.is_none()));
        assert_eq!(products[0].name, "Pink Flower");
        assert_eq!(products[4].price, Decimal::from(399));
        assert_eq!(products[3].image, "assets/p5.jpeg");
    }
}
