//! 캐싱 계층 모듈
//!
//! Redis를 백엔드로 하는 JSON 캐시를 제공합니다.
//!
//! ```rust,ignore
//! use crate::caching::redis::RedisClient;
//!
//! let cache = RedisClient::new().await?;
//! cache.set_with_expiry("products:all", &products, 300).await?;
//!
//! let cached: Option<Vec<Product>> = cache.get("products:all").await?;
//! let first_delivery = cache.set_nx_with_expiry("payment_event:pay_123", &"captured", 604800).await?;
//! ```
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
