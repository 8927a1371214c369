//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//! 리포지토리와 다른 서비스는 `Arc` 필드로 선언하면 자동 주입됩니다.
//!
//! | 모듈 | 서비스 |
//! |------|--------|
//! | [`auth`] | `AuthService`, `TokenService` |
//! | [`products`] | `ProductService`, `UploadService` |
//! | [`carts`] | `CartService` |
//! | [`orders`] | `OrderService` |
//! | [`payments`] | `PaymentService`, `RazorpayService` |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{carts::CartService, orders::OrderService};
//!
//! let cart = CartService::instance().get_cart(&user_id).await?;
//! let orders = OrderService::instance().my_orders(&user_id).await?;
//! ```

pub mod auth;
pub mod products;
pub mod carts;
pub mod orders;
pub mod payments;
