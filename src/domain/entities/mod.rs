//! # 도메인 엔티티
//!
//! MongoDB 컬렉션 하나에 엔티티 하나가 대응합니다.
//!
//! | 엔티티 | 컬렉션 |
//! |--------|--------|
//! | [`users::User`] | `users` |
//! | [`products::Product`] | `products` |
//! | [`carts::Cart`] | `carts` |
//! | [`orders::Order`] | `orders` |

pub mod users;
pub mod products;
pub mod carts;
pub mod orders;
