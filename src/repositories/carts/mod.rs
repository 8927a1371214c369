pub mod cart_repo;

pub use cart_repo::*;
