pub mod upload_service;
pub mod product_service;

pub use upload_service::*;
pub use product_service::*;
