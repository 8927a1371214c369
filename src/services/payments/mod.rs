pub mod razorpay_service;
pub mod payment_service;

pub use razorpay_service::*;
pub use payment_service::*;
