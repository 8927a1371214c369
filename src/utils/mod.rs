//! 공통 유틸리티
//!
//! - [`string_utils`]: 폼/JSON 입력 정리, 가격과 불리언 파싱, ObjectId 경로 파라미터
//! - [`display_terminal`]: 레지스트리 초기화 진행 상황 출력
//!
//! ```rust,ignore
//! use crate::utils::string_utils::{parse_object_id, parse_price};
//!
//! let id = parse_object_id("65a1f0c2e4b0a1b2c3d4e5f6", "product")?;
//! let price = parse_price("199.00", "Price")?;
//! ```

pub mod string_utils;
pub mod display_terminal;
