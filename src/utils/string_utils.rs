//! # 문자열 유틸리티
//!
//! multipart 폼 필드처럼 타입 정보 없이 들어오는 문자열 입력을 정리하고 변환합니다.

use std::str::FromStr;
use mongodb::bson::oid::ObjectId;
use rust_decimal::Decimal;
use serde::Deserialize;
use crate::errors::errors::AppError;

/// 공백을 제거한 뒤 비어 있으면 검증 에러를 반환합니다.
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field_name)));
    }
    Ok(trimmed.to_string())
}

pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 가격 문자열을 0보다 큰 Decimal로 변환합니다. (`"199"`, `"249.50"`)
pub fn parse_price(value: &str, field_name: &str) -> Result<Decimal, AppError> {
    let trimmed = validate_required_string(value, field_name)?;
    let price = Decimal::from_str(&trimmed)
        .map_err(|_| AppError::ValidationError(format!("{} must be a number", field_name)))?;

    if price <= Decimal::ZERO {
        return Err(AppError::ValidationError(format!("{} must be greater than 0", field_name)));
    }
    Ok(price.normalize())
}

/// HTML 폼에서 흔히 쓰는 불리언 표기(`true`/`on`/`1`/`yes`)를 해석합니다.
pub fn parse_bool(value: &str) -> Result<bool, AppError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Ok(true),
        "false" | "off" | "0" | "no" => Ok(false),
        other => Err(AppError::ValidationError(format!("'{}' is not a boolean", other))),
    }
}

/// 업로드 파일 이름에서 경로 구분자와 제어 문자를 제거합니다.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}

/// 경로 파라미터의 ObjectId를 파싱합니다. 형식이 틀리면 404 대신 400으로 응답합니다.
pub fn parse_object_id(raw: &str, resource: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("Invalid {} id", resource)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required_string() {
        assert_eq!(validate_required_string("  Pink Flower ", "name").unwrap(), "Pink Flower");
        assert!(validate_required_string("", "name").is_err());
        assert!(validate_required_string("\t\n", "name").is_err());
    }

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Gift  ".to_string())), Some("Gift".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("199", "price").unwrap(), Decimal::from(199));
        assert_eq!(parse_price(" 249.50 ", "price").unwrap(), Decimal::new(2495, 1));
        assert!(parse_price("0", "price").is_err());
        assert!(parse_price("-5", "price").is_err());
        assert!(parse_price("free", "price").is_err());
        assert!(parse_price("", "price").is_err());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("on").unwrap());
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\photos\\my flower.jpeg"), "myflower.jpeg");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_deserialize_optional_string() {
        #[derive(Deserialize)]
        struct Form {
            #[serde(default, deserialize_with = "deserialize_optional_string")]
            category: Option<String>,
        }

        let form: Form = serde_json::from_str(r#"{"category": "  Flower "}"#).unwrap();
        assert_eq!(form.category, Some("Flower".to_string()));

        let form: Form = serde_json::from_str(r#"{"category": "   "}"#).unwrap();
        assert_eq!(form.category, None);

        let form: Form = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(form.category, None);
    }

    #[test]
    fn test_parse_object_id() {
        let id = parse_object_id(" 65a1f0c2e4b0a1b2c3d4e5f6 ", "product").unwrap();
        assert_eq!(id.to_hex(), "65a1f0c2e4b0a1b2c3d4e5f6");

        match parse_object_id("p1", "product") {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Invalid product id"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
