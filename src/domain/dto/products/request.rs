//! 관리자 상품 등록/수정 폼
//!
//! `multipart/form-data`의 텍스트 필드를 모아 둔 뒤, 등록 시에는 필수 필드를 검사하고
//! 수정 시에는 들어온 필드만 변경합니다.

use crate::domain::entities::products::{Product, ProductChanges};
use crate::errors::errors::AppError;
use crate::utils::string_utils::{clean_optional_string, parse_bool, parse_price, validate_required_string};

/// 업로드된 이미지 파일
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub original_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<String>,
    /// 파일 대신 전달된 이미지 URL
    pub image_url: Option<String>,
    pub image_file: Option<UploadedImage>,
}

impl ProductForm {
    /// 텍스트 필드 하나를 기록합니다. 알 수 없는 필드는 무시합니다.
    pub fn set_text_field(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = Some(value),
            "description" => self.description = Some(value),
            "price" => self.price = Some(value),
            "category" => self.category = Some(value),
            "inStock" | "in_stock" => self.in_stock = Some(value),
            "image" | "imageUrl" => self.image_url = Some(value),
            other => log::debug!("무시된 상품 폼 필드: {}", other),
        }
    }

    /// 신규 상품으로 변환합니다. `image`는 업로드 처리 후 결정된 최종 이미지 경로입니다.
    pub fn into_new_product(self, image: Option<String>) -> Result<Product, AppError> {
        let name = validate_required_string(self.name.as_deref().unwrap_or_default(), "Name")?;
        let description = clean_optional_string(self.description).unwrap_or_default();
        let price = parse_price(self.price.as_deref().unwrap_or_default(), "Price")?;
        let category = clean_optional_string(self.category).unwrap_or_default();
        let in_stock = match clean_optional_string(self.in_stock) {
            Some(raw) => parse_bool(&raw)?,
            None => true,
        };
        let image = image
            .or_else(|| clean_optional_string(self.image_url))
            .ok_or_else(|| AppError::ValidationError("Image is required".to_string()))?;

        Ok(Product::new(name, description, price, image, category, in_stock))
    }

    /// 부분 수정으로 변환합니다. 비어 있는 필드는 변경하지 않습니다.
    pub fn into_changes(self, image: Option<String>) -> Result<ProductChanges, AppError> {
        let price = match clean_optional_string(self.price) {
            Some(raw) => Some(parse_price(&raw, "Price")?),
            None => None,
        };
        let in_stock = match clean_optional_string(self.in_stock) {
            Some(raw) => Some(parse_bool(&raw)?),
            None => None,
        };

        Ok(ProductChanges {
            name: clean_optional_string(self.name),
            // 설명은 빈 문자열로 지울 수 있다
            description: self.description.map(|d| d.trim().to_string()),
            price,
            image: image.or_else(|| clean_optional_string(self.image_url)),
            category: clean_optional_string(self.category),
            in_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn form(fields: &[(&str, &str)]) -> ProductForm {
        let mut form = ProductForm::default();
        for (field, value) in fields {
            form.set_text_field(field, value.to_string());
        }
        form
    }

    #[test]
    fn test_new_product_from_form() {
        let product = form(&[
            ("name", " Custom Gift "),
            ("description", "Custom made gift"),
            ("price", "349"),
            ("category", "Gift"),
        ])
        .into_new_product(Some("/uploads/a1.png".to_string()))
        .unwrap();

        assert_eq!(product.name, "Custom Gift");
        assert_eq!(product.price, Decimal::from(349));
        assert_eq!(product.image, "/uploads/a1.png");
        assert!(product.in_stock);
    }

    #[test]
    fn test_new_product_uses_image_url_when_no_file() {
        let product = form(&[("name", "Tulips"), ("price", "399"), ("image", "https://cdn.example.com/t.jpg")])
            .into_new_product(None)
            .unwrap();

        assert_eq!(product.image, "https://cdn.example.com/t.jpg");
    }

    #[test]
    fn test_new_product_requires_fields() {
        assert!(form(&[("price", "10"), ("image", "x")]).into_new_product(None).is_err());
        assert!(form(&[("name", "A"), ("image", "x")]).into_new_product(None).is_err());
        assert!(form(&[("name", "A"), ("price", "10")]).into_new_product(None).is_err());
        assert!(form(&[("name", "A"), ("price", "abc"), ("image", "x")]).into_new_product(None).is_err());
    }

    #[test]
    fn test_changes_only_include_sent_fields() {
        let changes = form(&[("price", "299.5"), ("inStock", "false"), ("name", "  ")])
            .into_changes(None)
            .unwrap();

        assert_eq!(changes.price, Some(Decimal::new(2995, 1)));
        assert_eq!(changes.in_stock, Some(false));
        assert_eq!(changes.name, None);
        assert_eq!(changes.image, None);
    }

    #[test]
    fn test_uploaded_image_overrides_url() {
        let changes = form(&[("image", "https://old.example.com/a.jpg")])
            .into_changes(Some("/uploads/new.jpg".to_string()))
            .unwrap();

        assert_eq!(changes.image.as_deref(), Some("/uploads/new.jpg"));
    }
}
