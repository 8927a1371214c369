//! Product Entity
//!
//! 카탈로그 상품 문서입니다. 가격은 `Decimal`로 다루되 BSON/JSON에는 숫자(double)로 저장됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// 외부 URL 또는 `/uploads/<file>`
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(default = "DateTime::now")]
    pub created_at: DateTime,
    #[serde(default = "DateTime::now")]
    pub updated_at: DateTime,
}

fn default_in_stock() -> bool {
    true
}

/// 관리자 상품 수정 요청에서 바뀌는 필드들
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `$set` 문서로 변환합니다. `updatedAt`은 항상 포함됩니다.
    pub fn to_set_document(&self, now: DateTime) -> mongodb::bson::Document {
        let mut set = mongodb::bson::doc! { "updatedAt": now };

        if let Some(name) = &self.name {
            set.insert("name", name.clone());
        }
        if let Some(description) = &self.description {
            set.insert("description", description.clone());
        }
        if let Some(price) = self.price {
            set.insert("price", decimal_to_f64(price));
        }
        if let Some(image) = &self.image {
            set.insert("image", image.clone());
        }
        if let Some(category) = &self.category {
            set.insert("category", category.clone());
        }
        if let Some(in_stock) = self.in_stock {
            set.insert("inStock", in_stock);
        }

        set
    }
}

impl Product {
    pub fn new(
        name: String,
        description: String,
        price: Decimal,
        image: String,
        category: String,
        in_stock: bool,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            name,
            description,
            price,
            image,
            category,
            in_stock,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    /// 업로드 디렉터리에 저장된 이미지라면 그 파일 이름을 반환합니다.
    pub fn uploaded_image_file(&self, public_prefix: &str) -> Option<&str> {
        self.image
            .strip_prefix(public_prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|file| !file.is_empty() && !file.contains('/'))
    }
}

/// BSON에 숫자로 저장하기 위한 변환
pub fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or_default()
}
