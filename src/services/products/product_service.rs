//! 상품 카탈로그 서비스
//!
//! 공개 조회와 관리자 등록/수정/삭제를 담당합니다. 업로드 이미지가 붙은 폼은
//! [`UploadService`]로 파일을 저장한 뒤 상품 문서에 공개 경로를 기록합니다.

use std::sync::Arc;
use mongodb::bson::oid::ObjectId;
use singleton_macro::service;
use crate::{
    config::UploadConfig,
    domain::{
        dto::products::{ProductForm, ProductResponse},
        entities::products::Product,
    },
    repositories::products::ProductRepository,
    services::products::UploadService,
};
use crate::errors::errors::AppError;

#[service(name = "product")]
pub struct ProductService {
    product_repo: Arc<ProductRepository>,
    upload_service: Arc<UploadService>,
}

impl ProductService {
    pub async fn list_products(&self) -> Result<Vec<ProductResponse>, AppError> {
        let products = self.product_repo.find_all().await?;
        Ok(products.into_iter().map(ProductResponse::from).collect())
    }

    pub async fn get_product(&self, id: &ObjectId) -> Result<ProductResponse, AppError> {
        self.product_repo
            .find_by_id(id)
            .await?
            .map(ProductResponse::from)
            .ok_or_else(product_not_found)
    }

    pub async fn create_product(&self, mut form: ProductForm) -> Result<ProductResponse, AppError> {
        let image = self.store_upload(&mut form).await?;

        let product = match form.into_new_product(image.clone()) {
            Ok(product) => product,
            Err(e) => {
                self.discard_upload(image.as_deref()).await;
                return Err(e);
            }
        };

        let created = self.product_repo.create(product).await?;
        log::info!("상품 등록: {} ({:?})", created.name, created.id);

        Ok(ProductResponse::from(created))
    }

    pub async fn update_product(&self, id: &ObjectId, mut form: ProductForm) -> Result<ProductResponse, AppError> {
        let existing = self.product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(product_not_found)?;

        let image = self.store_upload(&mut form).await?;
        let changes = match form.into_changes(image.clone()) {
            Ok(changes) => changes,
            Err(e) => {
                self.discard_upload(image.as_deref()).await;
                return Err(e);
            }
        };

        if changes.is_empty() {
            return Ok(ProductResponse::from(existing));
        }

        let updated = self.product_repo
            .update(id, &changes)
            .await?
            .ok_or_else(product_not_found)?;

        // 이미지가 바뀌었으면 이전 업로드 파일 정리
        if changes.image.is_some() && existing.image != updated.image {
            self.remove_uploaded_image(&existing).await;
        }

        log::info!("상품 수정: {} ({})", updated.name, id);
        Ok(ProductResponse::from(updated))
    }

    pub async fn delete_product(&self, id: &ObjectId) -> Result<(), AppError> {
        let deleted = self.product_repo
            .delete(id)
            .await?
            .ok_or_else(product_not_found)?;

        self.remove_uploaded_image(&deleted).await;
        log::info!("상품 삭제: {} ({})", deleted.name, id);

        Ok(())
    }

    /// 카탈로그를 통째로 교체합니다.
    pub async fn replace_catalog(&self, products: Vec<Product>) -> Result<usize, AppError> {
        self.product_repo.replace_all(products).await
    }

    async fn store_upload(&self, form: &mut ProductForm) -> Result<Option<String>, AppError> {
        match form.image_file.take() {
            Some(file) => Ok(Some(self.upload_service.save_image(file).await?)),
            None => Ok(None),
        }
    }

    async fn discard_upload(&self, image: Option<&str>) {
        let prefix = format!("{}/", UploadConfig::public_prefix());
        if let Some(file) = image.and_then(|path| path.strip_prefix(prefix.as_str())) {
            self.upload_service.delete_image(file).await;
        }
    }

    async fn remove_uploaded_image(&self, product: &Product) {
        if let Some(file) = product.uploaded_image_file(UploadConfig::public_prefix()) {
            self.upload_service.delete_image(file).await;
        }
    }
}

fn product_not_found() -> AppError {
    AppError::NotFound("Product not found".to_string())
}
