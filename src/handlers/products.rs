//! Product HTTP Handlers
//!
//! 카탈로그 조회는 공개, 등록/수정/삭제는 관리자 전용입니다. 관리자 폼은
//! `multipart/form-data`로 들어오며 `image` 필드에 파일 또는 URL 문자열을 받습니다.
use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpResponse};
use futures_util::TryStreamExt;
use crate::config::UploadConfig;
use crate::domain::dto::auth::MessageResponse;
use crate::domain::dto::products::{ProductForm, UploadedImage};
use crate::domain::models::auth::AdminUser;
use crate::errors::errors::AppError;
use crate::services::products::ProductService;
use crate::utils::string_utils::parse_object_id;

/// 텍스트 필드 하나의 최대 크기
const MAX_TEXT_FIELD_BYTES: usize = 16 * 1024;

#[get("")]
pub async fn list_products() -> Result<HttpResponse, AppError> {
    let products = ProductService::instance().list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

#[get("/{id}")]
pub async fn get_product(
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "product")?;
    let product = ProductService::instance().get_product(&id).await?;

    Ok(HttpResponse::Ok().json(product))
}

#[post("")]
pub async fn create_product(
    admin: AdminUser,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = read_product_form(payload).await?;
    log::debug!("상품 등록 요청: 관리자 {}", admin.0.user_id);

    let product = ProductService::instance().create_product(form).await?;
    Ok(HttpResponse::Created().json(product))
}

#[put("/{id}")]
pub async fn update_product(
    _admin: AdminUser,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "product")?;
    let form = read_product_form(payload).await?;

    let product = ProductService::instance().update_product(&id, form).await?;
    Ok(HttpResponse::Ok().json(product))
}

#[delete("/{id}")]
pub async fn delete_product(
    _admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "product")?;
    ProductService::instance().delete_product(&id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Product removed")))
}

/// multipart 본문을 [`ProductForm`]으로 모읍니다. 파일은 최대 크기를 넘는 순간 중단합니다.
async fn read_product_form(mut payload: Multipart) -> Result<ProductForm, AppError> {
    let mut form = ProductForm::default();
    let max_file_bytes = UploadConfig::max_bytes();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.essence_str().to_string());

        let is_file = name == "image" && file_name.as_deref().is_some_and(|f| !f.is_empty());
        let limit = if is_file { max_file_bytes } else { MAX_TEXT_FIELD_BYTES };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if bytes.len() + chunk.len() > limit {
                return Err(AppError::ValidationError(if is_file {
                    format!("Image too large (max {} bytes)", max_file_bytes)
                } else {
                    format!("Field '{}' is too long", name)
                }));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_file {
            form.image_file = Some(UploadedImage {
                content_type: content_type.unwrap_or_default(),
                original_name: file_name,
                bytes,
            });
        } else {
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::ValidationError(format!("Field '{}' must be text", name)))?;
            form.set_text_field(&name, value);
        }
    }

    Ok(form)
}

fn multipart_error(e: actix_multipart::MultipartError) -> AppError {
    AppError::ValidationError(format!("Invalid form data: {}", e))
}
