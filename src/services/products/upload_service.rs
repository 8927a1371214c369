//! 상품 이미지 업로드 저장소
//!
//! 업로드 파일은 `UPLOAD_DIR`에 무작위 이름으로 저장되고 `/uploads/<파일명>` 경로로 노출됩니다.
//! 파일 IO는 `web::block`으로 블로킹 스레드 풀에서 수행합니다.

use std::path::PathBuf;
use actix_web::web;
use singleton_macro::service;
use uuid::Uuid;
use crate::{
    config::UploadConfig,
    domain::dto::products::UploadedImage,
    utils::string_utils::sanitize_filename,
};
use crate::errors::errors::AppError;

#[service(name = "upload")]
pub struct UploadService {}

impl UploadService {
    /// 이미지를 저장하고 공개 경로를 반환합니다.
    pub async fn save_image(&self, image: UploadedImage) -> Result<String, AppError> {
        let file_name = stored_file_name(&image.content_type, image.bytes.len(), UploadConfig::max_bytes())?;
        let dir = PathBuf::from(UploadConfig::dir());
        let path = dir.join(&file_name);

        web::block(move || {
            std::fs::create_dir_all(&dir)?;
            std::fs::write(&path, &image.bytes)
        })
        .await
        .map_err(|e| AppError::InternalError(format!("업로드 작업 실패: {}", e)))?
        .map_err(|e| AppError::InternalError(format!("이미지 저장 실패: {}", e)))?;

        log::info!(
            "이미지 업로드: {} (원본: {:?})",
            file_name,
            image.original_name.as_deref().map(sanitize_filename)
        );

        Ok(format!("{}/{}", UploadConfig::public_prefix(), file_name))
    }

    /// 업로드 디렉터리의 파일을 지웁니다. 없는 파일은 무시합니다.
    pub async fn delete_image(&self, file_name: &str) {
        let file_name = sanitize_filename(file_name);
        if file_name.is_empty() {
            return;
        }
        let path = PathBuf::from(UploadConfig::dir()).join(&file_name);

        let result = web::block(move || match std::fs::remove_file(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        })
        .await;

        match result {
            Ok(Ok(())) => log::debug!("업로드 이미지 삭제: {}", file_name),
            Ok(Err(e)) => log::warn!("업로드 이미지 삭제 실패 ({}): {}", file_name, e),
            Err(e) => log::warn!("업로드 이미지 삭제 작업 실패 ({}): {}", file_name, e),
        }
    }
}

/// 형식과 크기를 검사한 뒤 저장할 파일 이름을 만듭니다.
fn stored_file_name(content_type: &str, size: usize, max_bytes: usize) -> Result<String, AppError> {
    let extension = UploadConfig::extension_for(content_type).ok_or_else(|| {
        AppError::ValidationError(format!(
            "Unsupported image type. Allowed: {}",
            UploadConfig::ALLOWED_CONTENT_TYPES.join(", ")
        ))
    })?;

    if size == 0 {
        return Err(AppError::ValidationError("Image file is empty".to_string()));
    }
    if size > max_bytes {
        return Err(AppError::ValidationError(format!(
            "Image too large (max {} bytes)",
            max_bytes
        )));
    }

    Ok(format!("{}.{}", Uuid::new_v4().simple(), extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name() {
        let name = stored_file_name("image/png", 10, 100).unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), 32 + 4);
    }

    #[test]
    fn test_rejects_bad_uploads() {
        assert!(matches!(
            stored_file_name("application/pdf", 10, 100),
            Err(AppError::ValidationError(_))
        ));
        assert!(stored_file_name("image/jpeg", 0, 100).is_err());
        assert!(stored_file_name("image/jpeg", 101, 100).is_err());
    }
}
