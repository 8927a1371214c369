//! Cart HTTP Handlers
//!
//! 모든 엔드포인트는 로그인한 사용자 본인의 장바구니만 다룹니다.
use actix_web::{delete, get, post, put, web, HttpResponse};
use validator::Validate;
use crate::domain::dto::carts::{AddToCartRequest, ReplaceCartRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::errors::errors::AppError;
use crate::services::carts::CartService;

#[get("")]
pub async fn get_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let cart = CartService::instance().get_cart(&user.object_id()?).await?;
    Ok(HttpResponse::Ok().json(cart))
}

/// 상품 담기. 이미 담긴 상품이면 수량이 더해집니다.
#[post("")]
pub async fn add_to_cart(
    user: AuthenticatedUser,
    payload: web::Json<AddToCartRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let cart = CartService::instance()
        .add_item(&user.object_id()?, &payload.product_id, payload.quantity)
        .await?;

    Ok(HttpResponse::Created().json(cart))
}

/// 브라우저 localStorage 장바구니와 동기화 (전체 교체)
#[put("")]
pub async fn replace_cart(
    user: AuthenticatedUser,
    payload: web::Json<ReplaceCartRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let cart = CartService::instance()
        .replace_items(&user.object_id()?, &payload.items)
        .await?;

    Ok(HttpResponse::Ok().json(cart))
}

#[delete("/{product_id}")]
pub async fn remove_from_cart(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let cart = CartService::instance()
        .remove_item(&user.object_id()?, &path)
        .await?;

    Ok(HttpResponse::Ok().json(cart))
}

#[delete("")]
pub async fn clear_cart(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    CartService::instance().clear(&user.object_id()?).await?;
    Ok(HttpResponse::NoContent().finish())
}
