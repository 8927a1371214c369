//! Order HTTP Handlers
//!
//! | Method | Path | 권한 |
//! |--------|------|------|
//! | POST | `/api/orders` | 사용자 |
//! | GET | `/api/orders/myorders` | 사용자 |
//! | GET | `/api/orders/{id}` | 주문자 또는 관리자 |
//! | PUT | `/api/orders/{id}/pay` | 주문자 또는 관리자 |
//! | GET | `/api/orders` | 관리자 |
//! | PUT | `/api/orders/{id}/status` | 관리자 |
//!
//! `/myorders`는 `/{id}`보다 먼저 등록해야 합니다.
use actix_web::{get, post, put, web, HttpResponse};
use crate::domain::dto::orders::{CreateOrderRequest, PayOrderRequest, UpdateOrderStatusRequest};
use crate::domain::models::auth::{AdminUser, AuthenticatedUser};
use crate::errors::errors::AppError;
use crate::services::orders::OrderService;
use crate::utils::string_utils::parse_object_id;

/// 체크아웃. 주문과 Razorpay 주문을 함께 만듭니다.
#[post("")]
pub async fn create_order(
    user: AuthenticatedUser,
    payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let response = OrderService::instance()
        .create_order(&user.object_id()?, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/myorders")]
pub async fn my_orders(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let orders = OrderService::instance().my_orders(&user.object_id()?).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[get("/{id}")]
pub async fn get_order(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "order")?;
    let order = OrderService::instance().get_order(&user, &id).await?;

    Ok(HttpResponse::Ok().json(order))
}

/// 결제 완료 기록. 체크아웃 위젯의 결제 결과를 그대로 전달받습니다.
#[put("/{id}/pay")]
pub async fn pay_order(
    user: AuthenticatedUser,
    path: web::Path<String>,
    payload: web::Json<PayOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "order")?;
    let order = OrderService::instance()
        .pay_order(&user, &id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(order))
}

#[get("")]
pub async fn list_orders(_admin: AdminUser) -> Result<HttpResponse, AppError> {
    let orders = OrderService::instance().list_all().await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[put("/{id}/status")]
pub async fn update_order_status(
    admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdateOrderStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path, "order")?;
    log::info!("주문 상태 변경 요청: {} by {}", id, admin.0.user_id);

    let order = OrderService::instance()
        .update_status(&id, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(order))
}
