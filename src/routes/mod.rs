//! API 라우트 설정 모듈
//!
//! RESTful API 엔드포인트들을 기능별 스코프로 묶어 등록합니다.
//!
//! # Auth Middleware Usage
//!
//! | 스코프 | 미들웨어 | 비고 |
//! |--------|----------|------|
//! | `/api/auth` | `optional` | `/me`만 `AuthenticatedUser` 필요 |
//! | `/api/products` | `optional` | 쓰기 핸들러는 `AdminUser` |
//! | `/api/cart` | `required` | |
//! | `/api/orders` | `required` | 관리자 핸들러는 `AdminUser` |
//! | `/api/payments` | - | 웹훅은 서명으로 검증 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::errors::errors::json_error_handler;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(health_check);

    configure_auth_routes(cfg);
    configure_product_routes(cfg);
    configure_cart_routes(cfg);
    configure_order_routes(cfg);
    configure_payment_routes(cfg);
}

/// 인증 관련 라우트
///
/// ```bash
/// curl -X POST http://localhost:8080/api/auth/login \
///   -H "Content-Type: application/json" \
///   -d '{"email":"user@example.com","password":"secret1"}'
/// ```
fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .wrap(AuthMiddleware::optional())
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::forgot_password)
            .service(handlers::auth::reset_password)
            .service(handlers::auth::me)
    );
}

/// 상품 라우트. 조회는 공개, 쓰기는 관리자 전용입니다.
///
/// ```bash
/// curl -X POST http://localhost:8080/api/products \
///   -H "Authorization: Bearer $ADMIN_TOKEN" \
///   -F name="Pink Flower" -F price=199 -F category=Flower -F image=@p1.jpeg
/// ```
fn configure_product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .wrap(AuthMiddleware::optional())
            .service(handlers::products::list_products)
            .service(handlers::products::get_product)
            .service(handlers::products::create_product)
            .service(handlers::products::update_product)
            .service(handlers::products::delete_product)
    );
}

fn configure_cart_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/cart")
            .wrap(AuthMiddleware::required())
            .service(handlers::cart::get_cart)
            .service(handlers::cart::add_to_cart)
            .service(handlers::cart::replace_cart)
            .service(handlers::cart::clear_cart)
            .service(handlers::cart::remove_from_cart)
    );
}

fn configure_order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/orders")
            .wrap(AuthMiddleware::required())
            .service(handlers::orders::create_order)
            .service(handlers::orders::list_orders)
            // `/{id}`보다 먼저
            .service(handlers::orders::my_orders)
            .service(handlers::orders::get_order)
            .service(handlers::orders::pay_order)
            .service(handlers::orders::update_order_status)
    );
}

fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/payments")
            .service(handlers::payments::payment_config)
            .service(handlers::payments::razorpay_webhook)
    );
}

/// 서비스 상태를 확인하는 헬스체크 엔드포인트
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "storefront_backend",
///   "version": "0.1.0",
///   "timestamp": "2026-01-01T00:00:00+00:00"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "payments": "Razorpay"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use actix_web::App;

    #[actix_web::test]
    async fn test_health_check() {
        let app = init_service(App::new().service(health_check)).await;

        let resp = call_service(&app, TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "storefront_backend");
    }

    #[actix_web::test]
    async fn test_cart_requires_token() {
        let app = init_service(App::new().configure(configure_all_routes)).await;

        let resp = call_service(&app, TestRequest::get().uri("/api/cart").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_malformed_json_gets_error_body() {
        let app = init_service(App::new().configure(configure_all_routes)).await;

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_wrong_content_type_gets_error_body() {
        let app = init_service(App::new().configure(configure_all_routes)).await;

        let req = TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("Content-Type", "text/plain"))
            .set_payload("email=a")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = read_body_json(resp).await;
        assert_eq!(body["message"], "Content-Type must be application/json");
    }

    #[actix_web::test]
    async fn test_admin_routes_reject_anonymous() {
        let app = init_service(App::new().configure(configure_all_routes)).await;

        let req = TestRequest::delete()
            .uri("/api/products/65a1f0c2e4b0a1b2c3d4e5f6")
            .to_request();
        let resp = call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
