//! Payment HTTP Handlers
//!
//! 웹훅 서명은 본문 원문으로 계산되므로 JSON 추출자 대신 `web::Bytes`로 받습니다.
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use crate::domain::dto::payments::WebhookAck;
use crate::errors::errors::AppError;
use crate::services::payments::PaymentService;

const SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// 클라이언트 체크아웃 위젯 설정 (공개 키, 통화)
#[get("/config")]
pub async fn payment_config() -> HttpResponse {
    HttpResponse::Ok().json(PaymentService::instance().client_config())
}

#[post("/razorpay/webhook")]
pub async fn razorpay_webhook(
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let signature = req.headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok());

    let status = PaymentService::instance()
        .handle_webhook(&body, signature)
        .await?;

    Ok(HttpResponse::Ok().json(WebhookAck { status }))
}
