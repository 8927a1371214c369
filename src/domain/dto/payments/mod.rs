use serde::Serialize;

/// 클라이언트 체크아웃 위젯 초기화에 필요한 공개 설정
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigResponse {
    pub key_id: String,
    pub currency: String,
}

/// 웹훅 처리 결과. 게이트웨이는 2xx 응답만 확인합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookOutcome {
    Processed,
    Duplicate,
    Ignored,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: WebhookOutcome,
}
