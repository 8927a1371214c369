//! # 주문 서비스
//!
//! ## 체크아웃
//!
//! ```text
//! CreateOrderRequest
//!    ├─ 항목별 상품 확인 (ObjectId → 이름 순서로 조회)
//!    ├─ 카탈로그 가격으로 itemsPrice 재계산, totalPrice = items + tax + shipping
//!    ├─ orders 문서 저장
//!    └─ Razorpay 주문 생성 (receipt = 주문 ID) 후 gatewayOrderId 기록
//! ```
//!
//! ## 결제 기록
//!
//! 결제 완료는 `isPaid == false` 조건부 업데이트로만 기록합니다. 같은 결제 ID가 다시
//! 들어오면 저장된 주문을 그대로 돌려주고, 다른 결제 ID라면 409로 거부합니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use mongodb::bson::{oid::ObjectId, DateTime};
use rust_decimal::Decimal;
use singleton_macro::service;
use validator::Validate;
use crate::{
    config::RazorpayConfig,
    domain::{
        dto::orders::{
            CreateOrderRequest, CreateOrderResponse, OrderItemRequest, OrderResponse, OrderUserResponse,
            PayOrderRequest, UpdateOrderStatusRequest,
        },
        dto::payments::WebhookOutcome,
        entities::{
            orders::{items_price, to_minor_units, total_price, Order, OrderItem, PaymentResult, PaymentState},
            products::Product,
        },
        models::{auth::AuthenticatedUser, payment::CapturedPayment},
    },
    repositories::{carts::CartRepository, orders::OrderRepository, products::ProductRepository, users::UserRepository},
    services::{
        carts::MAX_LINE_QUANTITY,
        payments::{verify_payment_signature, RazorpayService},
    },
};
use crate::errors::errors::AppError;

#[service(name = "order")]
pub struct OrderService {
    order_repo: Arc<OrderRepository>,
    product_repo: Arc<ProductRepository>,
    user_repo: Arc<UserRepository>,
    cart_repo: Arc<CartRepository>,
    razorpay_service: Arc<RazorpayService>,
}

impl OrderService {
    pub async fn create_order(&self, user: &ObjectId, request: CreateOrderRequest) -> Result<CreateOrderResponse, AppError> {
        request.validate()?;
        if request.order_items.is_empty() {
            return Err(AppError::ValidationError("No order items".to_string()));
        }

        let products = self.resolve_products(&request.order_items).await?;
        let order_items = request.order_items
            .iter()
            .zip(products.iter())
            .map(|(item, product)| build_order_item(item, product.as_ref()))
            .collect::<Result<Vec<_>, AppError>>()?;

        let charges = compute_charges(&order_items, &request)?;
        let amount = to_minor_units(charges.total_price)
            .filter(|amount| *amount > 0)
            .ok_or_else(|| AppError::ValidationError("Invalid order total".to_string()))?;
        let now = DateTime::now();

        let order = Order {
            id: None,
            user: *user,
            order_items,
            shipping_address: request.shipping_address.into(),
            payment_method: request.payment_method,
            payment_result: None,
            gateway_order_id: None,
            items_price: charges.items_price,
            tax_price: charges.tax_price,
            shipping_price: charges.shipping_price,
            total_price: charges.total_price,
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut order = self.order_repo.create(order).await?;
        let order_id = order.id
            .ok_or_else(|| AppError::InternalError("주문 ID가 없습니다".to_string()))?;
        log::info!("주문 생성: {} (user={}, total={})", order_id, user, order.total_price);

        let razorpay_order = match self.razorpay_service
            .create_order(amount, &RazorpayConfig::currency(), &order_id.to_hex())
            .await
        {
            Ok(razorpay_order) => razorpay_order,
            Err(e) => {
                // 게이트웨이 주문이 없으면 결제할 수 없는 주문이므로 남기지 않는다
                if let Err(del_err) = self.order_repo.delete_unpaid(&order_id).await {
                    log::error!("게이트웨이 실패 후 주문 삭제 실패 ({}): {}", order_id, del_err);
                }
                return Err(e);
            }
        };

        if let Err(e) = self.order_repo.set_gateway_order_id(&order_id, &razorpay_order.id).await {
            if let Err(del_err) = self.order_repo.delete_unpaid(&order_id).await {
                log::error!("게이트웨이 ID 기록 실패 후 주문 삭제 실패 ({}): {}", order_id, del_err);
            }
            return Err(e);
        }
        order.gateway_order_id = Some(razorpay_order.id.clone());

        Ok(CreateOrderResponse {
            created_order: OrderResponse::from(order),
            razorpay_order,
        })
    }

    pub async fn my_orders(&self, user: &ObjectId) -> Result<Vec<OrderResponse>, AppError> {
        let orders = self.order_repo.find_by_user(user).await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn get_order(&self, caller: &AuthenticatedUser, id: &ObjectId) -> Result<OrderResponse, AppError> {
        let order = self.find_accessible(caller, id).await?;

        let user = match self.user_repo.find_by_id(&order.user).await? {
            Some(user) => OrderUserResponse::summary(&user, true),
            None => OrderUserResponse::id(&order.user),
        };

        Ok(OrderResponse::new(order, user))
    }

    pub async fn pay_order(&self, caller: &AuthenticatedUser, id: &ObjectId, request: PayOrderRequest) -> Result<OrderResponse, AppError> {
        request.validate()?;
        let order = self.find_accessible(caller, id).await?;

        match order.payment_state(&request.id) {
            PaymentState::PaidWithSameId => return Ok(OrderResponse::from(order)),
            PaymentState::PaidWithOtherId => {
                return Err(AppError::ConflictError("Order already paid".to_string()));
            }
            PaymentState::Unpaid => {}
        }

        check_payment_signature(
            order.gateway_order_id.as_deref(),
            request.razorpay_order_id.as_deref(),
            request.id.trim(),
            request.razorpay_signature.as_deref(),
            RazorpayConfig::require_signature(),
            &RazorpayConfig::key_secret(),
        )
        .inspect_err(|e| log::warn!("결제 서명 거부: order={} payment={} ({})", id, request.id, e))?;

        let payment = PaymentResult {
            id: request.id.trim().to_string(),
            status: if request.status.is_empty() { "completed".to_string() } else { request.status },
            update_time: if request.update_time.is_empty() {
                chrono::Utc::now().to_rfc3339()
            } else {
                request.update_time
            },
            email_address: request.email_address,
        };

        self.record_payment(&order, payment).await.map(OrderResponse::from)
    }

    /// 관리자 주문 목록. 사용자는 `{_id, name}`만 채웁니다.
    pub async fn list_all(&self) -> Result<Vec<OrderResponse>, AppError> {
        let orders = self.order_repo.find_all().await?;

        let user_ids: Vec<ObjectId> = orders
            .iter()
            .map(|order| order.user)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let users = self.user_repo.find_by_ids(&user_ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let user = match users.get(&order.user) {
                    Some(user) => OrderUserResponse::summary(user, false),
                    None => OrderUserResponse::id(&order.user),
                };
                OrderResponse::new(order, user)
            })
            .collect())
    }

    /// 관리자 상태 변경. 플래그는 true 방향으로만 바뀝니다.
    pub async fn update_status(&self, id: &ObjectId, request: UpdateOrderStatusRequest) -> Result<OrderResponse, AppError> {
        let order = self.order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(order_not_found)?;

        let transition = order.status_transition(request.is_paid, request.is_delivered);
        if transition.is_noop() {
            return Ok(OrderResponse::from(order));
        }

        let now = DateTime::now();
        if transition.mark_paid && self.order_repo.mark_paid_manually(id, now).await? {
            log::info!("관리자 결제 처리: {}", id);
        }
        if transition.mark_delivered && self.order_repo.mark_delivered(id, now).await? {
            log::info!("배송 완료 처리: {}", id);
        }

        self.order_repo
            .find_by_id(id)
            .await?
            .map(OrderResponse::from)
            .ok_or_else(order_not_found)
    }

    /// 웹훅으로 들어온 결제 완료를 기록합니다.
    pub async fn mark_paid_from_webhook(&self, captured: &CapturedPayment) -> Result<WebhookOutcome, AppError> {
        let Some(order) = self.order_repo.find_by_gateway_order_id(&captured.gateway_order_id).await? else {
            log::warn!("웹훅 주문을 찾을 수 없음: {}", captured.gateway_order_id);
            return Ok(WebhookOutcome::Ignored);
        };

        match order.payment_state(&captured.payment_id) {
            PaymentState::PaidWithSameId => return Ok(WebhookOutcome::Duplicate),
            PaymentState::PaidWithOtherId => {
                log::warn!(
                    "이미 다른 결제로 완료된 주문: {:?} (webhook payment={})",
                    order.id, captured.payment_id
                );
                return Ok(WebhookOutcome::Ignored);
            }
            PaymentState::Unpaid => {}
        }

        let payment = PaymentResult {
            id: captured.payment_id.clone(),
            status: captured.status.clone(),
            update_time: captured.created_at
                .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
                .unwrap_or_else(chrono::Utc::now)
                .to_rfc3339(),
            email_address: captured.email.clone(),
        };

        match self.record_payment(&order, payment).await {
            Ok(_) => Ok(WebhookOutcome::Processed),
            Err(AppError::ConflictError(_)) => Ok(WebhookOutcome::Ignored),
            Err(e) => Err(e),
        }
    }

    async fn find_accessible(&self, caller: &AuthenticatedUser, id: &ObjectId) -> Result<Order, AppError> {
        let order = self.order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(order_not_found)?;

        if !caller.is_admin() && !order.is_owned_by(&caller.object_id()?) {
            return Err(AppError::AuthorizationError("Not authorized to access this order".to_string()));
        }

        Ok(order)
    }

    /// 조건부 업데이트로 결제를 기록하고 주문자의 장바구니를 비웁니다.
    async fn record_payment(&self, order: &Order, payment: PaymentResult) -> Result<Order, AppError> {
        let id = order.id
            .ok_or_else(|| AppError::InternalError("주문 ID가 없습니다".to_string()))?;

        let paid = match self.order_repo.mark_paid(&id, &payment, DateTime::now()).await? {
            Some(paid) => paid,
            None => {
                // 동시에 다른 요청이 먼저 결제를 기록한 경우
                let current = self.order_repo.find_by_id(&id).await?.ok_or_else(order_not_found)?;
                return match current.payment_state(&payment.id) {
                    PaymentState::PaidWithOtherId => Err(AppError::ConflictError("Order already paid".to_string())),
                    _ => Ok(current),
                };
            }
        };

        log::info!("결제 완료: order={} payment={}", id, payment.id);

        if let Err(e) = self.cart_repo.clear(&paid.user).await {
            log::warn!("결제 후 장바구니 비우기 실패 ({}): {}", paid.user, e);
        }

        Ok(paid)
    }

    /// 항목 순서대로 상품을 찾습니다. ObjectId가 없거나 찾지 못하면 이름으로 다시 찾습니다.
    async fn resolve_products(&self, items: &[OrderItemRequest]) -> Result<Vec<Option<Product>>, AppError> {
        let ids: Vec<ObjectId> = items
            .iter()
            .filter_map(|item| item.product.as_ref().and_then(|p| p.object_id()))
            .collect();
        let by_id: HashMap<ObjectId, Product> = self.product_repo.find_by_ids(&ids).await?;

        let mut resolved = Vec::with_capacity(items.len());
        for item in items {
            let found = item.product
                .as_ref()
                .and_then(|p| p.object_id())
                .and_then(|id| by_id.get(&id).cloned());

            let found = match found {
                Some(product) => Some(product),
                None => self.product_repo.find_by_name(&item.name).await?,
            };
            resolved.push(found);
        }

        Ok(resolved)
    }
}

fn order_not_found() -> AppError {
    AppError::NotFound("Order not found".to_string())
}

/// 결제 콜백의 서명을 판정합니다.
///
/// 서명은 항상 저장된 게이트웨이 주문 ID로 검증합니다. 저장된 ID가 없는 주문에 서명이
/// 오면 다른 주문의 결제를 재사용한 것일 수 있으므로 거부합니다.
pub fn check_payment_signature(
    stored_gateway_order_id: Option<&str>,
    sent_gateway_order_id: Option<&str>,
    payment_id: &str,
    signature: Option<&str>,
    required: bool,
    key_secret: &str,
) -> Result<(), AppError> {
    if let (Some(stored), Some(sent)) = (stored_gateway_order_id, sent_gateway_order_id) {
        if stored != sent {
            return Err(AppError::ValidationError("Payment does not match this order".to_string()));
        }
    }

    match (signature, stored_gateway_order_id) {
        (Some(signature), Some(stored)) => {
            if verify_payment_signature(stored, payment_id, signature, key_secret) {
                Ok(())
            } else {
                Err(AppError::ValidationError("Invalid payment signature".to_string()))
            }
        }
        (Some(_), None) => Err(AppError::ValidationError("Invalid payment signature".to_string())),
        (None, _) if required => Err(AppError::ValidationError("Payment signature required".to_string())),
        (None, _) => Ok(()),
    }
}

/// 요청 항목과 카탈로그 상품으로 주문 항목 스냅샷을 만듭니다.
pub fn build_order_item(item: &OrderItemRequest, product: Option<&Product>) -> Result<OrderItem, AppError> {
    let label = if item.name.trim().is_empty() { "item" } else { item.name.trim() };

    let product = product
        .ok_or_else(|| AppError::ValidationError(format!("Product not found: {}", label)))?;
    let product_id = product.id
        .ok_or_else(|| AppError::ValidationError(format!("Product not found: {}", label)))?;

    let qty = item.quantity().unwrap_or(1);
    if !(1..=MAX_LINE_QUANTITY).contains(&qty) {
        return Err(AppError::ValidationError(format!("Invalid quantity for {}", product.name)));
    }
    if !product.in_stock {
        return Err(AppError::ValidationError(format!("{} is out of stock", product.name)));
    }

    if let Some(sent) = item.price {
        if sent != product.price {
            log::debug!("클라이언트 가격 불일치: {} ({} != {})", product.name, sent, product.price);
        }
    }

    Ok(OrderItem {
        name: product.name.clone(),
        qty,
        price: product.price,
        image: product.image.clone(),
        product: product_id,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Charges {
    pub items_price: Decimal,
    pub tax_price: Decimal,
    pub shipping_price: Decimal,
    pub total_price: Decimal,
}

/// 세금/배송비 한도
pub const MAX_EXTRA_CHARGE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// 금액을 다시 계산합니다. 세금과 배송비는 클라이언트 값을 받되 음수나 한도 초과는 거부합니다.
pub fn compute_charges(items: &[OrderItem], request: &CreateOrderRequest) -> Result<Charges, AppError> {
    let tax_price = request.tax_price.unwrap_or(Decimal::ZERO);
    let shipping_price = request.shipping_price.unwrap_or(Decimal::ZERO);
    if tax_price.is_sign_negative() || shipping_price.is_sign_negative() {
        return Err(AppError::ValidationError("Prices cannot be negative".to_string()));
    }
    if tax_price > MAX_EXTRA_CHARGE || shipping_price > MAX_EXTRA_CHARGE {
        return Err(AppError::ValidationError(format!(
            "Tax and shipping cannot exceed {}",
            MAX_EXTRA_CHARGE
        )));
    }

    let invalid_total = || AppError::ValidationError("Invalid order total".to_string());
    let items_price = items_price(items).ok_or_else(invalid_total)?;
    let total = total_price(items_price, tax_price, shipping_price).ok_or_else(invalid_total)?;

    if let Some(sent) = request.total_price {
        if sent != total {
            log::warn!("클라이언트 합계 불일치: sent={} computed={}", sent, total);
        }
    }

    Ok(Charges {
        items_price,
        tax_price,
        shipping_price,
        total_price: total,
    })
}
