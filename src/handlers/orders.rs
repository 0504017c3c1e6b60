use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::order::{LineItem, Order, OrderStatus};
use crate::domain::pagination::{Cursor, PageRequest};
use crate::errors::AppError;
use crate::AppService;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Cursor returned as `next` by the previous page. Omit to start.
    pub cursor: Option<String>,
    /// Maximum number of orders per page. Defaults to 50, maximum 100.
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListOrdersResponse {
    pub items: Vec<Order>,
    /// Absent once the listing is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Cursor>,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Creates an order with a freshly generated id and `created_at` set to now.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = Order),
        (status = 400, description = "Malformed request body"),
        (status = 503, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<AppService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();

    let order = web::block(move || service.create_order(body.customer_id, body.line_items))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(order))
}

/// GET /orders
///
/// Lists orders one page at a time. Follow `next` until it is absent.
#[utoipa::path(
    get,
    path = "/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "One page of orders", body = ListOrdersResponse),
        (status = 400, description = "Malformed cursor"),
        (status = 503, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    service: web::Data<AppService>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let cursor = params
        .cursor
        .as_deref()
        .unwrap_or_default()
        .parse::<Cursor>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let page = PageRequest::new(cursor, params.limit);

    let result = web::block(move || service.list_orders(page))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let next = result.has_more().then_some(result.cursor);
    Ok(HttpResponse::Ok().json(ListOrdersResponse {
        items: result.orders,
        next,
    }))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = u64, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = Order),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<AppService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order))
}

/// PUT /orders/{id}
///
/// Marks the order shipped or completed. Each status can be set once, and
/// an order must ship before it completes.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = u64, Path, description = "Order id"),
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Unknown status or transition not allowed"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: web::Data<AppService>,
    path: web::Path<u64>,
    body: web::Json<UpdateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let status = body.into_inner().status;

    let order = web::block(move || service.update_status(order_id, status))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(order))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = u64, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found"),
        (status = 503, description = "Order store unavailable"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<AppService>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    web::block(move || service.delete_order(order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().finish())
}
