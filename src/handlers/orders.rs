use crate::handlers::common::{created_response, map_service_error, success_response};
use crate::{
    entities::OrderStatus,
    errors::ApiError,
    services::orders::CheckoutInput,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    routing::{get, post},
    Router,
};
use uuid::Uuid;

/// Creates the router for order endpoints
pub fn orders_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/confirm", post(confirm_order))
        .route("/:id/ship", post(ship_order))
        .route("/:id/deliver", post(deliver_order))
        .route("/:id/cancel", post(cancel_order))
}

/// List orders
#[utoipa::path(
    get,
    path = "/api/orders",
    summary = "List orders",
    responses(
        (status = 200, description = "Orders retrieved successfully"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let orders = state
        .services
        .orders
        .list_orders()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// Get an order with its lines
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order retrieved successfully", body = crate::services::orders::OrderWithItems),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Place an order from a session's cart
#[utoipa::path(
    post,
    path = "/api/orders",
    summary = "Checkout",
    description = "Places an order from the session's cart: snapshots prices, decrements stock, and empties the cart in one transaction",
    request_body = CheckoutInput,
    responses(
        (status = 201, description = "Order created", body = crate::services::orders::OrderWithItems),
        (status = 400, description = "Malformed customer email", body = crate::errors::ErrorResponse),
        (status = 404, description = "A cart line references a missing product", body = crate::errors::ErrorResponse),
        (status = 409, description = "Cart empty or insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .checkout(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(order))
}

/// Confirm a pending order
#[utoipa::path(
    post,
    path = "/api/orders/{id}/confirm",
    summary = "Confirm order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order confirmed"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Illegal status transition", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn confirm_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    transition_order(state, id, OrderStatus::Confirmed).await
}

/// Mark a confirmed order as shipped
#[utoipa::path(
    post,
    path = "/api/orders/{id}/ship",
    summary = "Ship order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order shipped"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Illegal status transition", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn ship_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    transition_order(state, id, OrderStatus::Shipped).await
}

/// Mark a shipped order as delivered
#[utoipa::path(
    post,
    path = "/api/orders/{id}/deliver",
    summary = "Deliver order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order delivered"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Illegal status transition", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    transition_order(state, id, OrderStatus::Delivered).await
}

/// Cancel an order that has not been delivered
#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    summary = "Cancel order",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order cancelled"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order already delivered", body = crate::errors::ErrorResponse),
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    transition_order(state, id, OrderStatus::Cancelled).await
}

async fn transition_order(
    state: AppState,
    id: Uuid,
    status: OrderStatus,
) -> Result<axum::response::Response, ApiError> {
    let order = state
        .services
        .orders
        .update_status(id, status)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}
