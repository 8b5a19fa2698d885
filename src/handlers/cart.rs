use crate::handlers::common::{map_service_error, no_content_response, success_response};
use crate::{errors::ApiError, services::cart::AddToCartInput, AppState};
use axum::{
    extract::{Json, Path, State},
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates the router for session cart endpoints
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:session_id",
            get(get_cart).post(add_to_cart).delete(clear_cart),
        )
        .route(
            "/:session_id/items/:item_id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/:session_id/summary", get(get_cart_summary))
}

/// Get the cart for a session
#[utoipa::path(
    get,
    path = "/api/cart/{session_id}",
    summary = "Get cart",
    description = "Current cart lines for a session with product names, prices, and totals",
    params(("session_id" = String, Path, description = "Opaque cart session id")),
    responses(
        (status = 200, description = "Cart retrieved successfully", body = crate::services::cart::CartView),
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let cart = state
        .services
        .cart
        .get_cart(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cart))
}

/// Add a product to the cart
#[utoipa::path(
    post,
    path = "/api/cart/{session_id}",
    summary = "Add to cart",
    description = "Adds a product to the session's cart, merging quantities when the product is already present",
    params(("session_id" = String, Path, description = "Opaque cart session id")),
    request_body = AddToCartInput,
    responses(
        (status = 200, description = "Cart line created or merged"),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(payload): Json<AddToCartInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let line = state
        .services
        .cart
        .add_item(&session_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(line))
}

/// Update a cart line's quantity
#[utoipa::path(
    put,
    path = "/api/cart/{session_id}/items/{item_id}",
    summary = "Update cart line",
    description = "Sets a cart line's quantity; zero or less removes the line",
    params(
        ("session_id" = String, Path, description = "Opaque cart session id"),
        ("item_id" = Uuid, Path, description = "Cart line id"),
    ),
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Cart updated", body = crate::services::cart::CartView),
        (status = 404, description = "Cart line not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Insufficient stock", body = crate::errors::ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path((session_id, item_id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let cart = state
        .services
        .cart
        .update_item_quantity(&session_id, item_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cart))
}

/// Remove a cart line
#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}/items/{item_id}",
    summary = "Remove cart line",
    params(
        ("session_id" = String, Path, description = "Opaque cart session id"),
        ("item_id" = Uuid, Path, description = "Cart line id"),
    ),
    responses(
        (status = 200, description = "Cart after removal", body = crate::services::cart::CartView),
        (status = 404, description = "Cart line not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Cart"
)]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((session_id, item_id)): Path<(String, Uuid)>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let cart = state
        .services
        .cart
        .remove_item(&session_id, item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cart))
}

/// Clear the cart for a session
#[utoipa::path(
    delete,
    path = "/api/cart/{session_id}",
    summary = "Clear cart",
    params(("session_id" = String, Path, description = "Opaque cart session id")),
    responses(
        (status = 204, description = "Cart cleared"),
    ),
    tag = "Cart"
)]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    state
        .services
        .cart
        .clear_cart(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(no_content_response())
}

/// Item count and total for a session's cart
#[utoipa::path(
    get,
    path = "/api/cart/{session_id}/summary",
    summary = "Cart summary",
    params(("session_id" = String, Path, description = "Opaque cart session id")),
    responses(
        (status = 200, description = "Cart summary", body = crate::services::cart::CartSummary),
    ),
    tag = "Cart"
)]
pub async fn get_cart_summary(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let summary = state
        .services
        .cart
        .get_summary(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(summary))
}

// Request DTOs

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}
