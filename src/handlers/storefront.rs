//! Cookie-keyed storefront surface.
//!
//! Mirrors the cart and checkout API for browser clients: the cart session
//! rides in an opaque `storefront_session` cookie instead of the URL. The
//! cookie is issued on the first cart interaction and dropped once checkout
//! converts the cart into an order.

use crate::handlers::cart::UpdateQuantityRequest;
use crate::handlers::common::{created_response, map_service_error, success_response};
use crate::{
    errors::{ApiError, ServiceError},
    services::{cart::AddToCartInput, orders::CheckoutInput},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::Response,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Creates the router for the storefront surface
pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/cart", get(view_cart).delete(clear_cart))
        .route("/cart/items", post(add_to_cart))
        .route(
            "/cart/items/:item_id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/cart/summary", get(cart_summary))
        .route("/checkout", post(checkout))
}

/// Current cart for the browser session. A first visit gets an empty cart
/// and a freshly minted session cookie.
async fn view_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, issued) = ensure_session(&state, &headers)?;

    let cart = state
        .services
        .cart
        .get_cart(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(attach_cookie(success_response(cart), issued))
}

async fn add_to_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<AddToCartInput>,
) -> Result<Response, ApiError> {
    let (session_id, issued) = ensure_session(&state, &headers)?;

    let line = state
        .services
        .cart
        .add_item(&session_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(attach_cookie(success_response(line), issued))
}

async fn update_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Result<Response, ApiError> {
    let session_id = require_session(&state, &headers)?;

    let cart = state
        .services
        .cart
        .update_item_quantity(&session_id, item_id, payload.quantity)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cart))
}

async fn remove_cart_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let session_id = require_session(&state, &headers)?;

    let cart = state
        .services
        .cart
        .remove_item(&session_id, item_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(cart))
}

async fn clear_cart(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let session_id = require_session(&state, &headers)?;

    state
        .services
        .cart
        .clear_cart(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(serde_json::json!({
        "message": "Cart cleared successfully"
    })))
}

async fn cart_summary(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (session_id, issued) = ensure_session(&state, &headers)?;

    let summary = state
        .services
        .cart
        .get_summary(&session_id)
        .await
        .map_err(map_service_error)?;

    Ok(attach_cookie(success_response(summary), issued))
}

/// Convert the session's cart into an order. The session cookie is expired
/// on success; the next cart interaction starts a fresh session.
async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<StorefrontCheckoutRequest>,
) -> Result<Response, ApiError> {
    let session_id = require_session(&state, &headers)?;

    let order = state
        .services
        .orders
        .checkout(CheckoutInput {
            session_id,
            customer_email: payload.customer_email,
        })
        .await
        .map_err(map_service_error)?;

    let expired = cookie_header(&expired_session_cookie(&state.config.session_cookie_name))?;
    Ok(attach_cookie(created_response(order), Some(expired)))
}

fn ensure_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(String, Option<HeaderValue>), ApiError> {
    let cookie_name = &state.config.session_cookie_name;

    if let Some(session_id) = session_from_cookies(headers, cookie_name) {
        return Ok((session_id, None));
    }

    let session_id = Uuid::new_v4().to_string();
    let cookie = cookie_header(&session_cookie(cookie_name, &session_id))?;
    Ok((session_id, Some(cookie)))
}

fn require_session(state: &AppState, headers: &HeaderMap) -> Result<String, ApiError> {
    session_from_cookies(headers, &state.config.session_cookie_name)
        .ok_or_else(|| ApiError::ServiceError(ServiceError::InvalidOperation(
            "Cart is empty".to_string(),
        )))
}

fn session_from_cookies(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

fn session_cookie(name: &str, session_id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", name, session_id)
}

fn expired_session_cookie(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", name)
}

fn cookie_header(cookie: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(cookie).map_err(|_| ApiError::InternalServerError)
}

fn attach_cookie(mut response: Response, cookie: Option<HeaderValue>) -> Response {
    if let Some(cookie) = cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}

// Request DTOs

#[derive(Debug, Deserialize, ToSchema)]
pub struct StorefrontCheckoutRequest {
    pub customer_email: String,
}
