//! Integration tests for the cookie-keyed storefront surface.
//!
//! Tests cover:
//! - Cookie issuance on the first cart interaction and its attributes
//! - Session reuse when the cookie comes back
//! - Mutations requiring an established session
//! - Checkout expiring the cookie and purging the cart

mod common;

use axum::{
    body,
    http::{header, Method},
    response::Response,
};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;

async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

fn decimal_field(value: &Value) -> Decimal {
    value
        .as_str()
        .expect("decimal fields serialize as strings")
        .parse()
        .expect("parseable decimal")
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Pulls the session value out of a `Set-Cookie` header.
fn session_value(cookie: &str) -> String {
    let pair = cookie.split(';').next().expect("cookie pair");
    let (name, value) = pair.split_once('=').expect("name=value");
    assert_eq!(name, "storefront_session");
    value.to_string()
}

fn cookie_pair(session: &str) -> String {
    format!("storefront_session={}", session)
}

// ==================== Cookie Issuance ====================

#[tokio::test]
async fn first_visit_gets_an_empty_cart_and_a_session_cookie() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/store/cart", None).await;
    assert_eq!(response.status(), 200);

    let cookie = set_cookie(&response).expect("first visit issues a cookie");
    assert!(cookie.contains("HttpOnly"), "cookie: {}", cookie);
    assert!(cookie.contains("SameSite=Lax"), "cookie: {}", cookie);
    assert!(cookie.contains("Path=/"), "cookie: {}", cookie);
    let session = session_value(&cookie);
    assert!(!session.is_empty());

    let cart = response_json(response).await;
    assert_eq!(cart["session_id"], session);
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn adding_without_a_cookie_starts_a_session() {
    let app = TestApp::new().await;
    let product = app.seed_product("Store Front Beans", dec!(14.00), 10).await;

    let response = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 2 })),
        )
        .await;
    assert_eq!(response.status(), 200);

    let cookie = set_cookie(&response).expect("add issues a cookie when none is sent");
    let session = session_value(&cookie);

    let line = response_json(response).await;
    assert_eq!(line["session_id"], session);
    assert_eq!(line["quantity"], 2);
}

#[tokio::test]
async fn returning_cookie_reuses_the_session_without_a_new_cookie() {
    let app = TestApp::new().await;
    let product = app.seed_product("Returning Mug", dec!(8.00), 10).await;

    let first = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 1 })),
        )
        .await;
    let session = session_value(&set_cookie(&first).expect("cookie issued"));

    let response = app
        .request_with_headers(
            Method::GET,
            "/store/cart",
            None,
            &[("cookie", &cookie_pair(&session))],
        )
        .await;
    assert_eq!(response.status(), 200);
    assert!(
        set_cookie(&response).is_none(),
        "an established session must not be reissued"
    );

    let cart = response_json(response).await;
    assert_eq!(cart["session_id"], session);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["product_name"], "Returning Mug");
}

// ==================== Cart Mutations ====================

#[tokio::test]
async fn cart_lines_update_and_remove_through_the_store_surface() {
    let app = TestApp::new().await;
    let product = app.seed_product("Adjustable Tamper", dec!(33.00), 10).await;

    let added = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 2 })),
        )
        .await;
    let session = session_value(&set_cookie(&added).expect("cookie issued"));
    let line = response_json(added).await;
    let item_id = line["id"].as_str().unwrap().to_string();
    let cookie = cookie_pair(&session);

    let updated = app
        .request_with_headers(
            Method::PUT,
            &format!("/store/cart/items/{}", item_id),
            Some(json!({ "quantity": 5 })),
            &[("cookie", &cookie)],
        )
        .await;
    assert_eq!(updated.status(), 200);
    let view = response_json(updated).await;
    assert_eq!(view["items"][0]["quantity"], 5);
    assert_eq!(decimal_field(&view["total_amount"]), dec!(165.00));

    let removed = app
        .request_with_headers(
            Method::DELETE,
            &format!("/store/cart/items/{}", item_id),
            None,
            &[("cookie", &cookie)],
        )
        .await;
    assert_eq!(removed.status(), 200);
    assert_eq!(
        response_json(removed).await["items"].as_array().unwrap().len(),
        0
    );
}

#[tokio::test]
async fn clearing_the_store_cart_reports_success() {
    let app = TestApp::new().await;
    let product = app.seed_product("Clearable Carafe", dec!(21.00), 10).await;

    let added = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 3 })),
        )
        .await;
    let session = session_value(&set_cookie(&added).expect("cookie issued"));
    let cookie = cookie_pair(&session);

    let cleared = app
        .request_with_headers(Method::DELETE, "/store/cart", None, &[("cookie", &cookie)])
        .await;
    assert_eq!(cleared.status(), 200);
    assert_eq!(
        response_json(cleared).await["message"],
        "Cart cleared successfully"
    );

    let cart = response_json(
        app.request_with_headers(Method::GET, "/store/cart", None, &[("cookie", &cookie)])
            .await,
    )
    .await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn summary_is_available_before_any_item_is_added() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/store/cart/summary", None).await;
    assert_eq!(response.status(), 200);
    assert!(set_cookie(&response).is_some());

    let summary = response_json(response).await;
    assert_eq!(summary["total_items"], 0);
    assert_eq!(decimal_field(&summary["total_amount"]), Decimal::ZERO);
}

// ==================== Session Requirements ====================

#[tokio::test]
async fn mutations_without_a_session_are_rejected() {
    let app = TestApp::new().await;

    let update = app
        .request(
            Method::PUT,
            &format!("/store/cart/items/{}", Uuid::new_v4()),
            Some(json!({ "quantity": 1 })),
        )
        .await;
    assert_eq!(update.status(), 409);

    let clear = app.request(Method::DELETE, "/store/cart", None).await;
    assert_eq!(clear.status(), 409);

    let checkout = app
        .request(
            Method::POST,
            "/store/checkout",
            Some(json!({ "customer_email": "ghost@example.com" })),
        )
        .await;
    assert_eq!(checkout.status(), 409);
    let body = response_json(checkout).await;
    assert!(
        body["message"].as_str().unwrap().contains("Cart is empty"),
        "unexpected message: {}",
        body["message"]
    );
}

// ==================== Checkout ====================

#[tokio::test]
async fn store_checkout_places_the_order_and_expires_the_cookie() {
    let app = TestApp::new().await;
    let product = app.seed_product("Checkout Beans", dec!(19.99), 10).await;

    let added = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 3 })),
        )
        .await;
    let session = session_value(&set_cookie(&added).expect("cookie issued"));
    let cookie = cookie_pair(&session);

    let response = app
        .request_with_headers(
            Method::POST,
            "/store/checkout",
            Some(json!({ "customer_email": "browser@example.com" })),
            &[("cookie", &cookie)],
        )
        .await;
    assert_eq!(response.status(), 201);

    let expired = set_cookie(&response).expect("checkout expires the session cookie");
    assert!(expired.starts_with("storefront_session=;"), "cookie: {}", expired);
    assert!(expired.contains("Max-Age=0"), "cookie: {}", expired);

    let order = response_json(response).await;
    assert_eq!(decimal_field(&order["order"]["total_amount"]), dec!(59.97));
    assert_eq!(order["order"]["status"], "Pending");

    // A client still holding the old cookie sees an empty cart
    let cart = response_json(
        app.request_with_headers(Method::GET, "/store/cart", None, &[("cookie", &cookie)])
            .await,
    )
    .await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn store_checkout_rejects_a_malformed_email() {
    let app = TestApp::new().await;
    let product = app.seed_product("Emailless Beans", dec!(9.99), 5).await;

    let added = app
        .request(
            Method::POST,
            "/store/cart/items",
            Some(json!({ "product_id": product.id, "quantity": 1 })),
        )
        .await;
    let session = session_value(&set_cookie(&added).expect("cookie issued"));

    let response = app
        .request_with_headers(
            Method::POST,
            "/store/checkout",
            Some(json!({ "customer_email": "not-an-email" })),
            &[("cookie", &cookie_pair(&session))],
        )
        .await;
    assert_eq!(response.status(), 400);
    // The failed checkout must not clear the session cookie
    assert!(set_cookie(&response).is_none());
}
