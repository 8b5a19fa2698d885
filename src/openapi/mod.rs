use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storefront API",
        version = "1.0.0",
        description = r#"
# Storefront API

A small e-commerce backend covering catalog browsing, session-scoped
shopping carts, checkout, order tracking, and user registration.

## Features

- **Catalog**: Browse products and categories, filter by category, search by name or description
- **Cart**: Anonymous session carts; adding the same product twice merges into one line
- **Checkout**: Converts a cart into an order, snapshotting names and prices and decrementing stock
- **Orders**: Linear fulfillment flow (pending, confirmed, shipped, delivered) with cancellation
- **Users**: Lightweight registration keyed by unique email

## Sessions

The `/api/cart` endpoints take an explicit session id in the path. The
`/store` surface manages the same carts through an HTTP-only session
cookie instead; it is not part of this document.

## Error Handling

Errors use a consistent JSON body with appropriate HTTP status codes:

```json
{
  "error": "Conflict",
  "message": "Insufficient stock for Espresso Cup: requested 6, available 5",
  "request_id": "req-abc123xyz",
  "timestamp": "2025-08-25T10:30:00Z"
}
```

Missing entities return 404, malformed input 400, and business-rule
violations (illegal status transitions, stock shortfalls, empty-cart
checkout) 409.
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Catalog", description = "Product and category endpoints"),
        (name = "Cart", description = "Session cart endpoints"),
        (name = "Orders", description = "Checkout and order lifecycle endpoints"),
        (name = "Users", description = "User registration endpoints")
    ),
    paths(
        // Catalog
        crate::handlers::products::list_products,
        crate::handlers::products::get_product,
        crate::handlers::products::create_product,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::create_category,

        // Cart
        crate::handlers::cart::get_cart,
        crate::handlers::cart::add_to_cart,
        crate::handlers::cart::update_cart_item,
        crate::handlers::cart::remove_cart_item,
        crate::handlers::cart::clear_cart,
        crate::handlers::cart::get_cart_summary,

        // Orders
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::confirm_order,
        crate::handlers::orders::ship_order,
        crate::handlers::orders::deliver_order,
        crate::handlers::orders::cancel_order,

        // Users
        crate::handlers::users::list_users,
        crate::handlers::users::register_user,

        // The cookie-keyed /store surface is intentionally undocumented here
    ),
    components(
        schemas(
            // Common types
            crate::ApiResponse<serde_json::Value>,

            // Entities
            crate::entities::product::Model,
            crate::entities::category::Model,
            crate::entities::cart_item::Model,
            crate::entities::order::Model,
            crate::entities::order::OrderStatus,
            crate::entities::order_item::Model,
            crate::entities::user::Model,

            // Catalog types
            crate::services::catalog::CreateProductInput,
            crate::services::catalog::CreateCategoryInput,

            // Cart types
            crate::services::cart::AddToCartInput,
            crate::services::cart::CartLineView,
            crate::services::cart::CartView,
            crate::services::cart::CartSummary,
            crate::handlers::cart::UpdateQuantityRequest,

            // Order types
            crate::services::orders::CheckoutInput,
            crate::services::orders::OrderWithItems,

            // User types
            crate::services::users::RegisterUserInput,

            // Storefront types
            crate::handlers::storefront::StorefrontCheckoutRequest,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
