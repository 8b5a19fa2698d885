use crate::handlers::common::{created_response, map_service_error, success_response};
use crate::{
    errors::ApiError,
    services::catalog::{CreateProductInput, ProductListQuery},
    AppState,
};
use axum::{
    extract::{Json, Path, Query, State},
    routing::get,
    Router,
};
use uuid::Uuid;

/// Creates the router for product endpoints
pub fn products_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/:id", get(get_product))
}

/// List products, optionally filtered by category or a search term
#[utoipa::path(
    get,
    path = "/api/products",
    summary = "List products",
    description = "List catalog products, optionally narrowed by category and a substring search over name and description",
    params(
        ("category_id" = Option<Uuid>, Query, description = "Only products in this category"),
        ("search" = Option<String>, Query, description = "Substring to match against name and description"),
    ),
    responses(
        (status = 200, description = "Products retrieved successfully"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Catalog"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let products = state
        .services
        .catalog
        .list_products(query)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(products))
}

/// Get a single product
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    summary = "Get product",
    params(("id" = Uuid, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product retrieved successfully"),
        (status = 404, description = "Product not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Catalog"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .catalog
        .get_product(id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(product))
}

/// Create a new product
#[utoipa::path(
    post,
    path = "/api/products",
    summary = "Create product",
    request_body = CreateProductInput,
    responses(
        (status = 201, description = "Product created successfully"),
        (status = 400, description = "Invalid product data", body = crate::errors::ErrorResponse),
    ),
    tag = "Catalog"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let product = state
        .services
        .catalog
        .create_product(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(product))
}
