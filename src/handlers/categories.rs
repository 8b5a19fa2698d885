use crate::handlers::common::{created_response, map_service_error, success_response};
use crate::{errors::ApiError, services::catalog::CreateCategoryInput, AppState};
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

/// Creates the router for category endpoints
pub fn categories_routes() -> Router<AppState> {
    Router::new().route("/", get(list_categories).post(create_category))
}

/// List all categories
#[utoipa::path(
    get,
    path = "/api/categories",
    summary = "List categories",
    responses(
        (status = 200, description = "Categories retrieved successfully"),
    ),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let categories = state
        .services
        .catalog
        .list_categories()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(categories))
}

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/categories",
    summary = "Create category",
    request_body = CreateCategoryInput,
    responses(
        (status = 201, description = "Category created successfully"),
        (status = 400, description = "Invalid category data", body = crate::errors::ErrorResponse),
    ),
    tag = "Catalog"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let category = state
        .services
        .catalog
        .create_category(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(category))
}
