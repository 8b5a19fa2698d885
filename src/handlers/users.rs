use crate::handlers::common::{created_response, map_service_error, success_response};
use crate::{errors::ApiError, services::users::RegisterUserInput, AppState};
use axum::{
    extract::{Json, State},
    routing::get,
    Router,
};

/// Creates the router for user endpoints
pub fn users_routes() -> Router<AppState> {
    Router::new().route("/", get(list_users).post(register_user))
}

/// List registered users
#[utoipa::path(
    get,
    path = "/api/users",
    summary = "List users",
    responses(
        (status = 200, description = "Users retrieved successfully"),
    ),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let users = state
        .services
        .users
        .list_users()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(users))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/users",
    summary = "Register user",
    request_body = RegisterUserInput,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Invalid name, malformed email, or email already registered", body = crate::errors::ErrorResponse),
    ),
    tag = "Users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserInput>,
) -> Result<impl axum::response::IntoResponse, ApiError> {
    let user = state
        .services
        .users
        .register(payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(user))
}
