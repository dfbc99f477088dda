use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreatedUserResponse},
        repo_types::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/adduser", post(add_user).fallback(method_not_allowed))
        .route("/allusers", get(all_users).fallback(method_not_allowed))
}

#[instrument(skip(state, payload))]
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    let user = User::try_from(CreateUserRequest::from_body(&body)?)?;

    state
        .users
        .create(&user)
        .await
        .map_err(|e| ApiError::from_store("Error adding user", e))?;

    info!(user_id = %user.id, email = %user.email, "user added");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User added successfully",
            user: body,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn all_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .users
        .list_all()
        .await
        .map_err(|e| ApiError::from_store("Error retrieving users", e))?;
    debug!(count = users.len(), "users listed");
    Ok(Json(users))
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
