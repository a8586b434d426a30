use super::common::success_response;
use crate::{auth::ActingUser, errors::ApiError, handlers::AppState, models::UserProfile};
use axum::{extract::State, response::IntoResponse};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Hospital service users", body = [UserProfile])
    ),
    tag = "users"
)]
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    success_response(state.users.all().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    params(("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "The acting user", body = UserProfile),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse)
    ),
    tag = "users"
)]
pub async fn current_user(ActingUser(user): ActingUser) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(user))
}
