use super::common::{created_response, success_response};
use crate::{
    auth::ActingUser,
    errors::ApiError,
    handlers::AppState,
    models::{DispatchDetail, DispatchRequest, DispatchStatus, MealSlot},
    services::printing::DispatchPrintSheet,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One user's date and meal slot.
#[derive(Debug, Clone, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct DispatchSlot {
    pub date: NaiveDate,
    pub meal: MealSlot,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DispatchPreview {
    pub date: NaiveDate,
    pub meal: MealSlot,
    pub has_planned_items: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDispatchStatusRequest {
    pub status: DispatchStatus,
}

#[utoipa::path(
    post,
    path = "/api/v1/dispatches",
    request_body = DispatchSlot,
    params(("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 201, description = "Dispatch request generated", body = DispatchRequest),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse),
        (status = 422, description = "Nothing planned for the slot", body = crate::errors::ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn generate_dispatch(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(slot): Json<DispatchSlot>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .write(|planner| planner.generate_dispatch(&user, slot.date, slot.meal))
        .await?;
    Ok(created_response(request))
}

#[utoipa::path(
    get,
    path = "/api/v1/dispatches/preview",
    params(DispatchSlot, ("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "Whether a dispatch can be generated", body = DispatchPreview),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn preview_dispatch(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Query(slot): Query<DispatchSlot>,
) -> Result<impl IntoResponse, ApiError> {
    let has_planned_items = state
        .read(|planner| Ok(planner.has_planned_items(&user.user_id, slot.date, slot.meal)))
        .await?;
    Ok(success_response(DispatchPreview {
        date: slot.date,
        meal: slot.meal,
        has_planned_items,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/dispatches",
    params(("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "The acting user's dispatch requests, newest first", body = [DispatchRequest]),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn list_dispatches(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .read(|planner| Ok(planner.list_dispatches_for_user(&user.user_id)))
        .await?;
    Ok(success_response(requests))
}

#[utoipa::path(
    get,
    path = "/api/v1/dispatches/{id}",
    params(("id" = String, Path, description = "Dispatch id")),
    responses(
        (status = 200, description = "Dispatch with resolved lines", body = DispatchDetail),
        (status = 404, description = "Unknown dispatch", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn get_dispatch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let detail = state.read(|planner| planner.dispatch_detail(&id)).await?;
    Ok(success_response(detail))
}

#[utoipa::path(
    put,
    path = "/api/v1/dispatches/{id}/status",
    params(("id" = String, Path, description = "Dispatch id")),
    request_body = UpdateDispatchStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = DispatchRequest),
        (status = 404, description = "Unknown dispatch", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn update_dispatch_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDispatchStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .write(|planner| planner.update_dispatch_status(&id, payload.status))
        .await?;
    Ok(success_response(request))
}

#[utoipa::path(
    get,
    path = "/api/v1/dispatches/{id}/print",
    params(("id" = String, Path, description = "Dispatch id")),
    responses(
        (status = 200, description = "Printable warehouse request sheets", body = [DispatchPrintSheet]),
        (status = 404, description = "Unknown dispatch", body = crate::errors::ErrorResponse)
    ),
    tag = "dispatches"
)]
pub async fn print_dispatch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let sheets = state.read(|planner| planner.print_dispatch(&id)).await?;
    Ok(success_response(sheets))
}
