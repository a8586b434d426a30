use super::common::{success_response, validate_input, PeriodQuery};
use crate::{
    errors::ApiError,
    handlers::AppState,
    models::{DeliveryCalendar, DeliveryConsolidation, DeliveryStatus},
    planner::DeliveryStatusChange,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetDeliveryStatusRequest {
    pub status: DeliveryStatus,
    /// Required for RECHAZADO and INCOMPLETO
    #[validate(length(max = 2000))]
    pub remarks: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/deliveries",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Per-day consolidations of the month", body = [DeliveryConsolidation]),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn list_consolidations(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()?;
    let consolidations = state
        .read(|planner| Ok(planner.get_consolidation(period)))
        .await?;
    Ok(success_response(consolidations))
}

#[utoipa::path(
    get,
    path = "/api/v1/deliveries/calendar",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Monday-first calendar of delivery statuses", body = DeliveryCalendar),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn delivery_calendar(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()?;
    let calendar = state
        .read(|planner| Ok(planner.delivery_calendar(period)))
        .await?;
    Ok(success_response(calendar))
}

#[utoipa::path(
    put,
    path = "/api/v1/deliveries/{date}/status",
    params(("date" = NaiveDate, Path, description = "Delivery date (YYYY-MM-DD)")),
    request_body = SetDeliveryStatusRequest,
    responses(
        (status = 200, description = "Status recorded; non-compliant outcomes include the opened report", body = DeliveryStatusChange),
        (status = 400, description = "Remarks missing", body = crate::errors::ErrorResponse),
        (status = 404, description = "No delivery scheduled on that date", body = crate::errors::ErrorResponse)
    ),
    tag = "deliveries"
)]
pub async fn set_delivery_status(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(payload): Json<SetDeliveryStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let change = state
        .write(|planner| planner.set_delivery_status(date, payload.status, payload.remarks.as_deref()))
        .await?;
    Ok(success_response(change))
}
