use super::common::success_response;
use crate::{
    errors::ApiError,
    handlers::AppState,
    models::{NonComplianceReport, ReportStatus},
};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateReportStatusRequest {
    pub status: ReportStatus,
}

#[utoipa::path(
    get,
    path = "/api/v1/penalties",
    responses(
        (status = 200, description = "Non-compliance reports in creation order", body = [NonComplianceReport]),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "penalties"
)]
pub async fn list_reports(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = state
        .read(|planner| Ok(planner.list_reports().to_vec()))
        .await?;
    Ok(success_response(reports))
}

#[utoipa::path(
    put,
    path = "/api/v1/penalties/{id}/status",
    params(("id" = String, Path, description = "Report id")),
    request_body = UpdateReportStatusRequest,
    responses(
        (status = 200, description = "Status overwritten", body = NonComplianceReport),
        (status = 404, description = "Unknown report", body = crate::errors::ErrorResponse)
    ),
    tag = "penalties"
)]
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateReportStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .write(|planner| planner.update_report_status(&id, payload.status))
        .await?;
    Ok(success_response(report))
}
