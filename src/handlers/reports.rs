use super::common::{resolve_period, success_response};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::reporting::{MonthlyMatrix, ProviderSummary},
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MatrixQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Restrict to one user's entries
    pub user_id: Option<String>,
    /// Keep only rows supplied by this provider
    pub provider_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub user_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/matrix",
    params(MatrixQuery),
    responses(
        (status = 200, description = "Item by day quantities with heat bands", body = MonthlyMatrix),
        (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn monthly_matrix(
    State(state): State<AppState>,
    Query(query): Query<MatrixQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = resolve_period(query.year, query.month)?;
    let matrix = state
        .read(|planner| {
            Ok(planner.build_monthly_matrix(
                period,
                query.user_id.as_deref(),
                query.provider_id.as_deref(),
            ))
        })
        .await?;
    Ok(success_response(matrix))
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/providers/{provider_id}/summary",
    params(("provider_id" = String, Path, description = "Provider id"), SummaryQuery),
    responses(
        (status = 200, description = "Monthly totals ready to e-mail", body = ProviderSummary),
        (status = 422, description = "Nothing planned for the provider", body = crate::errors::ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn provider_summary(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
    Query(query): Query<SummaryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = resolve_period(query.year, query.month)?;
    let summary = state
        .read(|planner| {
            planner.export_provider_summary(period, &provider_id, query.user_id.as_deref())
        })
        .await?;
    Ok(success_response(summary))
}
