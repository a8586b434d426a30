use super::common::{created_response, success_response, validate_input, PeriodQuery};
use crate::{
    auth::ActingUser,
    errors::ApiError,
    handlers::AppState,
    models::{MealSlot, OrderLogEntry, PlanningDay, YearMonth},
    services::planning::{PlanGrid, PlanSubmission},
};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use utoipa::ToSchema;
use validator::Validate;

/// Planning sheet layout for one month.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanningSheet {
    pub period: YearMonth,
    pub days: Vec<PlanningDay>,
    pub meals: Vec<MealSlot>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitPlanRequest {
    #[validate(range(min = 2000, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    /// item id -> day of month -> meal slot -> quantity
    #[schema(value_type = Object)]
    pub grid: PlanGrid,
}

#[utoipa::path(
    get,
    path = "/api/v1/planning/days",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Days and meal slots of the month", body = PlanningSheet),
        (status = 400, description = "Invalid month", body = crate::errors::ErrorResponse)
    ),
    tag = "planning"
)]
pub async fn planning_days(Query(query): Query<PeriodQuery>) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()?;
    Ok(success_response(PlanningSheet {
        period,
        days: period.planning_days(),
        meals: MealSlot::iter().collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/planning/submissions",
    request_body = SubmitPlanRequest,
    params(("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 201, description = "Order log entries appended", body = PlanSubmission),
        (status = 400, description = "Invalid period", body = crate::errors::ErrorResponse),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse),
        (status = 503, description = "Catalog not loaded", body = crate::errors::ErrorResponse)
    ),
    tag = "planning"
)]
pub async fn submit_plan(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Json(payload): Json<SubmitPlanRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let period = YearMonth::new(payload.year, payload.month)?;
    let submission = state
        .write(|planner| Ok(planner.submit_plan(&payload.grid, &user, period)))
        .await?;
    Ok(created_response(submission))
}

/// The acting user's order log entries scheduled in a month.
#[utoipa::path(
    get,
    path = "/api/v1/planning/entries",
    params(PeriodQuery, ("x-user-id" = String, Header, description = "Acting user id")),
    responses(
        (status = 200, description = "Order log entries", body = [OrderLogEntry]),
        (status = 401, description = "Missing or unknown user", body = crate::errors::ErrorResponse)
    ),
    tag = "planning"
)]
pub async fn list_my_entries(
    State(state): State<AppState>,
    ActingUser(user): ActingUser,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()?;
    let entries = state
        .read(|planner| {
            Ok(planner
                .order_log()
                .iter()
                .filter(|entry| entry.user_id == user.user_id && period.contains(entry.scheduled_date))
                .cloned()
                .collect::<Vec<OrderLogEntry>>())
        })
        .await?;
    Ok(success_response(entries))
}
