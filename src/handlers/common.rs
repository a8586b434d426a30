use crate::errors::{ApiError, ServiceError};
use crate::models::YearMonth;
use crate::ApiResponse;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Standard created response
pub fn created_response<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, Json(ApiResponse::success(data)))
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ApiError> {
    input.validate().map_err(|e| ApiError::ValidationError {
        message: "Validation failed".to_string(),
        details: Some(e.to_string()),
    })
}

/// Month selector shared by the monthly views. Missing parts default to the
/// current local month.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PeriodQuery {
    #[validate(range(min = 2000, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 12))]
    pub month: Option<u32>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> Result<YearMonth, ApiError> {
        validate_input(self)?;
        resolve_period(self.year, self.month).map_err(ApiError::from)
    }
}

pub fn resolve_period(year: Option<i32>, month: Option<u32>) -> Result<YearMonth, ServiceError> {
    let current = YearMonth::current();
    YearMonth::new(year.unwrap_or(current.year), month.unwrap_or(current.month))
}
