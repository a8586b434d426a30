use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

use super::order_log::MealSlot;
use crate::errors::ServiceError;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum DispatchStatus {
    #[serde(rename = "PENDIENTE")]
    #[strum(serialize = "PENDIENTE")]
    Pending,

    #[serde(rename = "EN_PROCESO")]
    #[strum(serialize = "EN_PROCESO")]
    InProgress,

    #[serde(rename = "SURTIDA")]
    #[strum(serialize = "SURTIDA")]
    Fulfilled,
}

/// One `(item, quantity)` pair of a dispatch snapshot. The field names are
/// the print-view wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchLine {
    #[serde(rename = "id_articulo")]
    pub item_id: String,
    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl DispatchLine {
    /// Encodes a snapshot as the JSON detail string handed to the print view.
    pub fn encode_detail(lines: &[DispatchLine]) -> Result<String, ServiceError> {
        serde_json::to_string(lines).map_err(|e| ServiceError::SerializationError(e.to_string()))
    }

    pub fn decode_detail(detail: &str) -> Result<Vec<DispatchLine>, ServiceError> {
        serde_json::from_str(detail).map_err(|e| ServiceError::SerializationError(e.to_string()))
    }

    /// Like [`decode_detail`](Self::decode_detail) but a malformed detail yields no lines.
    pub fn decode_detail_lenient(detail: &str) -> Vec<DispatchLine> {
        Self::decode_detail(detail).unwrap_or_default()
    }
}

/// Warehouse request for one user, date and meal slot. The line list is a
/// snapshot taken at generation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchRequest {
    pub dispatch_id: String,
    pub generated_at: DateTime<Utc>,
    pub requested_by: String,
    pub service_name: String,
    pub dispatch_date: NaiveDate,
    pub meal: MealSlot,
    pub lines: Vec<DispatchLine>,
    pub status: DispatchStatus,
}

impl DispatchRequest {
    pub(crate) fn new(
        requested_by: &str,
        service_name: &str,
        dispatch_date: NaiveDate,
        meal: MealSlot,
        lines: Vec<DispatchLine>,
    ) -> Self {
        Self {
            dispatch_id: format!("SAL-{}", Uuid::new_v4().simple()),
            generated_at: Utc::now(),
            requested_by: requested_by.to_string(),
            service_name: service_name.to_string(),
            dispatch_date,
            meal,
            lines,
            status: DispatchStatus::Pending,
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// A snapshot line joined with catalog data for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedDispatchLine {
    pub item_id: String,
    pub code: String,
    pub description: String,
    pub unit: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchDetail {
    pub dispatch: DispatchRequest,
    pub lines: Vec<ResolvedDispatchLine>,
}
