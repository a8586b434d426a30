use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

use super::delivery::{ConsolidatedItem, DeliveryStatus};

/// Provider id used when the first affected item has no contract.
pub const UNKNOWN_PROVIDER: &str = "Proveedor Desconocido";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, ToSchema)]
pub enum NonComplianceReason {
    #[serde(rename = "RECHAZADO")]
    #[strum(serialize = "RECHAZADO")]
    Rejected,

    #[serde(rename = "INCOMPLETO")]
    #[strum(serialize = "INCOMPLETO")]
    Incomplete,
}

impl NonComplianceReason {
    pub fn from_status(status: DeliveryStatus) -> Option<Self> {
        match status {
            DeliveryStatus::Rejected => Some(Self::Rejected),
            DeliveryStatus::Incomplete => Some(Self::Incomplete),
            DeliveryStatus::Pending | DeliveryStatus::Received => None,
        }
    }
}

/// Penalty workflow state. Any state may follow any other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ReportStatus {
    #[serde(rename = "Pendiente de Revisión")]
    #[strum(serialize = "Pendiente de Revisión")]
    PendingReview,

    #[serde(rename = "Proveedor Notificado")]
    #[strum(serialize = "Proveedor Notificado")]
    ProviderNotified,

    #[serde(rename = "En Disputa")]
    #[strum(serialize = "En Disputa")]
    InDispute,

    #[serde(rename = "Penalización Aplicada")]
    #[strum(serialize = "Penalización Aplicada")]
    PenaltyApplied,

    #[serde(rename = "Resuelto")]
    #[strum(serialize = "Resuelto")]
    Resolved,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NonComplianceReport {
    pub report_id: String,
    pub delivery_id: String,
    pub incident_date: NaiveDate,
    pub provider_id: String,
    pub reason: NonComplianceReason,
    pub remarks: String,
    pub items: Vec<ConsolidatedItem>,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_only_come_from_non_compliant_statuses() {
        assert_eq!(
            NonComplianceReason::from_status(DeliveryStatus::Rejected),
            Some(NonComplianceReason::Rejected)
        );
        assert_eq!(
            NonComplianceReason::from_status(DeliveryStatus::Incomplete),
            Some(NonComplianceReason::Incomplete)
        );
        assert_eq!(NonComplianceReason::from_status(DeliveryStatus::Received), None);
    }

    #[test]
    fn report_status_round_trips_through_display_names() {
        let json = serde_json::to_string(&ReportStatus::PenaltyApplied).unwrap();
        assert_eq!(json, "\"Penalización Aplicada\"");
        let parsed: ReportStatus = serde_json::from_str("\"En Disputa\"").unwrap();
        assert_eq!(parsed, ReportStatus::InDispute);
    }
}
