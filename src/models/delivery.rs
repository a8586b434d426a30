use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Receiving outcome recorded by the warehouse for one delivery date.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    ToSchema,
)]
pub enum DeliveryStatus {
    #[default]
    #[serde(rename = "PENDIENTE")]
    #[strum(serialize = "PENDIENTE")]
    Pending,

    #[serde(rename = "RECIBIDO")]
    #[strum(serialize = "RECIBIDO")]
    Received,

    #[serde(rename = "INCOMPLETO")]
    #[strum(serialize = "INCOMPLETO")]
    Incomplete,

    #[serde(rename = "RECHAZADO")]
    #[strum(serialize = "RECHAZADO")]
    Rejected,
}

impl DeliveryStatus {
    /// Statuses that open a non-compliance case and therefore need remarks.
    pub fn is_non_compliant(&self) -> bool {
        matches!(self, DeliveryStatus::Incomplete | DeliveryStatus::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConsolidatedItem {
    pub item_id: String,
    pub description: String,
    pub code: String,
    pub unit: String,
    pub scheduled_quantity: u64,
}

/// All planned items for one date across every user and meal slot, merged
/// with the recorded receiving status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryConsolidation {
    pub delivery_id: String,
    pub delivery_date: NaiveDate,
    pub items: Vec<ConsolidatedItem>,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl DeliveryConsolidation {
    pub fn delivery_id_for(date: NaiveDate) -> String {
        format!("del-{}", date.format("%Y-%m-%d"))
    }

    pub fn total_for(&self, item_id: &str) -> u64 {
        self.items
            .iter()
            .filter(|item| item.item_id == item_id)
            .map(|item| item.scheduled_quantity)
            .sum()
    }
}

/// Persisted part of a consolidation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryRecord {
    pub status: DeliveryStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
    pub item_count: usize,
}

/// Monday-first month grid of delivery days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryCalendar {
    pub year: i32,
    pub month: u32,
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_ids_use_iso_dates() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(DeliveryConsolidation::delivery_id_for(date), "del-2024-03-07");
    }

    #[test]
    fn only_rejected_and_incomplete_are_non_compliant() {
        assert!(DeliveryStatus::Rejected.is_non_compliant());
        assert!(DeliveryStatus::Incomplete.is_non_compliant());
        assert!(!DeliveryStatus::Received.is_non_compliant());
        assert!(!DeliveryStatus::Pending.is_non_compliant());
        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Pending);
    }
}
