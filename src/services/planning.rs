use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use utoipa::ToSchema;

use crate::models::{MealSlot, OrderLogEntry, UserProfile, YearMonth};

/// Raw planning sheet: item id → day of month → meal slot name → quantity.
/// Day keys and quantities are kept raw so that malformed cells can be
/// dropped rather than rejected.
pub type PlanGrid = BTreeMap<String, BTreeMap<String, BTreeMap<String, Value>>>;

/// Outcome of one plan submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlanSubmission {
    pub period: YearMonth,
    pub entries_created: usize,
    pub total_quantity: u64,
    pub order_ids: Vec<String>,
}

impl PlanSubmission {
    pub fn from_entries(period: YearMonth, entries: &[OrderLogEntry]) -> Self {
        Self {
            period,
            entries_created: entries.len(),
            total_quantity: entries.iter().map(|e| u64::from(e.quantity)).sum(),
            order_ids: entries.iter().map(|e| e.order_id.clone()).collect(),
        }
    }
}

/// Positive whole quantity of a grid cell, or 0 when the cell holds anything else.
pub fn normalize_quantity(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(whole) = n.as_u64() {
                u32::try_from(whole).unwrap_or(0)
            } else if let Some(float) = n.as_f64() {
                if float.fract() == 0.0 && float > 0.0 && float <= f64::from(u32::MAX) {
                    float as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|whole| u32::try_from(whole).ok())
            .unwrap_or(0),
        _ => 0,
    }
}

/// Day of month named by a grid key, when it exists in `period`.
fn plan_date(period: YearMonth, day_key: &str) -> Option<NaiveDate> {
    day_key
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|day| period.date(day))
}

/// Folds a grid into new order-log entries for `user` in `period`.
///
/// Cells that normalize to 0, unknown meal slots and days that do not exist
/// in `period` are dropped; everything else is recorded.
pub fn build_order_entries(
    grid: &PlanGrid,
    user: &UserProfile,
    period: YearMonth,
    submitted_at: DateTime<Utc>,
) -> Vec<OrderLogEntry> {
    let mut entries = Vec::new();

    for (item_id, days) in grid {
        for (day_key, meals) in days {
            let Some(date) = plan_date(period, day_key) else {
                debug!(day = %day_key, item_id = %item_id, period = %period, "Dropping day outside the month");
                continue;
            };
            for (meal_name, raw_quantity) in meals {
                let quantity = normalize_quantity(raw_quantity);
                if quantity == 0 {
                    continue;
                }
                let meal = match MealSlot::from_str(meal_name.trim()) {
                    Ok(meal) => meal,
                    Err(_) => {
                        debug!(meal = %meal_name, item_id = %item_id, "Dropping unknown meal slot");
                        continue;
                    }
                };

                entries.push(OrderLogEntry::new(
                    &user.user_id,
                    item_id,
                    date,
                    meal,
                    quantity,
                    submitted_at,
                ));
            }
        }
    }

    entries
}
