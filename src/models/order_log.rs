use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Daily service period against which quantities are planned and dispatched.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
pub enum MealSlot {
    #[serde(rename = "Desayuno")]
    #[strum(serialize = "Desayuno")]
    Breakfast,

    #[serde(rename = "Comida")]
    #[strum(serialize = "Comida")]
    Lunch,

    #[serde(rename = "Cena")]
    #[strum(serialize = "Cena")]
    Dinner,
}

/// One immutable fact of the order log: a positive quantity of one item,
/// scheduled for one day and meal slot, submitted by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrderLogEntry {
    pub order_id: String,
    pub submitted_at: DateTime<Utc>,
    pub user_id: String,
    pub item_id: String,
    pub scheduled_date: NaiveDate,
    pub meal: MealSlot,
    pub quantity: u32,
}

impl OrderLogEntry {
    pub(crate) fn new(
        user_id: &str,
        item_id: &str,
        scheduled_date: NaiveDate,
        meal: MealSlot,
        quantity: u32,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: format!("PED-{}", Uuid::new_v4().simple()),
            submitted_at,
            user_id: user_id.to_string(),
            item_id: item_id.to_string(),
            scheduled_date,
            meal,
            quantity,
        }
    }

    /// True when the entry belongs to `user_id` and is scheduled for `date` / `meal`.
    pub fn matches_slot(&self, user_id: &str, date: NaiveDate, meal: MealSlot) -> bool {
        self.user_id == user_id && self.scheduled_date == date && self.meal == meal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn meal_slot_parses_spanish_names() {
        assert_eq!(MealSlot::from_str("Desayuno").unwrap(), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_str("comida").unwrap(), MealSlot::Lunch);
        assert_eq!(MealSlot::from_str("CENA").unwrap(), MealSlot::Dinner);
        assert!(MealSlot::from_str("Merienda").is_err());
    }

    #[test]
    fn meal_slot_serializes_as_display_name() {
        let json = serde_json::to_string(&MealSlot::Breakfast).unwrap();
        assert_eq!(json, "\"Desayuno\"");
        assert_eq!(MealSlot::Dinner.to_string(), "Cena");
        assert_eq!(MealSlot::iter().count(), 3);
    }

    #[test]
    fn entry_ids_are_unique() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let now = Utc::now();
        let a = OrderLogEntry::new("USR01", "A", date, MealSlot::Breakfast, 1, now);
        let b = OrderLogEntry::new("USR01", "A", date, MealSlot::Breakfast, 1, now);
        assert_ne!(a.order_id, b.order_id);
        assert!(a.order_id.starts_with("PED-"));
        assert!(a.matches_slot("USR01", date, MealSlot::Breakfast));
        assert!(!a.matches_slot("USR02", date, MealSlot::Breakfast));
    }
}
