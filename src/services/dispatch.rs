use chrono::NaiveDate;

use crate::catalog::ContractCatalog;
use crate::errors::ServiceError;
use crate::models::{
    DispatchLine, DispatchRequest, MealSlot, OrderLogEntry, ResolvedDispatchLine, UserProfile,
};

/// Log entries of `user_id` scheduled for `date` and `meal`, in log order.
pub fn matching_entries<'a>(
    log: &'a [OrderLogEntry],
    user_id: &'a str,
    date: NaiveDate,
    meal: MealSlot,
) -> impl Iterator<Item = &'a OrderLogEntry> + 'a {
    log.iter()
        .filter(move |entry| entry.matches_slot(user_id, date, meal))
}

pub fn has_planned_items(
    log: &[OrderLogEntry],
    user_id: &str,
    date: NaiveDate,
    meal: MealSlot,
) -> bool {
    matching_entries(log, user_id, date, meal).next().is_some()
}

/// Snapshots the matching entries into a pending dispatch. Every entry becomes
/// its own line; repeated submissions are not merged.
pub fn build_dispatch(
    log: &[OrderLogEntry],
    user: &UserProfile,
    date: NaiveDate,
    meal: MealSlot,
) -> Result<DispatchRequest, ServiceError> {
    let lines: Vec<DispatchLine> = matching_entries(log, &user.user_id, date, meal)
        .map(|entry| DispatchLine {
            item_id: entry.item_id.clone(),
            quantity: entry.quantity,
        })
        .collect();

    if lines.is_empty() {
        return Err(ServiceError::NoPlannedItems {
            user_id: user.user_id.clone(),
            date: date.to_string(),
            meal: meal.to_string(),
        });
    }

    Ok(DispatchRequest::new(
        &user.user_id,
        &user.service_name,
        date,
        meal,
        lines,
    ))
}

/// Joins snapshot lines with catalog data for display.
pub fn resolve_lines(catalog: &ContractCatalog, lines: &[DispatchLine]) -> Vec<ResolvedDispatchLine> {
    lines
        .iter()
        .map(|line| match catalog.get(&line.item_id) {
            Some(item) => ResolvedDispatchLine {
                item_id: line.item_id.clone(),
                code: item.code.clone(),
                description: item.description.clone(),
                unit: item.unit.clone(),
                quantity: line.quantity,
            },
            None => ResolvedDispatchLine {
                item_id: line.item_id.clone(),
                code: "N/A".to_string(),
                description: "Desconocido".to_string(),
                unit: "N/A".to_string(),
                quantity: line.quantity,
            },
        })
        .collect()
}
