use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::catalog::ContractCatalog;
use crate::errors::ServiceError;
use crate::models::{
    CalendarDay, ConsolidatedItem, DeliveryCalendar, DeliveryConsolidation, DeliveryRecord,
    DeliveryStatus, OrderLogEntry, YearMonth,
};

/// Receiving outcomes keyed by delivery date. The only mutable part of a consolidation.
pub type DeliveryRecords = HashMap<NaiveDate, DeliveryRecord>;

/// Groups the whole log (every user and meal) by scheduled date, summing
/// quantities per item in first-seen order. Items missing from the catalog
/// add no row but their date is still present.
pub fn items_by_date<'a>(
    entries: impl IntoIterator<Item = &'a OrderLogEntry>,
    catalog: &ContractCatalog,
) -> BTreeMap<NaiveDate, Vec<ConsolidatedItem>> {
    let mut days: BTreeMap<NaiveDate, Vec<ConsolidatedItem>> = BTreeMap::new();

    for entry in entries {
        let items = days.entry(entry.scheduled_date).or_default();
        if let Some(existing) = items.iter_mut().find(|item| item.item_id == entry.item_id) {
            existing.scheduled_quantity += u64::from(entry.quantity);
            continue;
        }
        if let Some(contract) = catalog.get(&entry.item_id) {
            items.push(ConsolidatedItem {
                item_id: entry.item_id.clone(),
                description: contract.description.clone(),
                code: contract.code.clone(),
                unit: contract.unit.clone(),
                scheduled_quantity: u64::from(entry.quantity),
            });
        }
    }

    days
}

fn merge(
    date: NaiveDate,
    items: Vec<ConsolidatedItem>,
    records: &DeliveryRecords,
) -> DeliveryConsolidation {
    let record = records.get(&date).cloned().unwrap_or_default();
    DeliveryConsolidation {
        delivery_id: DeliveryConsolidation::delivery_id_for(date),
        delivery_date: date,
        items,
        status: record.status,
        remarks: record.remarks,
    }
}

/// Consolidations in date order, optionally limited to one month.
pub fn consolidations(
    log: &[OrderLogEntry],
    catalog: &ContractCatalog,
    records: &DeliveryRecords,
    period: Option<YearMonth>,
) -> Vec<DeliveryConsolidation> {
    items_by_date(log, catalog)
        .into_iter()
        .filter(|(date, _)| period.map_or(true, |p| p.contains(*date)))
        .map(|(date, items)| merge(date, items, records))
        .collect()
}

pub fn consolidation_for(
    log: &[OrderLogEntry],
    catalog: &ContractCatalog,
    records: &DeliveryRecords,
    date: NaiveDate,
) -> Option<DeliveryConsolidation> {
    let items = items_by_date(
        log.iter().filter(|entry| entry.scheduled_date == date),
        catalog,
    )
    .remove(&date)?;
    Some(merge(date, items, records))
}

/// Checks a requested transition and returns the record to persist.
/// Non-compliant statuses need non-blank remarks; the others clear them.
pub fn next_record(
    status: DeliveryStatus,
    remarks: Option<&str>,
) -> Result<DeliveryRecord, ServiceError> {
    if status.is_non_compliant() {
        let remarks = remarks
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| ServiceError::RemarksRequired(status.to_string()))?;
        return Ok(DeliveryRecord {
            status,
            remarks: Some(remarks.to_string()),
        });
    }
    Ok(DeliveryRecord {
        status,
        remarks: None,
    })
}

/// Monday-first month grid with the status of each day that has a consolidation.
pub fn calendar(
    period: YearMonth,
    log: &[OrderLogEntry],
    catalog: &ContractCatalog,
    records: &DeliveryRecords,
) -> DeliveryCalendar {
    let by_date: HashMap<NaiveDate, DeliveryConsolidation> =
        consolidations(log, catalog, records, Some(period))
            .into_iter()
            .map(|c| (c.delivery_date, c))
            .collect();

    let days = period
        .planning_days()
        .into_iter()
        .map(|day| {
            let consolidation = by_date.get(&day.date);
            CalendarDay {
                day: day.day,
                date: day.date,
                status: consolidation.map(|c| c.status),
                item_count: consolidation.map_or(0, |c| c.items.len()),
            }
        })
        .collect();

    DeliveryCalendar {
        year: period.year,
        month: period.month,
        leading_blanks: period.leading_blanks(),
        days,
    }
}
