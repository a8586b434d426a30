//! End-to-end flow over the planner: plan, dispatch, consolidate, escalate.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use hospital_supply_api::{
    auth::UserDirectory,
    catalog::ContractCatalog,
    config::PrintConfig,
    errors::ServiceError,
    models::{
        DeliveryStatus, DispatchStatus, MealSlot, NonComplianceReason, ReportStatus, YearMonth,
    },
    planner::Planner,
    services::planning::PlanGrid,
};
use serde_json::json;

fn planner() -> Planner {
    Planner::new(
        Arc::new(ContractCatalog::new(common::sample_items())),
        PrintConfig::default(),
    )
}

fn grid(value: serde_json::Value) -> PlanGrid {
    serde_json::from_value(value).expect("grid should deserialize")
}

fn may() -> YearMonth {
    YearMonth::new(2024, 5).unwrap()
}

fn may_day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
}

#[test]
fn submit_dispatch_consolidate_and_escalate() {
    let users = UserDirectory::default_users();
    let u1 = users.get("USR01").unwrap().clone();
    let mut planner = planner();

    let submission = planner.submit_plan(&grid(json!({"1001": {"5": {"Desayuno": 10}}})), &u1, may());
    assert_eq!(submission.entries_created, 1);
    let entry = &planner.order_log()[0];
    assert_eq!(entry.item_id, "1001");
    assert_eq!(entry.scheduled_date, may_day(5));
    assert_eq!(entry.meal, MealSlot::Breakfast);
    assert_eq!(entry.quantity, 10);
    assert_eq!(entry.user_id, "USR01");

    let dispatch = planner
        .generate_dispatch(&u1, may_day(5), MealSlot::Breakfast)
        .unwrap();
    assert_eq!(dispatch.status, DispatchStatus::Pending);
    assert_eq!(dispatch.service_name, u1.service_name);
    assert_eq!(dispatch.lines.len(), 1);
    assert_eq!(dispatch.lines[0].item_id, "1001");
    assert_eq!(dispatch.lines[0].quantity, 10);

    let consolidation = planner.get_consolidation(may());
    assert_eq!(consolidation.len(), 1);
    assert_eq!(consolidation[0].delivery_id, "del-2024-05-05");
    assert_eq!(consolidation[0].total_for("1001"), 10);

    let change = planner
        .set_delivery_status(may_day(5), DeliveryStatus::Rejected, Some("short 2 units"))
        .unwrap();
    assert_eq!(change.consolidation.status, DeliveryStatus::Rejected);

    let reports = planner.list_reports();
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.reason, NonComplianceReason::Rejected);
    assert_eq!(report.remarks, "short 2 units");
    assert_eq!(report.status, ReportStatus::PendingReview);
    assert_eq!(report.provider_id, "Lácteos del Norte");
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].item_id, "1001");
    assert_eq!(report.items[0].scheduled_quantity, 10);
}

#[test]
fn generating_without_plan_changes_nothing() {
    let users = UserDirectory::default_users();
    let u2 = users.get("USR02").unwrap().clone();
    let mut planner = planner();
    planner.submit_plan(&grid(json!({"2001": {"8": {"Comida": 4}}})), &u2, may());

    assert_matches!(
        planner.generate_dispatch(&u2, may_day(8), MealSlot::Dinner),
        Err(ServiceError::NoPlannedItems { .. })
    );
    assert!(!planner.has_planned_items("USR02", may_day(8), MealSlot::Dinner));
    assert!(planner.has_planned_items("USR02", may_day(8), MealSlot::Lunch));
    assert!(planner.dispatches().is_empty());
}

#[test]
fn consolidation_spans_users_and_meals() {
    let users = UserDirectory::default_users();
    let mut planner = planner();
    planner.submit_plan(
        &grid(json!({"2001": {"12": {"Desayuno": 3, "Cena": 2}}})),
        users.get("USR01").unwrap(),
        may(),
    );
    planner.submit_plan(
        &grid(json!({"2001": {"12": {"Comida": 5}}, "2002": {"12": {"Comida": 1}}})),
        users.get("USR04").unwrap(),
        may(),
    );

    let first = planner.get_consolidation(may());
    let second = planner.get_consolidation(may());
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].total_for("2001"), 10);
    assert_eq!(first[0].total_for("2002"), 1);

    let calendar = planner.delivery_calendar(may());
    assert_eq!(calendar.days.len(), 31);
    assert_eq!(calendar.days[11].status, Some(DeliveryStatus::Pending));
    assert_eq!(calendar.days[11].item_count, 2);
    assert_eq!(calendar.days[0].status, None);
}

#[test]
fn matrix_max_cell_has_full_intensity() {
    let users = UserDirectory::default_users();
    let mut planner = planner();
    planner.submit_plan(
        &grid(json!({
            "1001": {"2": {"Desayuno": 4}, "3": {"Desayuno": 6, "Cena": 10}},
            "2001": {"3": {"Comida": 7}}
        })),
        users.get("USR01").unwrap(),
        may(),
    );

    let matrix = planner.build_monthly_matrix(may(), Some("USR01"), None);
    assert_eq!(matrix.max_value, 16);
    let max_cells: Vec<_> = matrix
        .rows
        .iter()
        .flat_map(|row| row.cells.iter())
        .filter(|cell| cell.quantity == matrix.max_value)
        .collect();
    assert_eq!(max_cells.len(), 1);
    assert_eq!(max_cells[0].intensity, 1.0);

    let summary = planner
        .export_provider_summary(may(), "Abarrotes Jalisco", None)
        .unwrap();
    assert_eq!(summary.lines.len(), 1);
    assert_eq!(summary.lines[0].total, 7);
    assert!(summary.mailto.starts_with("mailto:?subject=Programaci"));
}
