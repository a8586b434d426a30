/*!
 * # Planner
 *
 * Application state for one loaded catalog: the append-only order log and
 * everything derived from it. Dispatch requests, delivery receiving records and
 * non-compliance reports are the only other mutable collections; consolidations
 * and the monthly matrix are recomputed from the log on every read.
 */

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::catalog::ContractCatalog;
use crate::config::PrintConfig;
use crate::errors::ServiceError;
use crate::models::{
    DeliveryCalendar, DeliveryConsolidation, DeliveryStatus, DispatchDetail, DispatchRequest,
    DispatchStatus, MealSlot, NonComplianceReason, NonComplianceReport, OrderLogEntry,
    ReportStatus, UserProfile, YearMonth,
};
use crate::services::delivery::{self, DeliveryRecords};
use crate::services::dispatch;
use crate::services::non_compliance;
use crate::services::planning::{self, PlanGrid, PlanSubmission};
use crate::services::printing::{self, DispatchPrintSheet};
use crate::services::reporting::{self, MonthlyMatrix, ProviderSummary};

/// Result of a delivery status change: the consolidation as it reads after the
/// change, plus the report opened for a non-compliant outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryStatusChange {
    pub consolidation: DeliveryConsolidation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<NonComplianceReport>,
}

#[derive(Debug, Clone)]
pub struct Planner {
    catalog: Arc<ContractCatalog>,
    print_layout: PrintConfig,
    order_log: Vec<OrderLogEntry>,
    /// Most recent first.
    dispatches: Vec<DispatchRequest>,
    delivery_records: DeliveryRecords,
    reports: Vec<NonComplianceReport>,
}

impl Planner {
    pub fn new(catalog: Arc<ContractCatalog>, print_layout: PrintConfig) -> Self {
        Self {
            catalog,
            print_layout,
            order_log: Vec::new(),
            dispatches: Vec::new(),
            delivery_records: DeliveryRecords::new(),
            reports: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &ContractCatalog {
        &self.catalog
    }

    pub fn order_log(&self) -> &[OrderLogEntry] {
        &self.order_log
    }

    /// Records every valid positive cell of `grid` for `user`; malformed cells
    /// are dropped, never rejected.
    #[instrument(skip(self, grid, user), fields(user_id = %user.user_id, period = %period))]
    pub fn submit_plan(
        &mut self,
        grid: &PlanGrid,
        user: &UserProfile,
        period: YearMonth,
    ) -> PlanSubmission {
        let entries = planning::build_order_entries(grid, user, period, chrono::Utc::now());
        let submission = PlanSubmission::from_entries(period, &entries);
        self.order_log.extend(entries);

        info!(
            entries = submission.entries_created,
            total_quantity = submission.total_quantity,
            "Plan submitted"
        );
        submission
    }

    pub fn has_planned_items(&self, user_id: &str, date: NaiveDate, meal: MealSlot) -> bool {
        dispatch::has_planned_items(&self.order_log, user_id, date, meal)
    }

    #[instrument(skip(self, user), fields(user_id = %user.user_id))]
    pub fn generate_dispatch(
        &mut self,
        user: &UserProfile,
        date: NaiveDate,
        meal: MealSlot,
    ) -> Result<DispatchRequest, ServiceError> {
        let request = dispatch::build_dispatch(&self.order_log, user, date, meal)?;
        info!(
            dispatch_id = %request.dispatch_id,
            lines = request.lines.len(),
            "Dispatch request generated"
        );
        self.dispatches.insert(0, request.clone());
        Ok(request)
    }

    pub fn dispatches(&self) -> &[DispatchRequest] {
        &self.dispatches
    }

    /// One user's dispatch requests, newest first.
    pub fn list_dispatches_for_user(&self, user_id: &str) -> Vec<DispatchRequest> {
        let mut mine: Vec<DispatchRequest> = self
            .dispatches
            .iter()
            .filter(|request| request.requested_by == user_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        mine
    }

    fn find_dispatch(&self, dispatch_id: &str) -> Result<&DispatchRequest, ServiceError> {
        self.dispatches
            .iter()
            .find(|request| request.dispatch_id == dispatch_id)
            .ok_or_else(|| ServiceError::NotFound(format!("dispatch {} not found", dispatch_id)))
    }

    pub fn dispatch_detail(&self, dispatch_id: &str) -> Result<DispatchDetail, ServiceError> {
        let request = self.find_dispatch(dispatch_id)?;
        Ok(DispatchDetail {
            lines: dispatch::resolve_lines(&self.catalog, &request.lines),
            dispatch: request.clone(),
        })
    }

    #[instrument(skip(self))]
    pub fn update_dispatch_status(
        &mut self,
        dispatch_id: &str,
        status: DispatchStatus,
    ) -> Result<DispatchRequest, ServiceError> {
        let request = self
            .dispatches
            .iter_mut()
            .find(|request| request.dispatch_id == dispatch_id)
            .ok_or_else(|| ServiceError::NotFound(format!("dispatch {} not found", dispatch_id)))?;
        request.status = status;
        info!(status = %status, "Dispatch status updated");
        Ok(request.clone())
    }

    pub fn print_dispatch(&self, dispatch_id: &str) -> Result<Vec<DispatchPrintSheet>, ServiceError> {
        let request = self.find_dispatch(dispatch_id)?;
        printing::print_dispatch(request, &self.catalog, &self.print_layout)
    }

    pub fn get_consolidation(&self, period: YearMonth) -> Vec<DeliveryConsolidation> {
        delivery::consolidations(
            &self.order_log,
            &self.catalog,
            &self.delivery_records,
            Some(period),
        )
    }

    pub fn delivery_calendar(&self, period: YearMonth) -> DeliveryCalendar {
        delivery::calendar(
            period,
            &self.order_log,
            &self.catalog,
            &self.delivery_records,
        )
    }

    /// Records a receiving outcome for `date`. Rejected and incomplete
    /// deliveries open a report against the consolidation as it stood before
    /// the change.
    #[instrument(skip(self, remarks))]
    pub fn set_delivery_status(
        &mut self,
        date: NaiveDate,
        status: DeliveryStatus,
        remarks: Option<&str>,
    ) -> Result<DeliveryStatusChange, ServiceError> {
        let record = delivery::next_record(status, remarks)?;
        let before = delivery::consolidation_for(
            &self.order_log,
            &self.catalog,
            &self.delivery_records,
            date,
        )
        .ok_or_else(|| ServiceError::NotFound(format!("no delivery scheduled on {}", date)))?;

        let report = match (NonComplianceReason::from_status(status), &record.remarks) {
            (Some(reason), Some(remarks)) => {
                let report = non_compliance::escalate(&self.catalog, &before, reason, remarks);
                warn!(
                    report_id = %report.report_id,
                    provider_id = %report.provider_id,
                    reason = %reason,
                    "Non-compliant delivery escalated"
                );
                self.reports.push(report.clone());
                Some(report)
            }
            _ => None,
        };

        self.delivery_records.insert(date, record.clone());
        info!(delivery_id = %before.delivery_id, status = %status, "Delivery status updated");

        Ok(DeliveryStatusChange {
            consolidation: DeliveryConsolidation {
                status: record.status,
                remarks: record.remarks,
                ..before
            },
            report,
        })
    }

    pub fn build_monthly_matrix(
        &self,
        period: YearMonth,
        user_id: Option<&str>,
        provider_id: Option<&str>,
    ) -> MonthlyMatrix {
        let matrix = reporting::build_monthly_matrix(&self.order_log, &self.catalog, period, user_id);
        match provider_id {
            Some(provider) => matrix.filtered_by_provider(provider),
            None => matrix,
        }
    }

    #[instrument(skip(self))]
    pub fn export_provider_summary(
        &self,
        period: YearMonth,
        provider_id: &str,
        user_id: Option<&str>,
    ) -> Result<ProviderSummary, ServiceError> {
        let matrix = self.build_monthly_matrix(period, user_id, None);
        let summary = reporting::export_provider_summary(&matrix, provider_id)?;
        info!(lines = summary.lines.len(), "Provider summary exported");
        Ok(summary)
    }

    pub fn list_reports(&self) -> &[NonComplianceReport] {
        &self.reports
    }

    #[instrument(skip(self))]
    pub fn update_report_status(
        &mut self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<NonComplianceReport, ServiceError> {
        let report = self
            .reports
            .iter_mut()
            .find(|report| report.report_id == report_id)
            .ok_or_else(|| ServiceError::NotFound(format!("report {} not found", report_id)))?;
        report.status = status;
        info!(status = %status, "Report status updated");
        Ok(report.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContractItem;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn contract(id: &str, provider: &str) -> ContractItem {
        ContractItem {
            item_id: id.into(),
            tender_id: "LP-01".into(),
            contract_id: "C-01".into(),
            provider_id: provider.into(),
            code: format!("COD-{}", id),
            description: format!("Artículo {}", id),
            unit: "Pieza".into(),
            group: "General".into(),
            unit_price: Decimal::ONE,
            max_quantity: Decimal::from(100),
            consumed_quantity: Decimal::ZERO,
            available_quantity: Decimal::from(100),
        }
    }

    fn planner() -> Planner {
        let catalog = ContractCatalog::new(vec![
            contract("A", "Lácteos del Norte"),
            contract("B", "Abarrotes Jalisco"),
        ]);
        Planner::new(Arc::new(catalog), PrintConfig::default())
    }

    fn user(id: &str) -> UserProfile {
        UserProfile::new(id, "Nutrición", "nutricion@hcg.gob.mx", "Pacientes Piso 1")
    }

    fn may() -> YearMonth {
        YearMonth::new(2024, 5).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn grid(value: serde_json::Value) -> PlanGrid {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn malformed_cells_do_not_block_valid_ones() {
        let mut planner = planner();
        let april = YearMonth::new(2024, 4).unwrap();
        let plan = grid(json!({
            "A": {"5": {"Desayuno": 3}, "31": {"Cena": 1}},
            "B": {"x": {"Cena": 2}, "6": {"Comida": "abc"}}
        }));

        let submission = planner.submit_plan(&plan, &user("USR01"), april);
        assert_eq!(submission.entries_created, 1);
        assert_eq!(planner.order_log().len(), 1);
        assert_eq!(
            planner.order_log()[0].scheduled_date,
            NaiveDate::from_ymd_opt(2024, 4, 5).unwrap()
        );
    }

    #[test]
    fn dispatches_are_listed_per_user_newest_first() {
        let mut planner = planner();
        let plan = grid(json!({"A": {"5": {"Desayuno": 2}}}));
        planner.submit_plan(&plan, &user("USR01"), may());
        planner.submit_plan(&plan, &user("USR02"), may());

        let first = planner
            .generate_dispatch(&user("USR01"), day(5), MealSlot::Breakfast)
            .unwrap();
        let second = planner
            .generate_dispatch(&user("USR01"), day(5), MealSlot::Breakfast)
            .unwrap();
        planner
            .generate_dispatch(&user("USR02"), day(5), MealSlot::Breakfast)
            .unwrap();

        let mine = planner.list_dispatches_for_user("USR01");
        assert_eq!(mine.len(), 2);
        assert!(mine[0].generated_at >= mine[1].generated_at);
        assert_eq!(mine[0].lines, first.lines);
        assert_eq!(second.lines, first.lines);
        assert_eq!(planner.dispatches().len(), 3);
    }

    #[test]
    fn dispatch_snapshot_survives_later_submissions() {
        let mut planner = planner();
        let plan = grid(json!({"A": {"5": {"Comida": 4}}}));
        planner.submit_plan(&plan, &user("USR01"), may());
        let request = planner
            .generate_dispatch(&user("USR01"), day(5), MealSlot::Lunch)
            .unwrap();

        planner.submit_plan(&plan, &user("USR01"), may());
        let detail = planner.dispatch_detail(&request.dispatch_id).unwrap();
        assert_eq!(detail.dispatch.lines.len(), 1);
        assert_eq!(detail.lines[0].code, "COD-A");

        let updated = planner
            .update_dispatch_status(&request.dispatch_id, DispatchStatus::Fulfilled)
            .unwrap();
        assert_eq!(updated.status, DispatchStatus::Fulfilled);
        assert_eq!(updated.lines, request.lines);
    }

    #[test]
    fn missing_remarks_keep_previous_status() {
        let mut planner = planner();
        let plan = grid(json!({"A": {"5": {"Desayuno": 10}}}));
        planner.submit_plan(&plan, &user("USR01"), may());

        assert_matches!(
            planner.set_delivery_status(day(5), DeliveryStatus::Incomplete, Some("   ")),
            Err(ServiceError::RemarksRequired(_))
        );
        let consolidation = planner.get_consolidation(may());
        assert_eq!(consolidation[0].status, DeliveryStatus::Pending);
        assert!(planner.list_reports().is_empty());
    }

    #[test]
    fn received_clears_remarks_without_report() {
        let mut planner = planner();
        let plan = grid(json!({"A": {"5": {"Desayuno": 10}}}));
        planner.submit_plan(&plan, &user("USR01"), may());

        planner
            .set_delivery_status(day(5), DeliveryStatus::Incomplete, Some("faltan 2"))
            .unwrap();
        let change = planner
            .set_delivery_status(day(5), DeliveryStatus::Received, Some("ignored"))
            .unwrap();

        assert_eq!(change.consolidation.status, DeliveryStatus::Received);
        assert_eq!(change.consolidation.remarks, None);
        assert!(change.report.is_none());
        assert_eq!(planner.list_reports().len(), 1);
    }

    #[test]
    fn unknown_targets_are_not_found() {
        let mut planner = planner();
        assert_matches!(
            planner.set_delivery_status(day(9), DeliveryStatus::Received, None),
            Err(ServiceError::NotFound(_))
        );
        assert_matches!(
            planner.update_report_status("INC-missing", ReportStatus::Resolved),
            Err(ServiceError::NotFound(_))
        );
        assert_matches!(
            planner.dispatch_detail("SAL-missing"),
            Err(ServiceError::NotFound(_))
        );
    }

    #[test]
    fn report_status_is_overwritten_without_ordering_rules() {
        let mut planner = planner();
        let plan = grid(json!({"B": {"7": {"Cena": 3}}}));
        planner.submit_plan(&plan, &user("USR03"), may());
        let report = planner
            .set_delivery_status(day(7), DeliveryStatus::Rejected, Some("caducado"))
            .unwrap()
            .report
            .unwrap();
        assert_eq!(report.provider_id, "Abarrotes Jalisco");

        planner
            .update_report_status(&report.report_id, ReportStatus::Resolved)
            .unwrap();
        let reopened = planner
            .update_report_status(&report.report_id, ReportStatus::InDispute)
            .unwrap();
        assert_eq!(reopened.status, ReportStatus::InDispute);
    }

    #[test]
    fn matrix_can_be_narrowed_by_user_and_provider() {
        let mut planner = planner();
        planner.submit_plan(
            &grid(json!({"A": {"3": {"Desayuno": 5}}, "B": {"3": {"Cena": 8}}})),
            &user("USR01"),
            may(),
        );
        planner.submit_plan(&grid(json!({"A": {"3": {"Comida": 2}}})), &user("USR02"), may());

        let all = planner.build_monthly_matrix(may(), None, None);
        assert_eq!(all.rows.len(), 2);
        assert_eq!(all.max_value, 8);

        let mine = planner.build_monthly_matrix(may(), Some("USR02"), None);
        assert_eq!(mine.rows.len(), 1);
        assert_eq!(mine.rows[0].total, 2);

        let dairy = planner.build_monthly_matrix(may(), None, Some("Lácteos del Norte"));
        assert_eq!(dairy.rows.len(), 1);
        assert_eq!(dairy.rows[0].total, 7);
        assert_eq!(dairy.max_value, 8);

        assert_matches!(
            planner.export_provider_summary(may(), "Otro Proveedor", None),
            Err(ServiceError::NothingToExport(_))
        );
    }
}
