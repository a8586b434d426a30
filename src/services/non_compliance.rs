use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::catalog::ContractCatalog;
use crate::models::{
    DeliveryConsolidation, NonComplianceReason, NonComplianceReport, ReportStatus,
    UNKNOWN_PROVIDER,
};

/// Provider of the first consolidated item, or the unknown-provider sentinel.
pub fn resolve_provider(catalog: &ContractCatalog, consolidation: &DeliveryConsolidation) -> String {
    let resolved = consolidation
        .items
        .first()
        .and_then(|item| catalog.provider_of(&item.item_id));

    match resolved {
        Some(provider) => provider.to_string(),
        None => {
            warn!(
                delivery_id = %consolidation.delivery_id,
                "Provider could not be resolved for non-compliance report"
            );
            UNKNOWN_PROVIDER.to_string()
        }
    }
}

/// Opens a penalty case for a delivery. The report snapshots every item of the
/// consolidation, whichever provider supplies it.
pub fn escalate(
    catalog: &ContractCatalog,
    consolidation: &DeliveryConsolidation,
    reason: NonComplianceReason,
    remarks: &str,
) -> NonComplianceReport {
    NonComplianceReport {
        report_id: format!("INC-{}", Uuid::new_v4().simple()),
        delivery_id: consolidation.delivery_id.clone(),
        incident_date: consolidation.delivery_date,
        provider_id: resolve_provider(catalog, consolidation),
        reason,
        remarks: remarks.to_string(),
        items: consolidation.items.clone(),
        status: ReportStatus::PendingReview,
        created_at: Utc::now(),
    }
}
