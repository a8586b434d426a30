//! Domain records shared by the catalog, the planner and the HTTP layer.

pub mod contract;
pub mod delivery;
pub mod dispatch;
pub mod non_compliance;
pub mod order_log;
pub mod period;
pub mod user;

pub use contract::{ConsumptionLevel, ContractItem, ContractOverview};
pub use delivery::{
    CalendarDay, ConsolidatedItem, DeliveryCalendar, DeliveryConsolidation, DeliveryRecord,
    DeliveryStatus,
};
pub use dispatch::{
    DispatchDetail, DispatchLine, DispatchRequest, DispatchStatus, ResolvedDispatchLine,
};
pub use non_compliance::{NonComplianceReason, NonComplianceReport, ReportStatus, UNKNOWN_PROVIDER};
pub use order_log::{MealSlot, OrderLogEntry};
pub use period::{PlanningDay, YearMonth};
pub use user::UserProfile;
