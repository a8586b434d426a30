// Ordering
pub mod dispatch;
pub mod planning;
pub mod printing;

// Deliveries and provider compliance
pub mod delivery;
pub mod non_compliance;

// Monthly consumption reporting
pub mod reporting;
