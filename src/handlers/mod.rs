pub mod catalog;
pub mod common;
pub mod deliveries;
pub mod dispatches;
pub mod penalties;
pub mod planning;
pub mod reports;
pub mod users;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
