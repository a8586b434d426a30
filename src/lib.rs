//! Hospital Supply API Library
//!
//! Meal-supply planning, warehouse dispatch and delivery-compliance tracking
//! over an in-memory order log seeded from a contracts catalog.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod auth;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod models;
pub mod openapi;
pub mod planner;
pub mod services;
pub mod tracing;

use axum::{
    response::Json,
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::auth::UserDirectory;
use crate::catalog::{CatalogLoader, ContractCatalog};
use crate::errors::ServiceError;
use crate::planner::Planner;

/// Availability of the order-processing core. Nothing runs before the
/// catalog has loaded, nor after a failed load until a reload succeeds.
#[derive(Debug)]
pub enum CatalogGate {
    Loading,
    Ready(Planner),
    Failed(String),
}

impl CatalogGate {
    pub fn planner(&self) -> Result<&Planner, ServiceError> {
        match self {
            CatalogGate::Ready(planner) => Ok(planner),
            CatalogGate::Loading => Err(ServiceError::CatalogNotReady),
            CatalogGate::Failed(message) => Err(ServiceError::CatalogLoadFailure(message.clone())),
        }
    }

    pub fn planner_mut(&mut self) -> Result<&mut Planner, ServiceError> {
        match self {
            CatalogGate::Ready(planner) => Ok(planner),
            CatalogGate::Loading => Err(ServiceError::CatalogNotReady),
            CatalogGate::Failed(message) => Err(ServiceError::CatalogLoadFailure(message.clone())),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, CatalogGate::Ready(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            CatalogGate::Loading => "loading",
            CatalogGate::Ready(_) => "ready",
            CatalogGate::Failed(_) => "failed",
        }
    }
}

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub loader: Arc<dyn CatalogLoader>,
    pub users: Arc<UserDirectory>,
    pub gate: Arc<RwLock<CatalogGate>>,
}

impl AppState {
    pub fn new(config: config::AppConfig, loader: Arc<dyn CatalogLoader>) -> Self {
        Self {
            config,
            loader,
            users: Arc::new(UserDirectory::default_users()),
            gate: Arc::new(RwLock::new(CatalogGate::Loading)),
        }
    }

    /// Loads the catalog and replaces the planner with a fresh one. Any order
    /// log, dispatches, statuses and reports from a previous load are dropped.
    pub async fn load_catalog(&self) -> Result<usize, ServiceError> {
        *self.gate.write().await = CatalogGate::Loading;
        ::tracing::info!(source = %self.loader.describe(), "Loading contract catalog");

        match self.loader.load_catalog().await {
            Ok(items) => {
                let catalog = ContractCatalog::new(items);
                let count = catalog.len();
                let planner = Planner::new(Arc::new(catalog), self.config.print.clone());
                *self.gate.write().await = CatalogGate::Ready(planner);
                ::tracing::info!(items = count, "Contract catalog ready");
                Ok(count)
            }
            Err(err) => {
                let message = match &err {
                    ServiceError::CatalogLoadFailure(message) => message.clone(),
                    other => other.to_string(),
                };
                ::tracing::error!(error = %message, "Contract catalog failed to load");
                *self.gate.write().await = CatalogGate::Failed(message.clone());
                Err(ServiceError::CatalogLoadFailure(message))
            }
        }
    }

    /// Runs a read-only operation against the loaded planner.
    pub async fn read<R>(
        &self,
        op: impl FnOnce(&Planner) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let gate = self.gate.read().await;
        op(gate.planner()?)
    }

    /// Runs a mutating operation against the loaded planner.
    pub async fn write<R>(
        &self,
        op: impl FnOnce(&mut Planner) -> Result<R, ServiceError>,
    ) -> Result<R, ServiceError> {
        let mut gate = self.gate.write().await;
        op(gate.planner_mut()?)
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    let catalog = Router::new()
        .route("/catalog", get(handlers::catalog::list_contracts))
        .route("/catalog/grouped", get(handlers::catalog::grouped_contracts))
        .route("/catalog/options", get(handlers::catalog::catalog_options))
        .route("/catalog/plannable", get(handlers::catalog::plannable_items))
        .route("/catalog/items/:id", get(handlers::catalog::get_contract))
        .route("/catalog/reload", post(handlers::catalog::reload_catalog));

    let users = Router::new()
        .route("/users", get(handlers::users::list_users))
        .route("/users/me", get(handlers::users::current_user));

    let planning = Router::new()
        .route("/planning/days", get(handlers::planning::planning_days))
        .route("/planning/submissions", post(handlers::planning::submit_plan))
        .route("/planning/entries", get(handlers::planning::list_my_entries));

    let dispatches = Router::new()
        .route(
            "/dispatches",
            get(handlers::dispatches::list_dispatches).post(handlers::dispatches::generate_dispatch),
        )
        .route("/dispatches/preview", get(handlers::dispatches::preview_dispatch))
        .route("/dispatches/:id", get(handlers::dispatches::get_dispatch))
        .route(
            "/dispatches/:id/status",
            put(handlers::dispatches::update_dispatch_status),
        )
        .route("/dispatches/:id/print", get(handlers::dispatches::print_dispatch));

    let deliveries = Router::new()
        .route("/deliveries", get(handlers::deliveries::list_consolidations))
        .route("/deliveries/calendar", get(handlers::deliveries::delivery_calendar))
        .route(
            "/deliveries/:date/status",
            put(handlers::deliveries::set_delivery_status),
        );

    let reports = Router::new()
        .route("/reports/matrix", get(handlers::reports::monthly_matrix))
        .route(
            "/reports/providers/:provider_id/summary",
            get(handlers::reports::provider_summary),
        );

    let penalties = Router::new()
        .route("/penalties", get(handlers::penalties::list_reports))
        .route(
            "/penalties/:id/status",
            put(handlers::penalties::update_report_status),
        );

    Router::new()
        .merge(catalog)
        .merge(users)
        .merge(planning)
        .merge(dispatches)
        .merge(deliveries)
        .merge(reports)
        .merge(penalties)
}
