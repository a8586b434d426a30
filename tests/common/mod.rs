#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    middleware, Router,
};
use hospital_supply_api::{
    catalog::CatalogLoader, config::AppConfig, errors::ServiceError, models::ContractItem,
    AppState,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

/// Loader serving a fixed item list, or a fixed failure.
pub struct StaticCatalogLoader {
    result: Result<Vec<ContractItem>, ServiceError>,
}

impl StaticCatalogLoader {
    pub fn items(items: Vec<ContractItem>) -> Self {
        Self { result: Ok(items) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(ServiceError::CatalogLoadFailure(message.to_string())),
        }
    }
}

#[async_trait]
impl CatalogLoader for StaticCatalogLoader {
    async fn load_catalog(&self) -> Result<Vec<ContractItem>, ServiceError> {
        self.result.clone()
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}

pub fn contract(id: &str, description: &str, provider: &str, available: i64) -> ContractItem {
    ContractItem {
        item_id: id.to_string(),
        tender_id: "LP-SA-014-2024".to_string(),
        contract_id: format!("CT-{}", id),
        provider_id: provider.to_string(),
        code: id.to_string(),
        description: description.to_string(),
        unit: "Kilogramo".to_string(),
        group: "Abarrotes".to_string(),
        unit_price: Decimal::new(2450, 2),
        max_quantity: Decimal::from(1000),
        consumed_quantity: Decimal::from(1000 - available),
        available_quantity: Decimal::from(available),
    }
}

pub fn sample_items() -> Vec<ContractItem> {
    vec![
        contract("1001", "Leche entera", "Lácteos del Norte", 300),
        contract("1002", "Yogurt natural", "Lácteos del Norte", 0),
        contract("2001", "Arroz blanco", "Abarrotes Jalisco", 800),
        contract("2002", "Frijol bayo", "Abarrotes Jalisco", 120),
    ]
}

/// Router plus shared state, driven with `oneshot`.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// App whose catalog has loaded the sample items.
    pub async fn new() -> Self {
        let app = Self::with_loader(StaticCatalogLoader::items(sample_items()));
        app.state
            .load_catalog()
            .await
            .expect("sample catalog should load");
        app
    }

    /// App whose catalog has not been loaded yet.
    pub fn with_loader(loader: StaticCatalogLoader) -> Self {
        let state = AppState::new(AppConfig::default(), Arc::new(loader));
        let router = Router::new()
            .nest("/health", hospital_supply_api::health::health_routes())
            .nest("/api/v1", hospital_supply_api::api_v1_routes())
            .layer(middleware::from_fn(
                hospital_supply_api::middleware_helpers::request_id_middleware,
            ))
            .with_state(state.clone());
        Self { router, state }
    }

    /// Send a request, acting as `user` when given.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(user_id) = user {
            builder = builder.header("x-user-id", user_id);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Same as [`TestApp::request`], returning the status and parsed JSON body.
    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        user: Option<&str>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body, user).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body should be JSON")
        };
        (status, value)
    }
}
