use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::models::ContractItem;

/// Source of the contract catalog. Failures are reported as
/// [`ServiceError::CatalogLoadFailure`] and never retried here.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load_catalog(&self) -> Result<Vec<ContractItem>, ServiceError>;

    /// Where the catalog comes from, for logs.
    fn describe(&self) -> String;
}

/// One record of the contracts file, keyed the way the procurement export names its columns.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawContractRecord {
    #[serde(rename = "Código Producto", default)]
    pub code: Option<Value>,
    #[serde(rename = "Licitacion", default)]
    pub tender: Option<Value>,
    #[serde(rename = "Contrato", default)]
    pub contract: Option<Value>,
    #[serde(rename = "Proveedor", default)]
    pub provider: Option<Value>,
    #[serde(rename = "Descripción", default)]
    pub description: Option<Value>,
    #[serde(rename = "Unidad", default)]
    pub unit: Option<Value>,
    #[serde(rename = "Grupo", default)]
    pub group: Option<Value>,
    #[serde(rename = "Precio Unitario", default)]
    pub unit_price: Option<Value>,
    #[serde(rename = "Cantidad Maxima", default)]
    pub max_quantity: Option<Value>,
    #[serde(rename = "Cantidad Consumida", default)]
    pub consumed_quantity: Option<Value>,
    #[serde(rename = "Cantidad Disponible", default)]
    pub available_quantity: Option<Value>,
}

/// Non-empty text form of a scalar; empty strings, zero, null and composites count as missing.
fn text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn number(value: &Option<Value>) -> Option<Decimal> {
    let raw = match value.as_ref()? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

impl RawContractRecord {
    /// Maps a raw record, filling gaps with placeholders. `index` feeds the fallback id.
    pub fn into_contract_item(self, index: usize) -> ContractItem {
        let code = text(&self.code);
        let max_quantity = number(&self.max_quantity).unwrap_or_default();
        let consumed_quantity = number(&self.consumed_quantity).unwrap_or_default();
        let available_quantity =
            number(&self.available_quantity).unwrap_or(max_quantity - consumed_quantity);

        ContractItem {
            item_id: code.clone().unwrap_or_else(|| format!("art-id-{}", index)),
            tender_id: text(&self.tender).unwrap_or_else(|| "N/A".to_string()),
            contract_id: text(&self.contract).unwrap_or_else(|| "N/A".to_string()),
            provider_id: text(&self.provider).unwrap_or_else(|| "N/A".to_string()),
            code: code.unwrap_or_else(|| "N/A".to_string()),
            description: text(&self.description).unwrap_or_else(|| "Sin descripción".to_string()),
            unit: text(&self.unit).unwrap_or_else(|| "N/A".to_string()),
            group: text(&self.group).unwrap_or_else(|| "Sin grupo".to_string()),
            unit_price: number(&self.unit_price).unwrap_or_default(),
            max_quantity,
            consumed_quantity,
            available_quantity,
        }
    }
}

/// Parses a contracts document (a JSON array of raw records).
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<ContractItem>, ServiceError> {
    let records: Vec<RawContractRecord> = serde_json::from_slice(bytes).map_err(|e| {
        ServiceError::CatalogLoadFailure(format!("invalid contracts document: {}", e))
    })?;
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_contract_item(index))
        .collect())
}

pub struct FileCatalogLoader {
    path: PathBuf,
}

impl FileCatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogLoader for FileCatalogLoader {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_catalog(&self) -> Result<Vec<ContractItem>, ServiceError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ServiceError::CatalogLoadFailure(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let items = parse_catalog(&bytes)?;
        info!(items = items.len(), "Contract catalog read from file");
        Ok(items)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[derive(Debug)]
pub struct HttpCatalogLoader {
    client: reqwest::Client,
    url: url::Url,
}

impl HttpCatalogLoader {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let url = url::Url::parse(url)
            .map_err(|e| ServiceError::InvalidInput(format!("invalid catalog url {}: {}", url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl CatalogLoader for HttpCatalogLoader {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn load_catalog(&self) -> Result<Vec<ContractItem>, ServiceError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| ServiceError::CatalogLoadFailure(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::CatalogLoadFailure(format!(
                "failed to fetch contracts data: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::CatalogLoadFailure(format!("failed to read body: {}", e)))?;
        let items = parse_catalog(&bytes)?;
        info!(items = items.len(), "Contract catalog fetched");
        Ok(items)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
