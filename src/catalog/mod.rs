//! Immutable contract catalog and the loaders that build it.

pub mod loader;

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::CatalogConfig;
use crate::errors::ServiceError;
use crate::models::{ContractItem, ContractOverview};

pub use loader::{CatalogLoader, FileCatalogLoader, HttpCatalogLoader, RawContractRecord};

/// Picks the loader named by `catalog.source`.
pub fn loader_from_config(config: &CatalogConfig) -> Result<Arc<dyn CatalogLoader>, ServiceError> {
    if config.is_http() {
        let url = config.url.as_deref().ok_or_else(|| {
            ServiceError::InvalidInput("catalog.url is required for the http source".into())
        })?;
        Ok(Arc::new(HttpCatalogLoader::new(url, config.timeout())?))
    } else {
        Ok(Arc::new(FileCatalogLoader::new(config.path.clone())))
    }
}

/// Group key for items without a provider.
pub const NO_PROVIDER_GROUP: &str = "Sin Proveedor";

/// Contract items indexed by item id. Built once per load and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ContractCatalog {
    items: Vec<ContractItem>,
    index: HashMap<String, usize>,
}

/// Query narrowing the contracts panel.
#[derive(Debug, Clone, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CatalogFilter {
    /// Case-insensitive match on description or code
    pub search: Option<String>,
    pub tender_id: Option<String>,
    pub provider_id: Option<String>,
    pub contract_id: Option<String>,
}

impl CatalogFilter {
    fn accepts(&self, item: &ContractItem) -> bool {
        fn exact(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |wanted| wanted == value)
        }

        self.search
            .as_deref()
            .map_or(true, |term| item.matches_search(term))
            && exact(&self.tender_id, &item.tender_id)
            && exact(&self.provider_id, &item.provider_id)
            && exact(&self.contract_id, &item.contract_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderGroup {
    pub provider_id: String,
    pub items: Vec<ContractOverview>,
}

/// Sorted, de-duplicated values for the panel's filter selectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CatalogOptions {
    pub tenders: Vec<String>,
    pub providers: Vec<String>,
    pub contracts: Vec<String>,
}

impl ContractCatalog {
    /// Builds the catalog. When an item id repeats, lookups resolve to its first occurrence.
    pub fn new(items: Vec<ContractItem>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            index.entry(item.item_id.clone()).or_insert(position);
        }
        Self { items, index }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: &str) -> Option<&ContractItem> {
        self.index.get(item_id).map(|&position| &self.items[position])
    }

    pub fn items(&self) -> &[ContractItem] {
        &self.items
    }

    pub fn provider_of(&self, item_id: &str) -> Option<&str> {
        self.get(item_id).map(|item| item.provider_id.as_str())
    }

    pub fn options(&self) -> CatalogOptions {
        fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
            values
                .filter(|value| !value.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .map(str::to_string)
                .collect()
        }

        CatalogOptions {
            tenders: distinct(self.items.iter().map(|item| item.tender_id.as_str())),
            providers: distinct(self.items.iter().map(|item| item.provider_id.as_str())),
            contracts: distinct(self.items.iter().map(|item| item.contract_id.as_str())),
        }
    }

    pub fn filtered(&self, filter: &CatalogFilter) -> Vec<&ContractItem> {
        self.items.iter().filter(|item| filter.accepts(item)).collect()
    }

    /// Filtered items grouped by provider in first-seen order. With a provider
    /// filter set there is at most one group, named after the filter.
    pub fn grouped(&self, filter: &CatalogFilter) -> Vec<ProviderGroup> {
        let filtered = self.filtered(filter);

        if let Some(provider_id) = filter.provider_id.as_deref() {
            if filtered.is_empty() {
                return Vec::new();
            }
            return vec![ProviderGroup {
                provider_id: provider_id.to_string(),
                items: filtered.into_iter().map(ContractItem::overview).collect(),
            }];
        }

        let mut groups: Vec<ProviderGroup> = Vec::new();
        for item in filtered {
            let key = if item.provider_id.is_empty() {
                NO_PROVIDER_GROUP
            } else {
                item.provider_id.as_str()
            };
            match groups.iter_mut().find(|group| group.provider_id == key) {
                Some(group) => group.items.push(item.overview()),
                None => groups.push(ProviderGroup {
                    provider_id: key.to_string(),
                    items: vec![item.overview()],
                }),
            }
        }
        groups
    }

    /// Rows offered on the planning sheet: items with stock left on their contract.
    pub fn plannable_items(&self, search: Option<&str>) -> Vec<&ContractItem> {
        self.items
            .iter()
            .filter(|item| item.is_available())
            .filter(|item| search.map_or(true, |term| item.matches_search(term)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(id: &str, provider: &str, tender: &str, available: i64) -> ContractItem {
        ContractItem {
            item_id: id.into(),
            tender_id: tender.into(),
            contract_id: format!("C-{}", id),
            provider_id: provider.into(),
            code: id.into(),
            description: format!("Artículo {}", id),
            unit: "Pieza".into(),
            group: "General".into(),
            unit_price: Decimal::ONE,
            max_quantity: Decimal::from(100),
            consumed_quantity: Decimal::from(100 - available),
            available_quantity: Decimal::from(available),
        }
    }

    fn catalog() -> ContractCatalog {
        ContractCatalog::new(vec![
            item("A", "Lácteos del Norte", "LP-01", 40),
            item("B", "Abarrotes Jalisco", "LP-02", 0),
            item("C", "Lácteos del Norte", "LP-01", 5),
            item("D", "", "LP-02", 9),
        ])
    }

    #[test]
    fn lookup_keeps_first_duplicate() {
        let mut items = catalog().items().to_vec();
        let mut dup = item("A", "Otro", "LP-09", 1);
        dup.description = "Duplicado".into();
        items.push(dup);
        let catalog = ContractCatalog::new(items);
        assert_eq!(catalog.get("A").unwrap().provider_id, "Lácteos del Norte");
        assert!(catalog.get("Z").is_none());
    }

    #[test]
    fn options_are_sorted_and_skip_empty_values() {
        let options = catalog().options();
        assert_eq!(options.providers, vec!["Abarrotes Jalisco", "Lácteos del Norte"]);
        assert_eq!(options.tenders, vec!["LP-01", "LP-02"]);
        assert_eq!(options.contracts.len(), 4);
    }

    #[test]
    fn grouping_uses_placeholder_for_missing_provider() {
        let groups = catalog().grouped(&CatalogFilter::default());
        let names: Vec<_> = groups.iter().map(|g| g.provider_id.as_str()).collect();
        assert_eq!(names, vec!["Lácteos del Norte", "Abarrotes Jalisco", NO_PROVIDER_GROUP]);
        assert_eq!(groups[0].items.len(), 2);
    }

    #[test]
    fn provider_filter_yields_single_group() {
        let filter = CatalogFilter {
            provider_id: Some("Lácteos del Norte".into()),
            ..Default::default()
        };
        let groups = catalog().grouped(&filter);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].items.len(), 2);

        let nobody = CatalogFilter {
            provider_id: Some("Nadie".into()),
            ..Default::default()
        };
        assert!(catalog().grouped(&nobody).is_empty());
    }

    #[test]
    fn plannable_items_require_stock() {
        let catalog = catalog();
        let ids: Vec<_> = catalog
            .plannable_items(None)
            .into_iter()
            .map(|item| item.item_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A", "C", "D"]);
        assert_eq!(catalog.plannable_items(Some("artículo c")).len(), 1);
    }
}
