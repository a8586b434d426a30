use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Contract line for one supply item. Loaded once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContractItem {
    pub item_id: String,
    pub tender_id: String,
    pub contract_id: String,
    pub provider_id: String,
    pub code: String,
    pub description: String,
    pub unit: String,
    pub group: String,
    pub unit_price: Decimal,
    pub max_quantity: Decimal,
    pub consumed_quantity: Decimal,
    /// Fixed at load time.
    pub available_quantity: Decimal,
}

/// How much of a contract has been drawn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionLevel {
    Normal,
    Warning,
    Critical,
}

impl ConsumptionLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ConsumptionLevel::Critical
        } else if percentage >= 70.0 {
            ConsumptionLevel::Warning
        } else {
            ConsumptionLevel::Normal
        }
    }
}

/// Contracts panel projection of a [`ContractItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContractOverview {
    #[serde(flatten)]
    pub item: ContractItem,
    pub consumption_percentage: f64,
    pub consumption_bar: f64,
    pub consumption_level: ConsumptionLevel,
    pub is_available: bool,
    pub availability_label: String,
}

impl ContractItem {
    pub fn is_available(&self) -> bool {
        self.available_quantity > Decimal::ZERO
    }

    /// Consumed / max as a percentage; a zero max counts as one unit.
    pub fn consumption_percentage(&self) -> f64 {
        let max = if self.max_quantity.is_zero() {
            Decimal::ONE
        } else {
            self.max_quantity
        };
        (self.consumed_quantity / max * Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0)
    }

    pub fn overview(&self) -> ContractOverview {
        let percentage = self.consumption_percentage();
        let is_available = self.is_available();
        ContractOverview {
            item: self.clone(),
            consumption_percentage: percentage,
            consumption_bar: percentage.clamp(0.0, 100.0),
            consumption_level: ConsumptionLevel::from_percentage(percentage),
            is_available,
            availability_label: if is_available { "Activo" } else { "Agotado" }.to_string(),
        }
    }

    /// Case-insensitive match on description or code.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        term.is_empty()
            || self.description.to_lowercase().contains(&term)
            || self.code.to_lowercase().contains(&term)
    }
}
