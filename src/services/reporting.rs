use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::ContractCatalog;
use crate::errors::ServiceError;
use crate::models::{OrderLogEntry, YearMonth};

/// Display band of a heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HeatBand {
    Empty,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl HeatBand {
    pub fn from_intensity(intensity: f64) -> Self {
        if intensity <= 0.0 {
            HeatBand::Empty
        } else if intensity < 0.2 {
            HeatBand::VeryLow
        } else if intensity < 0.4 {
            HeatBand::Low
        } else if intensity < 0.6 {
            HeatBand::Medium
        } else if intensity < 0.8 {
            HeatBand::High
        } else {
            HeatBand::VeryHigh
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatrixCell {
    pub day: u32,
    pub quantity: u64,
    pub intensity: f64,
    pub band: HeatBand,
}

/// One item of the monthly matrix with its non-empty day cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatrixRow {
    pub item_id: String,
    pub description: String,
    pub code: String,
    pub unit: String,
    pub provider_id: String,
    pub cells: Vec<MatrixCell>,
    pub total: u64,
}

impl MatrixRow {
    pub fn quantity_on(&self, day: u32) -> u64 {
        self.cells
            .iter()
            .find(|cell| cell.day == day)
            .map_or(0, |cell| cell.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyMatrix {
    pub period: YearMonth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub days_in_month: u32,
    /// Largest single day-cell total; 0 when there is no data.
    pub max_value: u64,
    pub rows: Vec<MatrixRow>,
}

/// `value / max_value` clamped to [0, 1]; 0 when the matrix is empty.
pub fn intensity(value: u64, max_value: u64) -> f64 {
    if max_value == 0 {
        return 0.0;
    }
    (value as f64 / max_value as f64).clamp(0.0, 1.0)
}

impl MonthlyMatrix {
    /// Rows supplied by `provider_id`, sums untouched.
    pub fn rows_for_provider<'a>(
        &'a self,
        provider_id: &'a str,
    ) -> impl Iterator<Item = &'a MatrixRow> + 'a {
        self.rows
            .iter()
            .filter(move |row| row.provider_id == provider_id)
    }

    pub fn filtered_by_provider(&self, provider_id: &str) -> MonthlyMatrix {
        MonthlyMatrix {
            rows: self.rows_for_provider(provider_id).cloned().collect(),
            ..self.clone()
        }
    }
}

/// Folds the log entries of `period` (optionally one user's) by item and day.
/// Entries for items outside the catalog are skipped.
pub fn build_monthly_matrix(
    log: &[OrderLogEntry],
    catalog: &ContractCatalog,
    period: YearMonth,
    user_id: Option<&str>,
) -> MonthlyMatrix {
    let mut sums: HashMap<&str, BTreeMap<u32, u64>> = HashMap::new();

    for entry in log {
        if !period.contains(entry.scheduled_date) {
            continue;
        }
        if user_id.map_or(false, |user| user != entry.user_id) {
            continue;
        }
        if catalog.get(&entry.item_id).is_none() {
            continue;
        }
        *sums
            .entry(entry.item_id.as_str())
            .or_default()
            .entry(entry.scheduled_date.day())
            .or_default() += u64::from(entry.quantity);
    }

    let max_value = sums
        .values()
        .flat_map(|days| days.values().copied())
        .max()
        .unwrap_or(0);

    let mut rows: Vec<MatrixRow> = sums
        .into_iter()
        .filter_map(|(item_id, days)| {
            let item = catalog.get(item_id)?;
            let cells: Vec<MatrixCell> = days
                .into_iter()
                .map(|(day, quantity)| {
                    let level = intensity(quantity, max_value);
                    MatrixCell {
                        day,
                        quantity,
                        intensity: level,
                        band: HeatBand::from_intensity(level),
                    }
                })
                .collect();
            Some(MatrixRow {
                item_id: item.item_id.clone(),
                description: item.description.clone(),
                code: item.code.clone(),
                unit: item.unit.clone(),
                provider_id: item.provider_id.clone(),
                total: cells.iter().map(|cell| cell.quantity).sum(),
                cells,
            })
        })
        .collect();
    rows.sort_by(|a, b| {
        a.description
            .cmp(&b.description)
            .then_with(|| a.item_id.cmp(&b.item_id))
    });

    MonthlyMatrix {
        period,
        user_id: user_id.map(str::to_string),
        days_in_month: period.days_in_month(),
        max_value,
        rows,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SummaryLine {
    pub code: String,
    pub description: String,
    pub unit: String,
    pub total: u64,
}

/// Outbound message for one provider with the monthly totals it must supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProviderSummary {
    pub provider_id: String,
    pub period: YearMonth,
    pub subject: String,
    pub lines: Vec<SummaryLine>,
    pub html_body: String,
    pub mailto: String,
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encodes like a URI component (spaces as `%20`).
fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

fn render_html(provider_id: &str, lines: &[SummaryLine]) -> String {
    let rows: String = lines
        .iter()
        .map(|line| {
            format!(
                "<tr><td style=\"padding: 8px; border: 1px solid #ddd;\">{}</td>\
                 <td style=\"padding: 8px; border: 1px solid #ddd;\">{}</td>\
                 <td style=\"padding: 8px; border: 1px solid #ddd; text-align: center; font-weight: bold;\">{}</td>\
                 <td style=\"padding: 8px; border: 1px solid #ddd;\">{}</td></tr>",
                escape_html(&line.code),
                escape_html(&line.description),
                line.total,
                escape_html(&line.unit)
            )
        })
        .collect();

    format!(
        "<p>Estimado {},</p>\
         <p>A continuación se detalla la programación de pedidos consolidada para los artículos que usted surte:</p>\
         <table style=\"width: 100%; border-collapse: collapse; border: 1px solid #ddd;\" border=\"1\">\
         <thead><tr style=\"background-color: #f2f2f2; color: #000;\">\
         <th style=\"padding: 8px; text-align: left;\">Código</th>\
         <th style=\"padding: 8px; text-align: left;\">Descripción del Artículo</th>\
         <th style=\"padding: 8px; text-align: center;\">Cantidad Total Requerida</th>\
         <th style=\"padding: 8px; text-align: left;\">Unidad</th>\
         </tr></thead><tbody>{}</tbody></table>\
         <p>Gracias por su colaboración.</p>",
        escape_html(provider_id),
        rows
    )
}

/// Renders the provider's non-zero monthly totals for e-mail.
pub fn export_provider_summary(
    matrix: &MonthlyMatrix,
    provider_id: &str,
) -> Result<ProviderSummary, ServiceError> {
    let lines: Vec<SummaryLine> = matrix
        .rows_for_provider(provider_id)
        .filter(|row| row.total > 0)
        .map(|row| SummaryLine {
            code: row.code.clone(),
            description: row.description.clone(),
            unit: row.unit.clone(),
            total: row.total,
        })
        .collect();

    if lines.is_empty() {
        return Err(ServiceError::NothingToExport(format!(
            "no planned items for provider {} in {}",
            provider_id, matrix.period
        )));
    }

    let subject = format!("Programación de Pedidos Consolidada - {}", provider_id);
    let html_body = render_html(provider_id, &lines);
    let mailto = format!(
        "mailto:?subject={}&body={}",
        encode_component(&subject),
        encode_component(&html_body)
    );

    Ok(ProviderSummary {
        provider_id: provider_id.to_string(),
        period: matrix.period,
        subject,
        lines,
        html_body,
        mailto,
    })
}
