use chrono::Local;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::ContractCatalog;
use crate::config::PrintConfig;
use crate::errors::ServiceError;
use crate::models::period::spanish_long_date;
use crate::models::{DispatchLine, DispatchRequest, MealSlot};

pub const SHEET_TITLE: &str = "PEDIDO AL ALMACEN VIVERES";

/// One table row of the printed warehouse request. Blank rows pad the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PrintRow {
    pub code: String,
    pub description: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DispatchPrintSheet {
    pub dispatch_id: String,
    pub sheet_number: usize,
    pub sheet_count: usize,
    pub hospital_name: String,
    pub title: String,
    pub budget_line: String,
    pub hospital_unit: String,
    pub date_label: String,
    pub service_name: String,
    pub meal: MealSlot,
    pub rows: Vec<PrintRow>,
}

fn print_row(catalog: &ContractCatalog, line: &DispatchLine) -> PrintRow {
    match catalog.get(&line.item_id) {
        Some(item) => PrintRow {
            code: item.code.clone(),
            description: item.description.clone(),
            unit: item.unit.clone(),
            quantity: Some(line.quantity),
        },
        None => PrintRow {
            quantity: Some(line.quantity),
            ..PrintRow::default()
        },
    }
}

/// Lays out an encoded detail list on fixed-height sheets. A malformed detail
/// prints as a single blank sheet.
pub fn sheets_from_detail(
    dispatch: &DispatchRequest,
    detail: &str,
    catalog: &ContractCatalog,
    layout: &PrintConfig,
) -> Vec<DispatchPrintSheet> {
    let rows_per_sheet = layout.rows_per_sheet.max(1);
    let mut rows: Vec<PrintRow> = DispatchLine::decode_detail_lenient(detail)
        .iter()
        .map(|line| print_row(catalog, line))
        .collect();

    let sheet_count = rows.len().div_ceil(rows_per_sheet).max(1);
    rows.resize(sheet_count * rows_per_sheet, PrintRow::default());

    let date_label = spanish_long_date(dispatch.generated_at.with_timezone(&Local).date_naive());
    let service_name = dispatch.service_name.to_uppercase();

    rows.chunks(rows_per_sheet)
        .enumerate()
        .map(|(index, chunk)| DispatchPrintSheet {
            dispatch_id: dispatch.dispatch_id.clone(),
            sheet_number: index + 1,
            sheet_count,
            hospital_name: layout.hospital_name.clone(),
            title: SHEET_TITLE.to_string(),
            budget_line: layout.budget_line.clone(),
            hospital_unit: layout.hospital_unit.clone(),
            date_label: date_label.clone(),
            service_name: service_name.clone(),
            meal: dispatch.meal,
            rows: chunk.to_vec(),
        })
        .collect()
}

pub fn print_dispatch(
    dispatch: &DispatchRequest,
    catalog: &ContractCatalog,
    layout: &PrintConfig,
) -> Result<Vec<DispatchPrintSheet>, ServiceError> {
    let detail = DispatchLine::encode_detail(&dispatch.lines)?;
    Ok(sheets_from_detail(dispatch, &detail, catalog, layout))
}
