//! Нормализация помесячного листа в таблицу площадок.

use std::sync::LazyLock;

use crate::config::{LOCATION_COLUMN, RevenueColumns, TOTAL_COLUMN};
use crate::error::ReportError;
use crate::raw::{Cell, RawGrid};
use crate::types::MonthTable;
use crate::utils::{cell_text, coerce_money_or_zero, column_label, find_header_row, label_key};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::debug;

/// Сколько первых строк листа проверяется на роль заголовка.
pub const HEADER_SEARCH_DEPTH: usize = 5;

static TOTAL_ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\btotal\b").expect("valid total row regex"));

/// Индекс первого столбца с подписью `label`.
fn position(columns: &[String], label: &str) -> Option<usize> {
    let key = label_key(label);
    columns.iter().position(|c| label_key(c) == key)
}

impl RawGrid {
    /// Превращает сетку помесячного листа в нормализованную таблицу.
    ///
    /// Заголовок ищется в первых [`HEADER_SEARCH_DEPTH`] строках: берётся первая,
    /// где есть и `Location`, и `Total`. Недостающие столбцы выручки дописываются
    /// нулями, нечисловые значения выручки становятся нулём. Итоговые строки
    /// (`Total`, `Grand Total`) и строки без площадки отбрасываются, порядок
    /// остальных сохраняется.
    pub fn ingest_month(
        &self,
        sheet: &str,
        revenue: &RevenueColumns,
    ) -> Result<MonthTable, ReportError> {
        let schema_error = |column| ReportError::Schema {
            sheet: sheet.to_string(),
            column,
        };

        let header_idx = find_header_row(
            self,
            &[LOCATION_COLUMN, TOTAL_COLUMN],
            HEADER_SEARCH_DEPTH,
        )
        .map_err(schema_error)?;

        let width = self.width();
        let mut columns: Vec<String> = (0..width)
            .map(|col| column_label(self.get(header_idx, col)))
            .collect();
        let location_idx =
            position(&columns, LOCATION_COLUMN).ok_or_else(|| schema_error(LOCATION_COLUMN))?;

        let mut rows: Vec<Vec<Cell>> = self.rows()[header_idx + 1..]
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row.resize(width, Cell::Empty);
                row
            })
            .collect();

        for label in revenue.components() {
            if position(&columns, label).is_none() {
                columns.push(label.to_string());
                for row in &mut rows {
                    row.push(Cell::Number(Decimal::ZERO));
                }
            }
        }

        let numeric: Vec<usize> = revenue
            .components()
            .chain([TOTAL_COLUMN])
            .filter_map(|label| position(&columns, label))
            .collect();

        for row in &mut rows {
            for &idx in &numeric {
                row[idx] = Cell::Number(coerce_money_or_zero(&row[idx]));
            }
            row[location_idx] = Cell::Text(cell_text(&row[location_idx]));
        }

        let read = rows.len();
        rows.retain(|row| match &row[location_idx] {
            Cell::Text(location) => !location.is_empty() && !TOTAL_ROW_RE.is_match(location),
            _ => false,
        });

        debug!(
            sheet,
            header_row = header_idx,
            rows = rows.len(),
            stripped = read - rows.len(),
            "month sheet ingested"
        );

        Ok(MonthTable { columns, rows })
    }
}
