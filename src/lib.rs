#![warn(missing_docs)]
//! Библиотека для загрузки помесячных отчётов о выручке площадок из книги
//! Excel, расчёта KPI и извлечения плановых цифр со вспомогательного листа.

mod auxiliary;
mod chronology;
mod config;
mod error;
mod kpi;
mod month_set;
mod parser;
mod raw;
mod report;
mod types;
mod utils;

pub use crate::auxiliary::{build_context, find_control_total, find_target_total, location_trend};
pub use crate::chronology::{
    MonthKey, order_chronologically, order_or_lexicographic, parse_month_sheet_name,
};
pub use crate::config::{Config, LOCATION_COLUMN, RevenueColumns, TOTAL_COLUMN};
pub use crate::error::ReportError;
pub use crate::kpi::{RANKING_SIZE, build_trend, compare_month_over_month, compute_snapshot};
pub use crate::month_set::{Month, MonthSet};
pub use crate::parser::HEADER_SEARCH_DEPTH;
pub use crate::raw::{Cell, RawGrid, RawWorkbook};
pub use crate::report::{BoardReport, ReportBuilder};
pub use crate::types::*;
pub use crate::utils::{coerce_money, coerce_money_or_zero, format_currency, format_pct};
