//! Извлечение плановых и контрольных цифр со вспомогательного листа.
//!
//! Лист не имеет фиксированной структуры: первая строка считается подписями
//! столбцов, остальные — телом. Поиск идёт по фиксированным наборам ключевых
//! слов и никогда не завершается ошибкой.

use std::collections::BTreeMap;

use crate::config::LOCATION_COLUMN;
use crate::raw::{Cell, RawGrid};
use crate::types::{AuxiliaryContext, CountLabel, LocationTrendPoint, Money};
use crate::utils::{cell_text, coerce_money, column_label, contains_keyword, label_key};
use tracing::{debug, warn};

const TARGET_KEYWORDS: &[&str] = &["target", "budget", "plan", "expected"];
const CONTROL_KEYWORDS: &[&str] = &["total", "reconcile", "control"];
const COUNT_KEYWORDS: &[(CountLabel, &[&str])] = &[
    (CountLabel::Active, &["active", "in service"]),
    (CountLabel::Inactive, &["inactive", "down", "not active"]),
    (CountLabel::Sites, &["sites", "nbip"]),
];

/// Окно сканирования ячеек: строки тела.
const SCAN_ROWS: usize = 200;
/// Окно сканирования ячеек: столбцы.
const SCAN_COLS: usize = 30;

const UNAVAILABLE_NOTE: &str =
    "Auxiliary sheet not available; proceeding with monthly sheets only.";

/// Способ найти число по ключевым словам.
type Strategy = fn(&RawGrid, &[&str]) -> Option<Money>;

const TARGET_STRATEGIES: &[Strategy] = &[column_scan, neighbour_scan];
const CONTROL_STRATEGIES: &[Strategy] = &[column_scan];

fn labels(sheet: &RawGrid) -> Vec<String> {
    (0..sheet.width())
        .map(|col| column_label(sheet.get(0, col)))
        .collect()
}

fn body(sheet: &RawGrid) -> &[Vec<Cell>] {
    sheet.rows().get(1..).unwrap_or_default()
}

/// Под строкой подписей есть хоть одна непустая ячейка.
fn has_body(sheet: &RawGrid) -> bool {
    !body(sheet).iter().flatten().all(Cell::is_blank)
}

/// Первый столбец с ключевым словом в подписи, где нашлось хоть одно число.
///
/// Из нескольких чисел берётся максимум: предполагается, что итоговая строка
/// больше остальных. Для столбца с разнородными значениями это может дать
/// не ту цифру.
fn column_scan(sheet: &RawGrid, keywords: &[&str]) -> Option<Money> {
    let rows = body(sheet);
    labels(sheet)
        .iter()
        .enumerate()
        .filter(|(_, label)| contains_keyword(label, keywords))
        .find_map(|(idx, _)| {
            rows.iter()
                .filter_map(|row| row.get(idx).and_then(coerce_money))
                .max()
        })
}

/// Текстовая ячейка с ключевым словом и число справа от неё.
fn neighbour_scan(sheet: &RawGrid, keywords: &[&str]) -> Option<Money> {
    let width = sheet.width();
    body(sheet).iter().take(SCAN_ROWS).find_map(|row| {
        (0..width.min(SCAN_COLS)).find_map(|col| match row.get(col) {
            Some(Cell::Text(text)) if contains_keyword(text, keywords) => {
                row.get(col + 1).and_then(coerce_money)
            }
            _ => None,
        })
    })
}

fn run_strategies(
    sheet: Option<&RawGrid>,
    strategies: &[Strategy],
    keywords: &[&str],
) -> Option<Money> {
    let sheet = sheet.filter(|s| has_body(s))?;
    strategies.iter().find_map(|strategy| strategy(sheet, keywords))
}

/// Плановая выручка: сначала по подписям столбцов, затем по соседней ячейке.
pub fn find_target_total(sheet: Option<&RawGrid>) -> Option<Money> {
    run_strategies(sheet, TARGET_STRATEGIES, TARGET_KEYWORDS)
}

/// Контрольный итог: только по подписям столбцов.
pub fn find_control_total(sheet: Option<&RawGrid>) -> Option<Money> {
    run_strategies(sheet, CONTROL_STRATEGIES, CONTROL_KEYWORDS)
}

/// Счётчики площадок; при нескольких совпадениях группы побеждает последнее.
fn scan_counts(sheet: &RawGrid) -> BTreeMap<CountLabel, Money> {
    // Соседняя ячейка тоже должна попасть в окно.
    let cols = sheet.width().min(SCAN_COLS).saturating_sub(1);
    let mut counts = BTreeMap::new();

    for row in body(sheet).iter().take(SCAN_ROWS) {
        for col in 0..cols {
            let Some(Cell::Text(text)) = row.get(col) else {
                continue;
            };
            for (label, keywords) in COUNT_KEYWORDS {
                if !contains_keyword(text, keywords) {
                    continue;
                }
                if let Some(value) = row.get(col + 1).and_then(coerce_money) {
                    counts.insert(*label, value);
                }
            }
        }
    }

    counts
}

/// Собирает контекст вспомогательного листа. Отсутствующий или пустой лист
/// даёт контекст без цифр и с поясняющей заметкой.
pub fn build_context(sheet: Option<&RawGrid>) -> AuxiliaryContext {
    let mut context = AuxiliaryContext::default();

    let Some(sheet) = sheet.filter(|s| has_body(s)) else {
        warn!("auxiliary sheet missing or empty");
        context.notes.push(UNAVAILABLE_NOTE.to_string());
        return context;
    };

    context.target_total = find_target_total(Some(sheet));
    context.control_total = find_control_total(Some(sheet));
    context.counts = scan_counts(sheet);

    debug!(
        target = ?context.target_total,
        control = ?context.control_total,
        counts = context.counts.len(),
        "auxiliary context extracted"
    );
    context
}

/// Подписи месяцев в порядке столбцов; повторы получают суффикс `_2`, `_3`, ...
fn month_labels(columns: &[String]) -> Vec<String> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    columns
        .iter()
        .map(|column| {
            let base = column.replace('.', "_").trim().to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count > 1 {
                format!("{base}_{count}")
            } else {
                base
            }
        })
        .collect()
}

/// Разворачивает широкую таблицу «площадка × месяц» в длинный ряд точек.
///
/// Нужен столбец `Location`; все остальные подписанные столбцы считаются
/// месяцами. Нечисловые значения пропускаются.
pub fn location_trend(sheet: Option<&RawGrid>) -> Vec<LocationTrendPoint> {
    let Some(sheet) = sheet else {
        return Vec::new();
    };
    let columns = labels(sheet);
    let location_key = label_key(LOCATION_COLUMN);
    let Some(location_idx) = columns.iter().position(|c| label_key(c) == location_key) else {
        return Vec::new();
    };

    let month_cols: Vec<usize> = (0..columns.len())
        .filter(|&idx| idx != location_idx && !columns[idx].is_empty())
        .collect();
    let month_names: Vec<String> = month_cols.iter().map(|&idx| columns[idx].clone()).collect();
    let month_titles = month_labels(&month_names);

    let mut points = Vec::new();
    for row in body(sheet) {
        let location = row.get(location_idx).map(cell_text).unwrap_or_default();
        if location.is_empty() {
            continue;
        }
        for (&idx, month) in month_cols.iter().zip(&month_titles) {
            if let Some(total) = row.get(idx).and_then(coerce_money) {
                points.push(LocationTrendPoint {
                    month: month.clone(),
                    location: location.clone(),
                    total,
                });
            }
        }
    }
    points
}
