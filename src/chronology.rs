//! Разбор имён помесячных листов (`mar_24`, `nov-2025`) и их хронологический порядок.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static MONTH_SHEET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-z]{3,9})[ _\-]+(\d{2}|\d{4})$").expect("valid month sheet regex")
});

const MONTH_ALIASES: &[(&str, u32)] = &[
    ("jan", 1),
    ("january", 1),
    ("feb", 2),
    ("february", 2),
    ("mar", 3),
    ("march", 3),
    ("apr", 4),
    ("april", 4),
    ("may", 5),
    ("jun", 6),
    ("june", 6),
    ("jul", 7),
    ("july", 7),
    ("aug", 8),
    ("august", 8),
    ("sep", 9),
    ("sept", 9),
    ("september", 9),
    ("oct", 10),
    ("october", 10),
    ("nov", 11),
    ("november", 11),
    ("dec", 12),
    ("december", 12),
];

/// Ключ сортировки месяца: год и номер месяца.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthKey {
    /// Год (двузначные годы уже переведены в `20xx`).
    pub year: i32,
    /// Месяц, 1–12.
    pub month: u32,
}

impl MonthKey {
    /// Первое число месяца.
    #[inline]
    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

fn month_number(token: &str) -> Option<u32> {
    MONTH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, month)| *month)
}

/// Разбирает имя листа вида `<месяц><разделитель><год>`.
///
/// Месяц — английское название или сокращение, разделитель — пробелы,
/// `_` или `-`, год — две или четыре цифры.
///
/// ```
/// # use site_revenue_kpi::{MonthKey, parse_month_sheet_name};
/// assert_eq!(parse_month_sheet_name("Mar_24"), Some(MonthKey { year: 2024, month: 3 }));
/// assert_eq!(parse_month_sheet_name("Sheet22"), None);
/// ```
pub fn parse_month_sheet_name(name: &str) -> Option<MonthKey> {
    let lower = name.trim().to_lowercase();
    let caps = MONTH_SHEET_RE.captures(&lower)?;
    let month = month_number(caps.get(1)?.as_str())?;
    let mut year: i32 = caps.get(2)?.as_str().parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    Some(MonthKey { year, month })
}

/// Оставляет только распознанные имена и сортирует их по месяцу.
///
/// Нераспознанные имена отбрасываются. Листы с одинаковым месяцем сохраняют
/// исходный порядок.
pub fn order_chronologically<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut parsed: Vec<(MonthKey, &str)> = names
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|name| parse_month_sheet_name(name).map(|key| (key, name)))
        .collect();
    parsed.sort_by_key(|(key, _)| *key);
    parsed.into_iter().map(|(_, name)| name.to_string()).collect()
}

/// Хронологический порядок, а если ни одно имя не распознано — лексикографический
/// порядок всех имён.
pub fn order_or_lexicographic<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let ordered = order_chronologically(names);
    if !ordered.is_empty() {
        return ordered;
    }
    let mut all: Vec<String> = names.iter().map(|n| n.as_ref().to_string()).collect();
    all.sort();
    all
}
