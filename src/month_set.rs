//! Набор помесячных таблиц в хронологическом порядке.

use crate::chronology::{MonthKey, order_or_lexicographic, parse_month_sheet_name};
use crate::config::RevenueColumns;
use crate::error::ReportError;
use crate::kpi::build_trend;
use crate::raw::RawWorkbook;
use crate::types::{Money, MonthTable, TrendSeries};
use tracing::{debug, info};

/// Таблица одного месяца с подписью листа.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    /// Имя листа.
    pub label: String,
    /// Распознанный месяц, если имя листа удалось разобрать.
    pub key: Option<MonthKey>,
    /// Нормализованная таблица.
    pub table: MonthTable,
}

/// Месяцы книги, упорядоченные по времени.
#[derive(Debug, Clone, Default)]
pub struct MonthSet {
    /// Месяцы от раннего к позднему.
    pub months: Vec<Month>,
}

impl MonthSet {
    /// Нормализует все листы книги, кроме вспомогательного.
    ///
    /// Ошибка любого помесячного листа прерывает загрузку: неполный набор
    /// месяцев не принимается.
    pub fn from_workbook(
        workbook: &RawWorkbook,
        aux_sheet: &str,
        revenue: &RevenueColumns,
    ) -> Result<Self, ReportError> {
        let aux_name = aux_sheet.trim().to_lowercase();
        let mut tables = Vec::new();
        for (name, grid) in workbook.sheets() {
            if name.trim().to_lowercase() == aux_name {
                continue;
            }
            tables.push((name.to_string(), grid.ingest_month(name, revenue)?));
        }

        let set = Self::from_tables(tables);
        if set.months.is_empty() {
            return Err(ReportError::NoMonthlySheets);
        }
        info!(months = set.months.len(), "monthly sheets loaded");
        Ok(set)
    }

    /// Упорядочивает готовые таблицы по именам листов.
    ///
    /// Листы с нераспознанным именем отбрасываются, если распознан хотя бы
    /// один; иначе все листы сортируются по имени.
    pub fn from_tables<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = (String, MonthTable)>,
    {
        let mut pending: Vec<(String, MonthTable)> = tables.into_iter().collect();
        let names: Vec<&str> = pending.iter().map(|(name, _)| name.as_str()).collect();
        let ordered = order_or_lexicographic(&names);

        let mut months = Vec::with_capacity(ordered.len());
        for name in ordered {
            if let Some(pos) = pending.iter().position(|(n, _)| *n == name) {
                let (label, table) = pending.remove(pos);
                months.push(Month {
                    key: parse_month_sheet_name(&label),
                    label,
                    table,
                });
            }
        }

        if !pending.is_empty() {
            let skipped: Vec<&str> = pending.iter().map(|(name, _)| name.as_str()).collect();
            debug!(?skipped, "sheets without a month name skipped");
        }

        Self { months }
    }

    /// Число месяцев.
    #[inline]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// Набор пуст.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Подписи месяцев по порядку.
    pub fn labels(&self) -> Vec<&str> {
        self.months.iter().map(|m| m.label.as_str()).collect()
    }

    /// Таблица месяца по имени листа.
    pub fn get(&self, label: &str) -> Option<&MonthTable> {
        self.months
            .iter()
            .find(|m| m.label == label)
            .map(|m| &m.table)
    }

    /// Последний месяц.
    #[inline]
    pub fn latest(&self) -> Option<&Month> {
        self.months.last()
    }

    /// Два последних месяца: `(предыдущий, текущий)`.
    pub fn latest_pair(&self) -> Option<(&Month, &Month)> {
        match self.months.as_slice() {
            [.., previous, current] => Some((previous, current)),
            _ => None,
        }
    }

    /// Помесячные ряды по всем месяцам набора.
    pub fn trend(&self, revenue: &RevenueColumns) -> TrendSeries {
        build_trend(
            self.months.iter().map(|m| (m.label.as_str(), &m.table)),
            revenue,
        )
    }

    /// Итог одной площадки по месяцам; месяцы без площадки пропускаются.
    pub fn location_history(&self, location: &str) -> Vec<(&str, Money)> {
        let wanted = location.trim();
        self.months
            .iter()
            .filter_map(|month| {
                let sites = month.table.sites()?;
                let site = sites.into_iter().find(|s| s.location == wanted)?;
                Some((month.label.as_str(), site.total))
            })
            .collect()
    }
}
