//! Доменные типы: нормализованная помесячная таблица и производные от неё показатели.

use crate::config::{LOCATION_COLUMN, TOTAL_COLUMN};
use crate::raw::{Cell, RawGrid};
use crate::utils::{cell_text, coerce_money_or_zero, label_key, sum_money};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Нормализованная таблица одного месяца: строки — площадки.
///
/// Ячейки каждой строки выровнены по `columns`. После загрузки в таблице
/// всегда есть столбцы `Location` и `Total`, а столбцы выручки содержат только числа.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonthTable {
    /// Подписи столбцов в исходном порядке; недостающие столбцы выручки дописаны в конец.
    pub columns: Vec<String>,
    /// Строки данных.
    pub rows: Vec<Vec<Cell>>,
}

impl MonthTable {
    /// Индекс столбца по подписи (без учёта регистра и лишних пробелов).
    pub fn column_index(&self, label: &str) -> Option<usize> {
        let key = label_key(label);
        self.columns.iter().position(|c| label_key(c) == key)
    }

    /// Число площадок.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// В таблице нет строк.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Значения столбца, приведённые к числу; `None`, если столбца нет.
    pub fn money_column(&self, label: &str) -> Option<Vec<Money>> {
        let idx = self.column_index(label)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map_or(Decimal::ZERO, coerce_money_or_zero))
                .collect(),
        )
    }

    /// Сумма столбца; отсутствующий столбец даёт ноль.
    pub fn column_sum(&self, label: &str) -> Money {
        self.money_column(label)
            .map(sum_money)
            .unwrap_or_default()
    }

    /// Названия площадок в порядке строк.
    pub fn locations(&self) -> Vec<String> {
        let idx = self.column_index(LOCATION_COLUMN);
        self.rows
            .iter()
            .map(|row| {
                idx.and_then(|i| row.get(i))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Пары «площадка — итог» в порядке строк; `None`, если нет столбца `Total`.
    pub fn sites(&self) -> Option<Vec<RankedSite>> {
        let totals = self.money_column(TOTAL_COLUMN)?;
        Some(
            self.locations()
                .into_iter()
                .zip(totals)
                .map(|(location, total)| RankedSite { location, total })
                .collect(),
        )
    }

    /// Обратное преобразование в сетку: строка заголовка и строки данных.
    pub fn to_grid(&self) -> RawGrid {
        let header = self.columns.iter().map(|c| Cell::Text(c.clone())).collect();
        let mut rows = Vec::with_capacity(self.rows.len() + 1);
        rows.push(header);
        rows.extend(self.rows.iter().cloned());
        RawGrid::new(rows)
    }
}

/// Площадка и её итоговая выручка.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedSite {
    /// Название площадки.
    pub location: String,
    /// Итоговая выручка.
    pub total: Money,
}

/// Структура выручки по категориям.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevenueMix {
    /// Голосовая связь.
    pub voice: Money,
    /// SMS.
    pub sms: Money,
    /// Мобильные данные.
    pub data: Money,
}

/// Сводные показатели одного месяца.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KpiSnapshot {
    /// Суммарная выручка.
    pub total_revenue: Money,
    /// Средняя выручка на площадку.
    pub avg_revenue: Money,
    /// Выручка по категориям.
    pub revenue_mix: RevenueMix,
    /// Доля мобильных данных в выручке, %.
    pub data_share_pct: Money,
    /// Число площадок с нулевой выручкой.
    pub zero_revenue_sites: usize,
    /// Площадки с нулевой выручкой в порядке строк таблицы.
    pub zero_revenue_locations: Vec<String>,
    /// Площадка с максимальной выручкой, `"-"` для пустой таблицы.
    pub top_site: String,
    /// Выручка лучшей площадки.
    pub top_site_value: Money,
    /// Десять площадок с наибольшей выручкой.
    pub top_10_sites: Vec<RankedSite>,
    /// Десять площадок с наименьшей выручкой.
    pub bottom_10_sites: Vec<RankedSite>,
    /// Доля десяти лучших площадок в суммарной выручке.
    pub concentration_ratio: Money,
}

impl KpiSnapshot {
    /// Нулевой снимок для пустой таблицы.
    pub fn empty() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            avg_revenue: Decimal::ZERO,
            revenue_mix: RevenueMix::default(),
            data_share_pct: Decimal::ZERO,
            zero_revenue_sites: 0,
            zero_revenue_locations: Vec::new(),
            top_site: "-".to_string(),
            top_site_value: Decimal::ZERO,
            top_10_sites: Vec::new(),
            bottom_10_sites: Vec::new(),
            concentration_ratio: Decimal::ZERO,
        }
    }
}

impl Default for KpiSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// Направление изменения выручки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Рост.
    Up,
    /// Падение.
    Down,
    /// Без изменений.
    Flat,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Flat => "flat",
        })
    }
}

/// Сравнение двух месяцев.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoMComparison {
    /// Выручка предыдущего месяца.
    pub previous_total: Money,
    /// Выручка текущего месяца.
    pub current_total: Money,
    /// Абсолютное изменение.
    pub delta: Money,
    /// Относительное изменение, %.
    pub pct_change: Money,
    /// Направление по знаку изменения.
    pub direction: Direction,
}

/// Помесячные ряды показателей в порядке месяцев.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrendSeries {
    /// Подписи месяцев.
    pub months: Vec<String>,
    /// Суммарная выручка.
    pub total_revenue: Vec<Money>,
    /// Доля мобильных данных, %.
    pub data_share_pct: Vec<Money>,
    /// Число площадок с нулевой выручкой.
    pub zero_sites: Vec<usize>,
}

/// Группа счётчиков, которые ищутся на вспомогательном листе.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CountLabel {
    /// Работающие площадки.
    Active,
    /// Неработающие площадки.
    Inactive,
    /// Всего площадок.
    Sites,
}

impl CountLabel {
    /// Ключ группы.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Sites => "sites",
        }
    }
}

/// Сведения, извлечённые из вспомогательного листа по ключевым словам.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuxiliaryContext {
    /// Плановая выручка.
    pub target_total: Option<Money>,
    /// Контрольный итог.
    pub control_total: Option<Money>,
    /// Найденные счётчики площадок.
    pub counts: BTreeMap<CountLabel, Money>,
    /// Пояснения для читателя отчёта.
    pub notes: Vec<String>,
}

/// Точка помесячного ряда одной площадки со вспомогательного листа.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationTrendPoint {
    /// Подпись месяца.
    pub month: String,
    /// Название площадки.
    pub location: String,
    /// Выручка.
    pub total: Money,
}
