//! Полный цикл загрузки книги: месяцы, KPI, сравнение, ряды и вспомогательный лист.

use crate::auxiliary::{build_context, location_trend};
use crate::config::{Config, RevenueColumns};
use crate::error::ReportError;
use crate::kpi::{compare_month_over_month, compute_snapshot};
use crate::month_set::MonthSet;
use crate::raw::RawWorkbook;
use crate::types::{
    AuxiliaryContext, KpiSnapshot, LocationTrendPoint, MoMComparison, Money, TrendSeries,
};
use rust_decimal::Decimal;
use tracing::info;

/// Набор флагов, определяющий, что загружать со вспомогательного листа (внутренний тип).
#[derive(Debug, Clone, Copy)]
pub(crate) struct LoadOptions {
    pub load_auxiliary: bool,
    pub load_location_trend: bool,
}

impl LoadOptions {
    /// Загружает всё.
    pub const fn everything() -> Self {
        Self {
            load_auxiliary: true,
            load_location_trend: true,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::everything()
    }
}

/// Результат одного цикла загрузки книги.
#[derive(Debug, Clone)]
pub struct BoardReport {
    /// Месяцы в хронологическом порядке.
    pub months: MonthSet,
    /// Имя последнего месяца.
    pub latest_label: String,
    /// KPI последнего месяца.
    pub latest: KpiSnapshot,
    /// Сравнение двух последних месяцев; `None`, если месяц один.
    pub mom: Option<MoMComparison>,
    /// Подпись сравнения: `"<предыдущий> -> <текущий>"`.
    pub mom_label: Option<String>,
    /// Помесячные ряды.
    pub trend: TrendSeries,
    /// Сведения со вспомогательного листа.
    pub auxiliary: Option<AuxiliaryContext>,
    /// Помесячная выручка площадок со вспомогательного листа.
    pub location_trend: Option<Vec<LocationTrendPoint>>,
}

impl BoardReport {
    /// Загружает книгу с настройками по умолчанию.
    #[inline]
    pub fn load(workbook: &RawWorkbook) -> Result<Self, ReportError> {
        ReportBuilder::new(workbook).build()
    }

    fn load_with(builder: &ReportBuilder<'_>) -> Result<Self, ReportError> {
        let months =
            MonthSet::from_workbook(builder.workbook, &builder.aux_sheet, &builder.columns)?;
        let latest_month = months.latest().ok_or(ReportError::NoMonthlySheets)?;
        let latest_label = latest_month.label.clone();
        let latest = compute_snapshot(&latest_month.table, &builder.columns);

        let (mom, mom_label) = match months.latest_pair() {
            Some((previous, current)) => (
                Some(compare_month_over_month(&previous.table, &current.table)),
                Some(format!("{} -> {}", previous.label, current.label)),
            ),
            None => (None, None),
        };

        let trend = months.trend(&builder.columns);

        let aux_grid = builder.workbook.find_sheet(&builder.aux_sheet);
        let auxiliary = builder
            .options
            .load_auxiliary
            .then(|| build_context(aux_grid));
        let location_trend = builder
            .options
            .load_location_trend
            .then(|| location_trend(aux_grid));

        info!(
            latest = %latest_label,
            months = months.len(),
            total = %latest.total_revenue,
            "board report built"
        );

        Ok(Self {
            months,
            latest_label,
            latest,
            mom,
            mom_label,
            trend,
            auxiliary,
            location_trend,
        })
    }

    /// Выполнение плана последнего месяца, %.
    ///
    /// `None`, если план не найден; ноль при нулевом плане.
    pub fn target_achievement(&self) -> Option<Money> {
        let target = self.auxiliary.as_ref()?.target_total?;
        if target.is_zero() {
            return Some(Decimal::ZERO);
        }
        Some(
            self.latest
                .total_revenue
                .checked_div(target)
                .unwrap_or_default()
                .saturating_mul(Decimal::ONE_HUNDRED),
        )
    }
}

/// Builder для загрузки `BoardReport` с выбором источников.
pub struct ReportBuilder<'a> {
    workbook: &'a RawWorkbook,
    aux_sheet: String,
    columns: RevenueColumns,
    options: LoadOptions,
}

impl<'a> ReportBuilder<'a> {
    /// Создаёт builder для книги с настройками по умолчанию.
    ///
    /// # Пример
    ///
    /// ```
    /// # use site_revenue_kpi::{Cell, RawGrid, RawWorkbook, ReportBuilder};
    /// let grid = RawGrid::new(vec![
    ///     vec![Cell::from("Location"), Cell::from("Total")],
    ///     vec![Cell::from("Alpha"), Cell::from(100)],
    /// ]);
    /// let workbook = RawWorkbook::from_sheets([("mar_24", grid)]);
    /// let report = ReportBuilder::new(&workbook)
    ///     .auxiliary(false)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(report.latest_label, "mar_24");
    /// assert!(report.mom.is_none());
    /// ```
    #[inline]
    pub fn new(workbook: &'a RawWorkbook) -> Self {
        Self {
            workbook,
            aux_sheet: Config::default().aux_sheet,
            columns: RevenueColumns::default(),
            options: LoadOptions::everything(),
        }
    }

    /// Имя вспомогательного листа.
    #[inline]
    pub fn aux_sheet(mut self, name: impl Into<String>) -> Self {
        self.aux_sheet = name.into();
        self
    }

    /// Состав столбцов выручки.
    #[inline]
    pub fn columns(mut self, columns: RevenueColumns) -> Self {
        self.columns = columns;
        self
    }

    /// Включает или отключает разбор вспомогательного листа.
    #[inline]
    pub const fn auxiliary(mut self, enabled: bool) -> Self {
        self.options.load_auxiliary = enabled;
        self
    }

    /// Включает или отключает помесячные ряды площадок со вспомогательного листа.
    #[inline]
    pub const fn location_trend(mut self, enabled: bool) -> Self {
        self.options.load_location_trend = enabled;
        self
    }

    /// Выполняет загрузку с текущими настройками.
    #[inline]
    pub fn build(self) -> Result<BoardReport, ReportError> {
        BoardReport::load_with(&self)
    }
}
