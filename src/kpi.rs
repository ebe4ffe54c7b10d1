//! Расчёт KPI месяца, сравнение месяцев и помесячные ряды.

use crate::config::{RevenueColumns, TOTAL_COLUMN};
use crate::types::{
    Direction, KpiSnapshot, MoMComparison, Money, MonthTable, RankedSite, RevenueMix, TrendSeries,
};
use crate::utils::sum_money;
use rust_decimal::Decimal;

/// Размер рейтингов лучших и худших площадок.
pub const RANKING_SIZE: usize = 10;

/// `part / whole`, ноль при нулевом знаменателе.
fn ratio(part: Money, whole: Money) -> Money {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole).unwrap_or_default()
}

/// `part / whole * 100`, ноль при нулевом знаменателе; на границах `Decimal` насыщается.
fn percent(part: Money, whole: Money) -> Money {
    ratio(part, whole).saturating_mul(Decimal::ONE_HUNDRED)
}

/// Сумма по столбцам категории; отсутствующие столбцы дают ноль.
fn category_sum(table: &MonthTable, columns: &[String]) -> Money {
    sum_money(columns.iter().map(|label| table.column_sum(label)))
}

/// Первые `RANKING_SIZE` площадок после устойчивой сортировки по итогу.
fn ranked(sites: &[RankedSite], descending: bool) -> Vec<RankedSite> {
    let mut sorted = sites.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.total.cmp(&a.total));
    } else {
        sorted.sort_by(|a, b| a.total.cmp(&b.total));
    }
    sorted.truncate(RANKING_SIZE);
    sorted
}

/// Считает KPI одного месяца.
///
/// Пустая таблица или таблица без `Total` дают [`KpiSnapshot::empty`].
pub fn compute_snapshot(table: &MonthTable, revenue: &RevenueColumns) -> KpiSnapshot {
    let Some(sites) = table.sites().filter(|sites| !sites.is_empty()) else {
        return KpiSnapshot::empty();
    };

    let total_revenue = sum_money(sites.iter().map(|s| s.total));
    let avg_revenue = ratio(total_revenue, Decimal::from(sites.len()));

    let revenue_mix = RevenueMix {
        voice: category_sum(table, &revenue.voice),
        sms: category_sum(table, &revenue.sms),
        data: category_sum(table, &revenue.data),
    };

    let zero_revenue_locations: Vec<String> = sites
        .iter()
        .filter(|s| s.total.is_zero())
        .map(|s| s.location.clone())
        .collect();

    let top_10_sites = ranked(&sites, true);
    let bottom_10_sites = ranked(&sites, false);
    let top_10_sum = sum_money(top_10_sites.iter().map(|s| s.total));

    // При равных итогах первой остаётся более ранняя строка.
    let (top_site, top_site_value) = top_10_sites
        .first()
        .map(|s| (s.location.clone(), s.total))
        .unwrap_or_else(|| ("-".to_string(), Decimal::ZERO));

    KpiSnapshot {
        total_revenue,
        avg_revenue,
        data_share_pct: percent(revenue_mix.data, total_revenue),
        revenue_mix,
        zero_revenue_sites: zero_revenue_locations.len(),
        zero_revenue_locations,
        top_site,
        top_site_value,
        top_10_sites,
        bottom_10_sites,
        concentration_ratio: ratio(top_10_sum, total_revenue),
    }
}

/// Сравнивает итоговую выручку двух месяцев.
pub fn compare_month_over_month(previous: &MonthTable, current: &MonthTable) -> MoMComparison {
    let previous_total = previous.column_sum(TOTAL_COLUMN);
    let current_total = current.column_sum(TOTAL_COLUMN);
    let delta = current_total.saturating_sub(previous_total);

    let direction = if delta > Decimal::ZERO {
        Direction::Up
    } else if delta < Decimal::ZERO {
        Direction::Down
    } else {
        Direction::Flat
    };

    MoMComparison {
        previous_total,
        current_total,
        delta,
        pct_change: percent(delta, previous_total),
        direction,
    }
}

/// Строит помесячные ряды в порядке входной последовательности.
///
/// Хронологический порядок обеспечивает вызывающий код.
pub fn build_trend<'a, I>(months: I, revenue: &RevenueColumns) -> TrendSeries
where
    I: IntoIterator<Item = (&'a str, &'a MonthTable)>,
{
    let mut trend = TrendSeries::default();
    for (label, table) in months {
        let kpis = compute_snapshot(table, revenue);
        trend.months.push(label.to_string());
        trend.total_revenue.push(kpis.total_revenue);
        trend.data_share_pct.push(kpis.data_share_pct);
        trend.zero_sites.push(kpis.zero_revenue_sites);
    }
    trend
}
