use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use site_revenue_kpi::{
    Cell, Direction, KpiSnapshot, MonthTable, RawGrid, RevenueColumns, build_trend,
    compare_month_over_month, compute_snapshot,
};

fn month(sites: &[(&str, i64)]) -> MonthTable {
    let mut rows = vec![vec![Cell::from("Location"), Cell::from("Total")]];
    rows.extend(
        sites
            .iter()
            .map(|(location, total)| vec![Cell::from(*location), Cell::from(*total)]),
    );
    RawGrid::new(rows)
        .ingest_month("test", &RevenueColumns::default())
        .expect("ingest month")
}

fn snapshot(table: &MonthTable) -> KpiSnapshot {
    compute_snapshot(table, &RevenueColumns::default())
}

#[test]
fn empty_table_gives_zero_snapshot() {
    let kpis = snapshot(&month(&[]));
    assert_eq!(kpis, KpiSnapshot::empty());
    assert_eq!(kpis.top_site, "-");
    assert!(kpis.top_10_sites.is_empty());
}

#[test]
fn table_without_total_gives_zero_snapshot() {
    let table = MonthTable {
        columns: vec!["Location".to_string(), "Mobile Data Revenue".to_string()],
        rows: vec![vec![Cell::from("Alpha"), Cell::from(10)]],
    };
    let kpis = snapshot(&table);
    assert_eq!(kpis, KpiSnapshot::empty());
    assert_eq!(kpis.top_site, "-");
}

#[test]
fn totals_average_and_top_site() {
    let kpis = snapshot(&month(&[("Alpha", 100), ("Beta", 50)]));
    assert_eq!(kpis.total_revenue, dec!(150));
    assert_eq!(kpis.avg_revenue, dec!(75));
    assert_eq!(kpis.top_site, "Alpha");
    assert_eq!(kpis.top_site_value, dec!(100));
    assert_eq!(kpis.concentration_ratio, Decimal::ONE);
}

#[test]
fn revenue_mix_and_data_share() {
    let table = RawGrid::new(vec![
        vec![
            Cell::from("Location"),
            Cell::from("Fixed Calls Revenue"),
            Cell::from("BMobile Calls Revenue"),
            Cell::from("A2P SMS Revenue"),
            Cell::from("Mobile Data Revenue"),
            Cell::from("Total"),
        ],
        vec![
            Cell::from("Alpha"),
            Cell::from(20),
            Cell::from(10),
            Cell::from(10),
            Cell::from(20),
            Cell::from(60),
        ],
        vec![
            Cell::from("Beta"),
            Cell::from("x"),
            Cell::from(20),
            Cell::from(0),
            Cell::from(10),
            Cell::from(40),
        ],
    ])
    .ingest_month("mar_24", &RevenueColumns::default())
    .unwrap();

    let kpis = snapshot(&table);
    assert_eq!(kpis.revenue_mix.voice, dec!(50));
    assert_eq!(kpis.revenue_mix.sms, dec!(10));
    assert_eq!(kpis.revenue_mix.data, dec!(30));
    assert_eq!(kpis.data_share_pct, dec!(30));
}

#[test]
fn data_share_is_zero_when_total_is_zero() {
    let kpis = snapshot(&month(&[("Alpha", 0), ("Beta", 0)]));
    assert_eq!(kpis.total_revenue, Decimal::ZERO);
    assert_eq!(kpis.data_share_pct, Decimal::ZERO);
    assert_eq!(kpis.concentration_ratio, Decimal::ZERO);
    assert_eq!(kpis.top_site, "Alpha");
}

#[test]
fn zero_revenue_sites_follow_row_order() {
    let kpis = snapshot(&month(&[
        ("Delta", 0),
        ("Alpha", 10),
        ("Charlie", 0),
        ("Bravo", -3),
    ]));
    assert_eq!(kpis.zero_revenue_sites, 2);
    assert_eq!(kpis.zero_revenue_locations, vec!["Delta", "Charlie"]);
}

#[test]
fn rankings_are_stable_on_ties() {
    let kpis = snapshot(&month(&[("A", 50), ("B", 100), ("C", 100), ("D", 50)]));
    let top: Vec<&str> = kpis.top_10_sites.iter().map(|s| s.location.as_str()).collect();
    let bottom: Vec<&str> = kpis
        .bottom_10_sites
        .iter()
        .map(|s| s.location.as_str())
        .collect();
    assert_eq!(top, vec!["B", "C", "A", "D"]);
    assert_eq!(bottom, vec!["A", "D", "B", "C"]);
    assert_eq!(kpis.top_site, "B");
}

#[test]
fn concentration_uses_top_ten_only() {
    let sites: Vec<(String, i64)> = (1..=12).map(|i| (format!("site {i}"), i)).collect();
    let refs: Vec<(&str, i64)> = sites.iter().map(|(n, v)| (n.as_str(), *v)).collect();
    let kpis = snapshot(&month(&refs));

    assert_eq!(kpis.top_10_sites.len(), 10);
    assert_eq!(kpis.bottom_10_sites.len(), 10);
    assert_eq!(kpis.top_10_sites[0].total, dec!(12));
    assert_eq!(kpis.bottom_10_sites[0].total, dec!(1));
    assert_eq!(kpis.concentration_ratio, dec!(75) / dec!(78));
    assert!(kpis.concentration_ratio > Decimal::ZERO);
    assert!(kpis.concentration_ratio <= Decimal::ONE);
}

#[test]
fn month_over_month_growth() {
    let previous = month(&[("Alpha", 600), ("Beta", 400)]);
    let current = month(&[("Alpha", 700), ("Beta", 400)]);
    let mom = compare_month_over_month(&previous, &current);

    assert_eq!(mom.previous_total, dec!(1000));
    assert_eq!(mom.current_total, dec!(1100));
    assert_eq!(mom.delta, dec!(100));
    assert_eq!(mom.pct_change, dec!(10));
    assert_eq!(mom.direction, Direction::Up);
    assert_eq!(mom.direction.to_string(), "up");
}

#[test]
fn month_over_month_decline_flat_and_zero_base() {
    let down = compare_month_over_month(&month(&[("A", 200)]), &month(&[("A", 150)]));
    assert_eq!(down.delta, dec!(-50));
    assert_eq!(down.pct_change, dec!(-25));
    assert_eq!(down.direction, Direction::Down);

    let flat = compare_month_over_month(&month(&[("A", 10)]), &month(&[("B", 10)]));
    assert_eq!(flat.direction, Direction::Flat);
    assert_eq!(flat.pct_change, Decimal::ZERO);

    let from_zero = compare_month_over_month(&month(&[]), &month(&[("A", 10)]));
    assert_eq!(from_zero.pct_change, Decimal::ZERO);
    assert_eq!(from_zero.direction, Direction::Up);
}

#[test]
fn trend_follows_input_order() {
    let feb = month(&[("A", 10), ("B", 0)]);
    let jan = month(&[("A", 5)]);
    let trend = build_trend(
        [("feb_24", &feb), ("jan_24", &jan)],
        &RevenueColumns::default(),
    );

    assert_eq!(trend.months, vec!["feb_24", "jan_24"]);
    assert_eq!(trend.total_revenue, vec![dec!(10), dec!(5)]);
    assert_eq!(trend.data_share_pct, vec![Decimal::ZERO, Decimal::ZERO]);
    assert_eq!(trend.zero_sites, vec![1, 0]);
}

fn large_month(totals: &[Decimal]) -> MonthTable {
    let mut rows = vec![vec![Cell::from("Location"), Cell::from("Total")]];
    rows.extend(
        totals
            .iter()
            .enumerate()
            .map(|(idx, total)| vec![Cell::from(format!("Site {idx}")), Cell::from(*total)]),
    );
    RawGrid::new(rows)
        .ingest_month("test", &RevenueColumns::default())
        .expect("ingest month")
}

#[test]
fn month_over_month_saturates_on_tiny_base() {
    let previous = large_month(&[Decimal::new(1, 5)]);
    let current = large_month(&[Decimal::from_i128_with_scale(10_i128.pow(22), 0)]);
    let mom = compare_month_over_month(&previous, &current);

    assert_eq!(mom.direction, Direction::Up);
    assert_eq!(mom.pct_change, Decimal::MAX);
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let huge = Decimal::from_i128_with_scale(5 * 10_i128.pow(28), 0);
    let kpis = snapshot(&large_month(&[huge, huge]));

    assert_eq!(kpis.total_revenue, Decimal::MAX);
    assert_eq!(kpis.top_site_value, huge);
    assert_eq!(kpis.concentration_ratio, Decimal::ONE);
    assert_eq!(kpis.data_share_pct, Decimal::ZERO);
}
