use calamine::{CellErrorType, Data, ExcelDateTime, ExcelDateTimeType};
use rust_decimal_macros::dec;
use site_revenue_kpi::{
    Cell, RawGrid, ReportError, RevenueColumns, TOTAL_COLUMN, coerce_money, format_currency,
    format_pct,
};

fn text(s: &str) -> Cell {
    Cell::from(s)
}

fn ingest(rows: Vec<Vec<Cell>>) -> Result<site_revenue_kpi::MonthTable, ReportError> {
    RawGrid::new(rows).ingest_month("mar_24", &RevenueColumns::default())
}

#[test]
fn strips_footer_rows() {
    let table = ingest(vec![
        vec![text("Location"), text("Total")],
        vec![text("Alpha"), Cell::from(100)],
        vec![text("Beta"), Cell::from(50)],
        vec![text("Grand Total"), Cell::from(150)],
    ])
    .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.locations(), vec!["Alpha", "Beta"]);
    assert_eq!(table.column_sum(TOTAL_COLUMN), dec!(150));
}

#[test]
fn total_matching_respects_word_boundaries() {
    let table = ingest(vec![
        vec![text("Location"), text("Total")],
        vec![text("Totally Wired Hub"), Cell::from(10)],
        vec![text("TOTALS"), Cell::from(10)],
        vec![text("Site total"), Cell::from(20)],
        vec![text("sub-total"), Cell::from(20)],
    ])
    .unwrap();

    assert_eq!(table.locations(), vec!["Totally Wired Hub", "TOTALS"]);
}

#[test]
fn detects_header_below_title_rows() {
    let table = ingest(vec![
        vec![text("Monthly Revenue Report")],
        vec![],
        vec![text("Prepared by finance"), text("")],
        vec![text(" Location "), text("Region"), text("TOTAL")],
        vec![text("  Alpha "), text("North"), text("1,200")],
    ])
    .unwrap();

    assert_eq!(table.columns[..3], ["Location", "Region", "TOTAL"]);
    assert_eq!(table.locations(), vec!["Alpha"]);
    assert_eq!(table.column_sum("Total"), dec!(1200));
    assert_eq!(table.rows[0][1], text("North"));
}

#[test]
fn header_outside_search_depth_is_a_schema_error() {
    let mut rows: Vec<Vec<Cell>> = (0..5).map(|i| vec![text(&format!("title {i}"))]).collect();
    rows.push(vec![text("Location"), text("Total")]);

    let err = ingest(rows).unwrap_err();
    match err {
        ReportError::Schema { sheet, column } => {
            assert_eq!(sheet, "mar_24");
            assert_eq!(column, "Location");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schema_error_names_missing_total() {
    let err = ingest(vec![
        vec![text("Location"), text("Revenue")],
        vec![text("Alpha"), Cell::from(1)],
    ])
    .unwrap_err();

    assert!(matches!(err, ReportError::Schema { column: "Total", .. }));
    assert!(err.to_string().contains("mar_24"));
}

#[test]
fn missing_revenue_columns_are_zero_filled() {
    let columns = RevenueColumns::default();
    let table = ingest(vec![
        vec![text("Location"), text("Mobile Data Revenue"), text("Total")],
        vec![text("Alpha"), Cell::from(30), Cell::from(100)],
    ])
    .unwrap();

    let expected_width = 3 + columns.components().count() - 1;
    assert_eq!(table.columns.len(), expected_width);
    for label in columns.voice.iter().chain(&columns.sms) {
        assert_eq!(table.money_column(label), Some(vec![dec!(0)]), "{label}");
    }
    assert_eq!(table.column_sum("Mobile Data Revenue"), dec!(30));
}

#[test]
fn revenue_cells_are_coerced_to_numbers() {
    let table = ingest(vec![
        vec![text("Location"), text("Fixed Calls Revenue"), text("Total")],
        vec![text("Alpha"), text("n/a"), text("$2,500.50")],
        vec![text("Beta"), Cell::Empty, text("abc")],
        vec![text("Gamma"), Cell::from(-5), Cell::from(-5)],
    ])
    .unwrap();

    assert_eq!(
        table.money_column("Total"),
        Some(vec![dec!(2500.50), dec!(0), dec!(-5)])
    );
    assert_eq!(
        table.money_column("Fixed Calls Revenue"),
        Some(vec![dec!(0), dec!(0), dec!(-5)])
    );
    assert!(table.rows.iter().all(|row| matches!(row[2], Cell::Number(_))));
}

#[test]
fn blank_locations_are_removed_and_order_kept() {
    let table = ingest(vec![
        vec![text("Location"), text("Total")],
        vec![text("Zeta"), Cell::from(1)],
        vec![text("   "), Cell::from(2)],
        vec![Cell::Empty, Cell::from(3)],
        vec![Cell::from(101), Cell::from(4)],
        vec![text("Alpha"), Cell::from(5)],
    ])
    .unwrap();

    assert_eq!(table.locations(), vec!["Zeta", "101", "Alpha"]);
}

#[test]
fn reingesting_canonical_table_is_a_no_op() {
    let table = ingest(vec![
        vec![text("Report"), text("")],
        vec![text("Location"), text("Total"), text("Notes")],
        vec![text("Alpha"), Cell::from(100), text("ok")],
        vec![text("Beta"), text("50"), Cell::Empty],
        vec![text("Total"), Cell::from(150)],
    ])
    .unwrap();

    let again = table
        .to_grid()
        .ingest_month("mar_24", &RevenueColumns::default())
        .unwrap();
    assert_eq!(again, table);
}

#[test]
fn coerces_text_numbers() {
    assert_eq!(coerce_money(&text(" 1 234 ")), Some(dec!(1234)));
    assert_eq!(coerce_money(&text("+15.5")), Some(dec!(15.5)));
    assert_eq!(coerce_money(&text("1e3")), Some(dec!(1000)));
    assert_eq!(coerce_money(&text("-")), None);
    assert_eq!(coerce_money(&Cell::Empty), None);
    assert_eq!(coerce_money(&Cell::from(f64::NAN)), None);
}

#[test]
fn formats_currency_and_percent() {
    assert_eq!(format_currency(dec!(1234567.891)), "$1,234,567.89");
    assert_eq!(format_currency(dec!(-10)), "-$10.00");
    assert_eq!(format_currency(dec!(0)), "$0.00");
    assert_eq!(format_pct(dec!(12.345)), "12.3%");
    assert_eq!(format_pct(dec!(10)), "10.0%");
}

#[test]
fn workbook_cells_map_to_typed_cells() {
    assert_eq!(Cell::from(&Data::Int(42)), Cell::from(42));
    assert_eq!(Cell::from(&Data::Float(1.5)), Cell::from(dec!(1.5)));
    assert_eq!(Cell::from(&Data::String(" Alpha ".into())), text(" Alpha "));
    assert_eq!(Cell::from(&Data::Bool(true)), text("true"));
    assert_eq!(Cell::from(&Data::Bool(false)), text("false"));

    let serial = ExcelDateTime::new(45000.5, ExcelDateTimeType::DateTime, false);
    assert_eq!(Cell::from(&Data::DateTime(serial)), Cell::from(dec!(45000.5)));
    assert_eq!(
        Cell::from(&Data::DateTimeIso("2024-03-01".into())),
        text("2024-03-01")
    );

    assert_eq!(Cell::from(&Data::Float(f64::NAN)), Cell::Empty);
    assert_eq!(Cell::from(&Data::Float(f64::INFINITY)), Cell::Empty);
    assert_eq!(Cell::from(&Data::Error(CellErrorType::Div0)), Cell::Empty);
    assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
}

#[test]
fn currency_text_is_parsed_as_number() {
    assert_eq!(coerce_money(&text("$2,500.50")), Some(dec!(2500.50)));
}
