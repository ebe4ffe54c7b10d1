//! CLI: читает книгу с помесячными листами и выводит сводку для совета директоров.

use std::env;
use std::path::PathBuf;

use site_revenue_kpi::{Config, RawWorkbook, ReportBuilder, format_currency, format_pct};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let path = env::args()
        .nth(1)
        .map_or_else(|| config.workbook.clone(), PathBuf::from);

    let workbook = RawWorkbook::open(&path)?;
    let report = ReportBuilder::new(&workbook)
        .aux_sheet(config.aux_sheet.as_str())
        .build()?;
    let kpis = &report.latest;

    println!("{}", config.title);
    println!("Reporting month: {} ({} months loaded)", report.latest_label, report.months.len());
    println!(
        "Total revenue: {}, average per site: {}",
        format_currency(kpis.total_revenue),
        format_currency(kpis.avg_revenue)
    );
    println!(
        "Mix: voice {}, sms {}, data {} (data share {})",
        format_currency(kpis.revenue_mix.voice),
        format_currency(kpis.revenue_mix.sms),
        format_currency(kpis.revenue_mix.data),
        format_pct(kpis.data_share_pct)
    );
    println!(
        "Top site: {} ({})",
        kpis.top_site,
        format_currency(kpis.top_site_value)
    );
    println!(
        "Top 10 concentration: {}",
        format_pct(
            kpis.concentration_ratio
                .saturating_mul(rust_decimal::Decimal::ONE_HUNDRED),
        )
    );
    if kpis.zero_revenue_sites > 0 {
        println!(
            "Zero revenue sites ({}): {}",
            kpis.zero_revenue_sites,
            kpis.zero_revenue_locations.join(", ")
        );
    }
    if let (Some(mom), Some(label)) = (&report.mom, &report.mom_label) {
        println!(
            "MoM {label}: {} ({}, {})",
            format_currency(mom.delta),
            format_pct(mom.pct_change),
            mom.direction
        );
    }
    if let Some(achievement) = report.target_achievement() {
        println!("Target achievement: {}", format_pct(achievement));
    }
    if let Some(aux) = &report.auxiliary {
        if let Some(control) = aux.control_total {
            println!("Control total: {}", format_currency(control));
        }
        for (label, value) in &aux.counts {
            println!("{}: {}", label.as_str(), value.normalize());
        }
        for note in &aux.notes {
            println!("Note: {note}");
        }
    }
    Ok(())
}
