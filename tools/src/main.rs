//! report-runner: headless analytics runner for ShopPulse.
//!
//! Usage:
//!   report-runner --seed 12345 --range 90d --category Electronics
//!   report-runner --seed 12345 --out report.csv
//!   report-runner --config generator.json --json

use anyhow::{Context, Result};
use shoppulse_core::{
    config::GeneratorConfig,
    engine::AnalyticsEngine,
    export,
    filter::{CategoryFilter, DateRange},
    generator,
    snapshot::AnalyticsSnapshot,
};
use std::env;
use std::fs::File;
use std::io::BufReader;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let range_arg = string_arg(&args, "--range").unwrap_or_else(|| "all".to_string());
    let category_arg = string_arg(&args, "--category").unwrap_or_else(|| "all".to_string());
    let config_path = string_arg(&args, "--config");
    let out_path = string_arg(&args, "--out");
    let json_mode = args.iter().any(|a| a == "--json");

    let config = match &config_path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("open config {path}"))?;
            GeneratorConfig::from_json(BufReader::new(file))?
        }
        None => GeneratorConfig::default(),
    };

    let range: DateRange = range_arg.parse()?;
    let category = CategoryFilter::parse(&category_arg);

    if !json_mode {
        println!("ShopPulse — report-runner");
        println!("  seed:     {seed}");
        println!("  range:    {range_arg}");
        println!("  category: {category_arg}");
        println!();
    }

    let dataset = generator::generate(&config, seed)?;
    let engine = AnalyticsEngine::from_dataset(dataset);
    let snapshot = engine.compute_analytics(range, &category)?;

    if json_mode {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_summary(&snapshot);
    }

    if let Some(path) = out_path {
        let mut file = File::create(&path).with_context(|| format!("create report {path}"))?;
        export::write_report(&snapshot, &mut file)?;
        log::info!("report written to {path}");
        if !json_mode {
            println!();
            println!("Report written to {path}");
        }
    }

    Ok(())
}

fn print_summary(snapshot: &AnalyticsSnapshot) {
    println!("=== ANALYTICS SUMMARY ===");
    println!("  total revenue:    ${}", snapshot.total_revenue);
    println!("  avg order value:  ${}", snapshot.avg_order_value);
    println!("  unique customers: {}", snapshot.unique_customers);
    println!("  total orders:     {}", snapshot.total_orders);

    println!();
    println!("=== MONTHLY TRENDS (last {}) ===", snapshot.monthly_trends.len());
    for row in &snapshot.monthly_trends {
        println!(
            "  {} | Revenue: ${} | Orders: {} | Customers: {} | AOV: ${}",
            row.month, row.revenue, row.orders, row.customers, row.aov
        );
    }

    println!();
    println!("=== CATEGORY PERFORMANCE ===");
    for row in &snapshot.category_performance {
        println!(
            "  {} | Revenue: ${} | Units: {} | Profit: ${} | Margin: {}%",
            row.category, row.revenue, row.units, row.profit, row.margin
        );
    }

    println!();
    println!("=== CHANNEL PERFORMANCE ===");
    for row in &snapshot.channel_performance {
        println!(
            "  {} | Revenue: ${} | Orders: {} | Customers: {} | Conv: {:.2}",
            row.channel, row.revenue, row.orders, row.customers, row.conversion_rate
        );
    }

    println!();
    println!("=== CUSTOMER SEGMENTS ===");
    for row in &snapshot.segment_breakdown {
        println!("  {} | {} customers ({}%)", row.segment, row.count, row.percentage);
    }

    println!();
    println!("=== COHORT RETENTION ===");
    for row in &snapshot.cohorts {
        println!(
            "  {} | m0: {}% m1: {}% m2: {}% m3: {}% m6: {}%",
            row.cohort, row.month0, row.month1, row.month2, row.month3, row.month6
        );
    }

    println!();
    println!("=== TOP {} PRODUCTS ===", snapshot.top_products.len());
    for row in &snapshot.top_products {
        println!(
            "  {} ({}) | Revenue: ${:.2} | Units: {}",
            row.name, row.category, row.revenue, row.units
        );
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg(args: &[String], flag: &str) -> Option<String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].clone())
}
