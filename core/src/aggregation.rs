//! Aggregation stage — four independent grouped reductions over the
//! working set.
//!
//! This stage computes:
//!   1. Monthly trends     (revenue / orders / customers per calendar month)
//!   2. Category performance (line-item revenue, units, profit, margin)
//!   3. Channel performance  (revenue, orders, customers, conversion proxy)
//!   4. Top products         (revenue ranking, first-seen tie-break)
//!
//! Each reduction is one pass. Accumulation stays f64; currency fields
//! round at emission. Observable output order is imposed by an explicit
//! sort — groups themselves are collected in first-seen order.

use crate::{
    error::AnalyticsResult,
    group::GroupMap,
    store::{EntityStore, Transaction},
    types::{round_cents, round_whole},
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Calendar month, formatted `YYYY-MM`.
    pub month:     String,
    pub revenue:   i64,
    pub orders:    u64,
    pub customers: u64,
    /// Average order value, whole currency units.
    pub aov:       i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPerformance {
    pub category: String,
    pub revenue:  i64,
    pub units:    u64,
    pub profit:   i64,
    /// Profit as a rounded percentage of revenue.
    pub margin:   i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPerformance {
    pub channel:         String,
    pub revenue:         i64,
    pub orders:          u64,
    pub customers:       u64,
    /// Orders per distinct customer, 2 decimals.
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: String,
    pub name:       String,
    pub category:   String,
    pub revenue:    f64,
    pub units:      u64,
}

/// The four rollups, bundled for the engine's fan-out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateOutputs {
    pub monthly_trends:       Vec<MonthlyTrend>,
    pub category_performance: Vec<CategoryPerformance>,
    pub channel_performance:  Vec<ChannelPerformance>,
    pub top_products:         Vec<ProductSales>,
}

/// Most recent months retained in the trend series.
pub const TREND_MONTHS: usize = 12;
/// Products retained in the revenue ranking.
pub const TOP_PRODUCT_LIMIT: usize = 10;

// ── Reductions ───────────────────────────────────────────────────────────────

pub fn aggregate(
    working: &[&Transaction],
    store: &EntityStore,
) -> AnalyticsResult<AggregateOutputs> {
    Ok(AggregateOutputs {
        monthly_trends:       monthly_trends(working),
        category_performance: category_performance(working, store)?,
        channel_performance:  channel_performance(working),
        top_products:         top_products(working, store)?,
    })
}

#[derive(Default)]
struct TrendAcc<'a> {
    revenue:   f64,
    orders:    u64,
    customers: HashSet<&'a str>,
}

/// Group transactions by calendar month. Chronological order, most
/// recent TREND_MONTHS retained.
pub fn monthly_trends(working: &[&Transaction]) -> Vec<MonthlyTrend> {
    let mut groups: GroupMap<(i32, u32), TrendAcc> = GroupMap::new();

    for transaction in working {
        let key = (transaction.timestamp.year(), transaction.timestamp.month());
        let acc = groups.entry(&key);
        acc.revenue += transaction.total;
        acc.orders += 1;
        acc.customers.insert(transaction.customer_id.as_str());
    }

    let mut months = groups.into_groups();
    months.sort_by_key(|&(key, _)| key);
    let skip = months.len().saturating_sub(TREND_MONTHS);

    months
        .into_iter()
        .skip(skip)
        .map(|((year, month), acc)| MonthlyTrend {
            month:     format!("{year:04}-{month:02}"),
            revenue:   round_whole(acc.revenue),
            orders:    acc.orders,
            customers: acc.customers.len() as u64,
            aov:       round_whole(acc.revenue / acc.orders as f64),
        })
        .collect()
}

#[derive(Default)]
struct CategoryAcc {
    revenue: f64,
    units:   u64,
    profit:  f64,
}

/// Group line items (not transactions) by product category. Categories
/// with zero revenue have no defined margin and are omitted. Descending
/// by revenue, ties keep first-seen order.
pub fn category_performance(
    working: &[&Transaction],
    store: &EntityStore,
) -> AnalyticsResult<Vec<CategoryPerformance>> {
    let mut groups: GroupMap<String, CategoryAcc> = GroupMap::new();

    for transaction in working {
        for item in &transaction.items {
            let product = store.product(&item.product_id)?;
            let acc = groups.entry(&product.category);
            acc.revenue += product.price * item.quantity as f64;
            acc.units += item.quantity as u64;
            acc.profit += (product.price - product.cost) * item.quantity as f64;
        }
    }

    let mut rows: Vec<(String, CategoryAcc)> = groups
        .into_groups()
        .into_iter()
        .filter(|(_, acc)| acc.revenue > 0.0)
        .collect();
    rows.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));

    Ok(rows
        .into_iter()
        .map(|(category, acc)| CategoryPerformance {
            category,
            revenue: round_whole(acc.revenue),
            units:   acc.units,
            profit:  round_whole(acc.profit),
            margin:  round_whole(acc.profit / acc.revenue * 100.0),
        })
        .collect())
}

#[derive(Default)]
struct ChannelAcc<'a> {
    revenue:   f64,
    orders:    u64,
    customers: HashSet<&'a str>,
}

/// Group transactions by channel. Descending by revenue. The conversion
/// proxy guards the empty-customer case even though a transaction
/// always implies one customer.
pub fn channel_performance(working: &[&Transaction]) -> Vec<ChannelPerformance> {
    let mut groups: GroupMap<String, ChannelAcc> = GroupMap::new();

    for transaction in working {
        let acc = groups.entry(&transaction.channel);
        acc.revenue += transaction.total;
        acc.orders += 1;
        acc.customers.insert(transaction.customer_id.as_str());
    }

    let mut rows = groups.into_groups();
    rows.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));

    rows.into_iter()
        .map(|(channel, acc)| {
            let customers = acc.customers.len() as u64;
            let conversion_rate = if customers > 0 {
                round_cents(acc.orders as f64 / customers as f64)
            } else {
                0.0
            };
            ChannelPerformance {
                channel,
                revenue: round_whole(acc.revenue),
                orders: acc.orders,
                customers,
                conversion_rate,
            }
        })
        .collect()
}

#[derive(Default)]
struct ProductAcc {
    name:     String,
    category: String,
    revenue:  f64,
    units:    u64,
}

/// Group line items by product id and rank by revenue. The sort is
/// stable, so equal-revenue products keep first-seen order.
pub fn top_products(
    working: &[&Transaction],
    store: &EntityStore,
) -> AnalyticsResult<Vec<ProductSales>> {
    let mut groups: GroupMap<String, ProductAcc> = GroupMap::new();

    for transaction in working {
        for item in &transaction.items {
            let product = store.product(&item.product_id)?;
            let acc = groups.entry_or_insert_with(&product.product_id, || ProductAcc {
                name:     product.name.clone(),
                category: product.category.clone(),
                revenue:  0.0,
                units:    0,
            });
            acc.revenue += product.price * item.quantity as f64;
            acc.units += item.quantity as u64;
        }
    }

    let mut rows = groups.into_groups();
    rows.sort_by(|a, b| b.1.revenue.total_cmp(&a.1.revenue));
    rows.truncate(TOP_PRODUCT_LIMIT);

    Ok(rows
        .into_iter()
        .map(|(product_id, acc)| ProductSales {
            product_id,
            name:     acc.name,
            category: acc.category,
            revenue:  round_cents(acc.revenue),
            units:    acc.units,
        })
        .collect())
}
