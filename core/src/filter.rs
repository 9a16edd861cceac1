//! Filter stage — date-range and category predicates over the
//! transaction log, producing the working set all derived stages
//! consume.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    store::{EntityStore, Transaction},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRange {
    All,
    Last30Days,
    Last90Days,
    LastYear,
}

impl DateRange {
    /// The cutoff instant relative to the reference "now".
    /// Transactions strictly before the cutoff are excluded.
    pub fn cutoff(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            DateRange::All => None,
            DateRange::Last30Days => Some(reference - Duration::days(30)),
            DateRange::Last90Days => Some(reference - Duration::days(90)),
            DateRange::LastYear => Some(reference - Duration::days(365)),
        }
    }
}

impl FromStr for DateRange {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(DateRange::All),
            "30d" => Ok(DateRange::Last30Days),
            "90d" => Ok(DateRange::Last90Days),
            "1y" => Ok(DateRange::LastYear),
            _ => Err(AnalyticsError::UnknownDateRange {
                value: value.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// "all" is the wildcard; anything else names a single category.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }
}

/// Apply both predicates, preserving input order. A transaction passes
/// the category filter if any of its line items resolves to a product
/// in that category. An empty result is valid and propagates as
/// "no data" downstream.
pub fn filter_transactions<'a>(
    store: &'a EntityStore,
    range: DateRange,
    category: &CategoryFilter,
    reference: DateTime<Utc>,
) -> AnalyticsResult<Vec<&'a Transaction>> {
    let cutoff = range.cutoff(reference);
    let mut working = Vec::new();

    for transaction in store.transactions() {
        if let Some(cutoff) = cutoff {
            if transaction.timestamp < cutoff {
                continue;
            }
        }
        if let CategoryFilter::Only(name) = category {
            let mut matched = false;
            for item in &transaction.items {
                if store.product(&item.product_id)?.category == *name {
                    matched = true;
                    break;
                }
            }
            if !matched {
                continue;
            }
        }
        working.push(transaction);
    }

    log::debug!(
        "filter: {} of {} transactions pass (range={range:?}, category={category:?})",
        working.len(),
        store.transactions().len(),
    );
    Ok(working)
}
