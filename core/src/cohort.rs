//! Cohort stage — retention by first-purchase month.
//!
//! Customers are grouped by the calendar month of their first purchase
//! within the working set, then tracked across fixed month offsets
//! {0, 1, 2, 3, 6}. Retention at offset m is the share of the cohort's
//! base (offset-0) customers still transacting in bucket m.
//!
//! Elapsed months use a flat 30-day divisor, not calendar arithmetic.
//! That under/overstates bucket boundaries near month edges, but it is
//! the upstream behavior contract and is preserved exactly.

use crate::{group::GroupMap, store::Transaction};
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortRow {
    /// First-purchase month, formatted `YYYY-MM`.
    pub cohort: String,
    pub month0: i64,
    pub month1: i64,
    pub month2: i64,
    pub month3: i64,
    pub month6: i64,
}

/// Cohorts retained, in first-encounter order over the working set.
/// Callers wanting chronological order sort by the cohort key.
pub const COHORT_LIMIT: usize = 12;

// ── Computation ──────────────────────────────────────────────────────────────

/// Retention rows for the first COHORT_LIMIT cohorts encountered.
pub fn cohort_retention(working: &[&Transaction]) -> Vec<CohortRow> {
    // Pass 1: each customer's first purchase is the minimum timestamp
    // across the working set, not the first one encountered.
    let mut first_purchase: HashMap<&str, DateTime<Utc>> = HashMap::new();
    for transaction in working {
        first_purchase
            .entry(transaction.customer_id.as_str())
            .and_modify(|first| {
                if transaction.timestamp < *first {
                    *first = transaction.timestamp;
                }
            })
            .or_insert(transaction.timestamp);
    }

    // Pass 2: bucket distinct customers per cohort per elapsed month.
    let mut cohorts: GroupMap<(i32, u32), HashMap<i64, HashSet<&str>>> = GroupMap::new();
    for transaction in working {
        let customer_id = transaction.customer_id.as_str();
        let first = first_purchase[customer_id];
        let key = (first.year(), first.month());
        // Flat 30-day months — behavior contract, see module docs.
        let elapsed = (transaction.timestamp - first).num_days() / 30;
        cohorts
            .entry(&key)
            .entry(elapsed)
            .or_default()
            .insert(customer_id);
    }

    let mut groups = cohorts.into_groups();
    groups.truncate(COHORT_LIMIT);

    groups
        .into_iter()
        .map(|((year, month), buckets)| {
            let base = buckets.get(&0).map(|set| set.len()).unwrap_or(0);
            CohortRow {
                cohort: format!("{year:04}-{month:02}"),
                month0: 100,
                month1: retention(&buckets, 1, base),
                month2: retention(&buckets, 2, base),
                month3: retention(&buckets, 3, base),
                month6: retention(&buckets, 6, base),
            }
        })
        .collect()
}

fn retention(buckets: &HashMap<i64, HashSet<&str>>, offset: i64, base: usize) -> i64 {
    if base == 0 {
        return 0;
    }
    match buckets.get(&offset) {
        Some(set) => (set.len() as f64 / base as f64 * 100.0).round() as i64,
        None => 0,
    }
}
