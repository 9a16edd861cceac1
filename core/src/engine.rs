//! The analytics engine — filter, fan out, join, assemble.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Filter stage       (date range + category → working set)
//!   2. Aggregation stage  ┐
//!   3. RFM scoring stage  ├ independent, parallel scoped threads
//!   4. Cohort stage       ┘
//!   5. Result assembly    (after the join)
//!
//! RULES:
//!   - Stages read the shared immutable working set; nothing is locked
//!     because nothing is mutated.
//!   - compute_analytics is a pure function of (entities, reference
//!     instant, filter parameters): same inputs, byte-identical snapshot.
//!   - An empty working set is a valid terminal state, never an error.

use crate::{
    aggregation,
    cohort,
    error::AnalyticsResult,
    filter::{self, CategoryFilter, DateRange},
    generator::Dataset,
    rfm,
    snapshot::AnalyticsSnapshot,
    store::EntityStore,
    types::round_whole,
};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::thread;

pub struct AnalyticsEngine {
    store:             EntityStore,
    reference_instant: DateTime<Utc>,
}

impl AnalyticsEngine {
    pub fn new(store: EntityStore, reference_instant: DateTime<Utc>) -> Self {
        Self {
            store,
            reference_instant,
        }
    }

    /// Wire an engine directly from a generated dataset.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let reference = dataset.reference_instant;
        let store = EntityStore::new(dataset.products, dataset.customers, dataset.transactions);
        Self::new(store, reference)
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn reference_instant(&self) -> DateTime<Utc> {
        self.reference_instant
    }

    /// Compute the full analytics snapshot for one filter configuration.
    pub fn compute_analytics(
        &self,
        range: DateRange,
        category: &CategoryFilter,
    ) -> AnalyticsResult<AnalyticsSnapshot> {
        let working =
            filter::filter_transactions(&self.store, range, category, self.reference_instant)?;
        if working.is_empty() {
            log::debug!("analytics: empty working set (range={range:?})");
            return Ok(AnalyticsSnapshot::empty());
        }

        let slice = working.as_slice();
        let store = &self.store;
        let reference = self.reference_instant;

        // The three derived stages are mutually independent given the
        // working set; join before assembly.
        let (aggregates, rfm_records, cohorts) = thread::scope(|scope| {
            let aggregates = scope.spawn(move || aggregation::aggregate(slice, store));
            let rfm_records = scope.spawn(move || rfm::score_customers(slice, reference));
            let cohorts = scope.spawn(move || cohort::cohort_retention(slice));
            (join(aggregates), join(rfm_records), join(cohorts))
        });
        let aggregates = aggregates?;

        let total_raw: f64 = working.iter().map(|t| t.total).sum();
        let total_orders = working.len() as u64;
        let unique_customers = working
            .iter()
            .map(|t| t.customer_id.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;
        let segment_breakdown = rfm::segment_breakdown(&rfm_records);

        log::info!(
            "analytics: {} orders, {} customers, {} trend months (range={range:?})",
            total_orders,
            unique_customers,
            aggregates.monthly_trends.len(),
        );

        Ok(AnalyticsSnapshot {
            total_revenue: round_whole(total_raw),
            avg_order_value: round_whole(total_raw / total_orders as f64),
            unique_customers,
            total_orders,
            monthly_trends: aggregates.monthly_trends,
            category_performance: aggregates.category_performance,
            channel_performance: aggregates.channel_performance,
            top_products: aggregates.top_products,
            rfm_records,
            segment_breakdown,
            cohorts,
        })
    }
}

/// Join a scoped stage thread, forwarding any panic to the caller.
fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
