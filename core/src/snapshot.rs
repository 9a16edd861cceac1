//! Snapshot — the complete, immutable bundle of derived analytics for
//! one filter configuration.
//!
//! A snapshot is freshly assembled per request and never mutated.
//! Serialization exists so two snapshots can be compared byte-for-byte;
//! persisting them is out of scope.

use crate::{
    aggregation::{CategoryPerformance, ChannelPerformance, MonthlyTrend, ProductSales},
    cohort::CohortRow,
    rfm::{RfmRecord, SegmentBreakdown},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    /// Sum of filtered transaction totals, whole currency units.
    pub total_revenue:   i64,
    pub avg_order_value: i64,
    pub unique_customers: u64,
    pub total_orders:    u64,

    pub monthly_trends:       Vec<MonthlyTrend>,
    pub category_performance: Vec<CategoryPerformance>,
    pub channel_performance:  Vec<ChannelPerformance>,
    pub top_products:         Vec<ProductSales>,
    pub rfm_records:          Vec<RfmRecord>,
    pub segment_breakdown:    Vec<SegmentBreakdown>,
    pub cohorts:              Vec<CohortRow>,
}

impl AnalyticsSnapshot {
    /// The zero/empty snapshot an empty working set degrades to.
    pub fn empty() -> Self {
        Self::default()
    }
}
