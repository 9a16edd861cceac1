//! RFM scoring stage — recency / frequency / monetary customer
//! segmentation.
//!
//! This stage:
//!   1. Folds the working set into per-customer metrics
//!   2. Maps each metric to a 1–5 sub-score by fixed thresholds
//!   3. Maps the sub-score sum (3–15) to a discrete segment
//!   4. Derives the segment breakdown for the snapshot
//!
//! Customers absent from the working set produce no record.

use crate::{group::GroupMap, store::Transaction, types::round_cents};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    Champions,
    Loyal,
    Potential,
    #[serde(rename = "At Risk")]
    AtRisk,
    Lost,
}

impl Segment {
    /// Fixed rank order, best first. Used for deterministic breakdown
    /// emission.
    pub const ALL: [Segment; 5] = [
        Segment::Champions,
        Segment::Loyal,
        Segment::Potential,
        Segment::AtRisk,
        Segment::Lost,
    ];

    /// Map a sub-score sum (3–15) to a segment. Thresholds are
    /// inclusive lower bounds evaluated top-down.
    pub fn from_total(total: u8) -> Self {
        match total {
            t if t >= 13 => Segment::Champions,
            t if t >= 11 => Segment::Loyal,
            t if t >= 9 => Segment::Potential,
            t if t >= 7 => Segment::AtRisk,
            _ => Segment::Lost,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Segment::Champions => "Champions",
            Segment::Loyal => "Loyal",
            Segment::Potential => "Potential",
            Segment::AtRisk => "At Risk",
            Segment::Lost => "Lost",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub customer_id:     String,
    /// Whole days between the reference instant and the customer's
    /// latest transaction in the working set.
    pub recency_days:    i64,
    pub frequency:       u64,
    /// Sum of transaction totals, rounded to cents.
    pub monetary:        f64,
    pub recency_score:   u8,
    pub frequency_score: u8,
    pub monetary_score:  u8,
    pub segment:         Segment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentBreakdown {
    pub segment:    Segment,
    pub count:      u64,
    /// Rounded share of scored customers.
    pub percentage: i64,
}

// ── Scoring ──────────────────────────────────────────────────────────────────

struct RfmAcc {
    latest:    DateTime<Utc>,
    frequency: u64,
    monetary:  f64,
}

/// One record per distinct customer present in the working set, in
/// first-seen order.
pub fn score_customers(
    working: &[&Transaction],
    reference: DateTime<Utc>,
) -> Vec<RfmRecord> {
    let mut groups: GroupMap<String, RfmAcc> = GroupMap::new();

    for transaction in working {
        let acc = groups.entry_or_insert_with(&transaction.customer_id, || RfmAcc {
            latest:    transaction.timestamp,
            frequency: 0,
            monetary:  0.0,
        });
        if transaction.timestamp > acc.latest {
            acc.latest = transaction.timestamp;
        }
        acc.frequency += 1;
        acc.monetary += transaction.total;
    }

    groups
        .into_groups()
        .into_iter()
        .map(|(customer_id, acc)| {
            let recency_days = (reference - acc.latest).num_days();
            let recency_score = score_recency(recency_days);
            let frequency_score = score_frequency(acc.frequency);
            let monetary_score = score_monetary(acc.monetary);
            let total = recency_score + frequency_score + monetary_score;
            RfmRecord {
                customer_id,
                recency_days,
                frequency: acc.frequency,
                monetary: round_cents(acc.monetary),
                recency_score,
                frequency_score,
                monetary_score,
                segment: Segment::from_total(total),
            }
        })
        .collect()
}

fn score_recency(days: i64) -> u8 {
    match days {
        d if d < 30 => 5,
        d if d < 90 => 4,
        d if d < 180 => 3,
        d if d < 365 => 2,
        _ => 1,
    }
}

fn score_frequency(count: u64) -> u8 {
    match count {
        c if c > 10 => 5,
        c if c > 5 => 4,
        c if c > 3 => 3,
        c if c > 1 => 2,
        _ => 1,
    }
}

fn score_monetary(sum: f64) -> u8 {
    match sum {
        s if s > 1000.0 => 5,
        s if s > 500.0 => 4,
        s if s > 250.0 => 3,
        s if s > 100.0 => 2,
        _ => 1,
    }
}

/// Count and rounded share per segment, in fixed rank order. Segments
/// with no scored customers are omitted.
pub fn segment_breakdown(records: &[RfmRecord]) -> Vec<SegmentBreakdown> {
    if records.is_empty() {
        return Vec::new();
    }
    let total = records.len() as f64;

    Segment::ALL
        .iter()
        .filter_map(|&segment| {
            let count = records.iter().filter(|r| r.segment == segment).count() as u64;
            if count == 0 {
                return None;
            }
            Some(SegmentBreakdown {
                segment,
                count,
                percentage: (count as f64 / total * 100.0).round() as i64,
            })
        })
        .collect()
}
