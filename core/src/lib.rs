//! ShopPulse core — the commerce analytics aggregation engine.
//!
//! PIPELINE (fixed, documented, never reordered):
//!   1. Entity store    (immutable products / customers / transactions)
//!   2. Filter stage    (date range + category → working set)
//!   3. Derived stages  (aggregation, RFM scoring, cohort retention —
//!                       independent, run as parallel scoped threads)
//!   4. Assembly        (one immutable snapshot per filter configuration)
//!
//! RULES:
//!   - Entities are immutable once constructed; stages never mutate input.
//!   - Every derived structure is recomputed from the working set.
//!   - Same inputs produce a byte-identical snapshot.
//!   - All randomness (generator only) flows through the RngBank.

pub mod aggregation;
pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod filter;
pub mod generator;
pub mod group;
pub mod rfm;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
