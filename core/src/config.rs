//! Generator configuration — vocabularies, counts, and the time window
//! for the synthetic upstream dataset.
//!
//! Defaults mirror the production data contract; overrides load from a
//! JSON file and are validated before any generation runs.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub product_count:        usize,
    pub customer_count:       usize,
    /// Transaction draws. Draws landing before the drawn customer's join
    /// date are skipped, so the emitted count is lower.
    pub transaction_attempts: usize,

    pub categories: Vec<String>,
    pub channels:   Vec<String>,
    pub campaigns:  Vec<String>,
    /// Probability that a transaction carries a campaign label.
    pub campaign_rate: f64,

    pub price_min:       f64,
    pub price_span:      f64,
    pub cost_ratio_min:  f64,
    pub cost_ratio_span: f64,

    /// First month customers can join; joins spread over the span below.
    pub join_epoch:       DateTime<Utc>,
    pub join_month_span:  u32,
    /// Transaction timestamps are drawn uniformly from this window.
    pub window_start:     DateTime<Utc>,
    pub window_end:       DateTime<Utc>,
    /// The "now" all date ranges and recency measure against.
    pub reference_instant: DateTime<Utc>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            product_count:        100,
            customer_count:       10_000,
            transaction_attempts: 50_000,
            categories: vec![
                "Electronics".into(),
                "Clothing".into(),
                "Home & Garden".into(),
                "Sports".into(),
                "Books".into(),
                "Beauty".into(),
                "Toys".into(),
            ],
            channels: vec![
                "Organic Search".into(),
                "Paid Search".into(),
                "Social Media".into(),
                "Email".into(),
                "Direct".into(),
                "Referral".into(),
            ],
            campaigns: vec![
                "Summer Sale".into(),
                "Black Friday".into(),
                "New Year".into(),
                "Spring Collection".into(),
                "Flash Deal".into(),
            ],
            campaign_rate:   0.7,
            price_min:       20.0,
            price_span:      500.0,
            cost_ratio_min:  0.4,
            cost_ratio_span: 0.3,
            join_epoch:      Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            join_month_span: 24,
            window_start:    Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            window_end:      Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
            reference_instant: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
        }
    }
}

impl GeneratorConfig {
    /// Load a config from a JSON reader. Missing fields take defaults.
    pub fn from_json(reader: impl Read) -> AnalyticsResult<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        let fail = |reason: &str| {
            Err(AnalyticsError::InvalidConfig {
                reason: reason.to_string(),
            })
        };

        if self.product_count == 0 {
            return fail("product_count must be at least 1");
        }
        if self.customer_count == 0 {
            return fail("customer_count must be at least 1");
        }
        if self.categories.is_empty() {
            return fail("categories must not be empty");
        }
        if self.channels.is_empty() {
            return fail("channels must not be empty");
        }
        if self.campaign_rate > 0.0 && self.campaigns.is_empty() {
            return fail("campaigns must not be empty when campaign_rate > 0");
        }
        if !(0.0..=1.0).contains(&self.campaign_rate) {
            return fail("campaign_rate must be within [0, 1]");
        }
        if self.price_min < 0.0 || self.price_span < 0.0 {
            return fail("price bounds must be non-negative");
        }
        if self.cost_ratio_min < 0.0 || self.cost_ratio_span < 0.0 {
            return fail("cost ratio bounds must be non-negative");
        }
        if self.join_month_span == 0 {
            return fail("join_month_span must be at least 1");
        }
        if self.window_end <= self.window_start {
            return fail("window_end must be after window_start");
        }
        // CSV rows are emitted unquoted, so vocabulary values must stay
        // comma-free.
        for value in self
            .categories
            .iter()
            .chain(self.channels.iter())
            .chain(self.campaigns.iter())
        {
            if value.contains(',') {
                return fail("vocabulary values must not contain commas");
            }
        }
        Ok(())
    }
}
