use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Unknown product: {product_id}")]
    UnknownProduct { product_id: String },

    #[error("Unknown customer: {customer_id}")]
    UnknownCustomer { customer_id: String },

    #[error("Unknown date range '{value}' (expected all|30d|90d|1y)")]
    UnknownDateRange { value: String },

    #[error("Invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
