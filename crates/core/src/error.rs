use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid time range: {0}")]
    InvalidTimeRange(String),
    #[error("invalid metric: {0}")]
    InvalidMetric(String),
    #[error("invalid keyword pattern: {0}")]
    InvalidKeywordPattern(#[from] regex::Error),
}
