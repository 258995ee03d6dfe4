use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Upvotes,
    Comments,
    // No impression data is exposed upstream; ranks like `Upvotes`.
    Impressions,
}

impl Metric {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "upvotes" => Ok(Metric::Upvotes),
            "comments" => Ok(Metric::Comments),
            "impressions" => Ok(Metric::Impressions),
            other => Err(CoreError::InvalidMetric(other.to_string())),
        }
    }
}
