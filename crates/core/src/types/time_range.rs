use std::fmt;

use serde::Serialize;

use crate::error::CoreError;

pub const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "14d")]
    Fortnight,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "all")]
    All,
}

impl TimeRange {
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "7d" => Ok(TimeRange::Week),
            "14d" => Ok(TimeRange::Fortnight),
            "30d" => Ok(TimeRange::Month),
            "all" => Ok(TimeRange::All),
            other => Err(CoreError::InvalidTimeRange(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Week => "7d",
            TimeRange::Fortnight => "14d",
            TimeRange::Month => "30d",
            TimeRange::All => "all",
        }
    }

    pub fn days(self) -> Option<i64> {
        match self {
            TimeRange::Week => Some(7),
            TimeRange::Fortnight => Some(14),
            TimeRange::Month => Some(30),
            TimeRange::All => None,
        }
    }

    pub fn cutoff(self, now_secs: i64) -> Option<i64> {
        self.days()
            .map(|days| now_secs.saturating_sub(days * SECONDS_PER_DAY))
    }

    pub fn contains(self, created_utc: i64, now_secs: i64) -> bool {
        self.cutoff(now_secs)
            .is_none_or(|cutoff| created_utc >= cutoff)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_760_000_000;

    #[test]
    fn parse_known_ranges() {
        assert_eq!(TimeRange::parse("7d").unwrap(), TimeRange::Week);
        assert_eq!(TimeRange::parse(" 14D ").unwrap(), TimeRange::Fortnight);
        assert_eq!(TimeRange::parse("30d").unwrap(), TimeRange::Month);
        assert_eq!(TimeRange::parse("all").unwrap(), TimeRange::All);
    }

    #[test]
    fn reject_unknown_range() {
        assert!(TimeRange::parse("90d").is_err());
        assert!(TimeRange::parse("").is_err());
    }

    #[test]
    fn week_window_boundary() {
        let range = TimeRange::Week;
        assert!(!range.contains(NOW - 8 * SECONDS_PER_DAY, NOW));
        assert!(range.contains(NOW - 6 * SECONDS_PER_DAY, NOW));
        assert!(range.contains(NOW - 7 * SECONDS_PER_DAY, NOW));
    }

    #[test]
    fn all_range_has_no_cutoff() {
        assert_eq!(TimeRange::All.cutoff(NOW), None);
        assert!(TimeRange::All.contains(0, NOW));
    }

    #[test]
    fn serializes_as_short_key() {
        let json = serde_json::to_string(&TimeRange::Fortnight).unwrap();
        assert_eq!(json, "\"14d\"");
    }
}
