pub mod metric;
pub mod time_range;

pub use metric::Metric;
pub use time_range::TimeRange;
