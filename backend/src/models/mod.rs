//! Core data model: dates, counts, region identity and per-region series.

pub mod count;
pub mod date;
pub mod metric;
pub mod region;
pub mod series;

pub use count::{Count, InvalidCountPolicy};
pub use date::{parse_action_date, parse_series_date};
pub use metric::{Metric, ScaleMode};
pub use region::{display_name, RegionKey};
pub use series::{DailyRecord, RegionSeries};
