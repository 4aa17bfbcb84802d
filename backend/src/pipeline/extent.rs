//! Axis extents over the visible regions.
//!
//! Everything here is recomputed from the current visible set on each call;
//! nothing is cached.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::{Metric, RegionSeries};

/// `[min, max]` of a metric, or `Empty` when no visible record has a valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extent {
    #[default]
    Empty,
    Range { min: i64, max: i64 },
}

impl Extent {
    pub fn is_empty(&self) -> bool {
        matches!(self, Extent::Empty)
    }

    pub fn min(&self) -> Option<i64> {
        match self {
            Extent::Empty => None,
            Extent::Range { min, .. } => Some(*min),
        }
    }

    pub fn max(&self) -> Option<i64> {
        match self {
            Extent::Empty => None,
            Extent::Range { max, .. } => Some(*max),
        }
    }

    fn include(self, value: i64) -> Extent {
        match self {
            Extent::Empty => Extent::Range {
                min: value,
                max: value,
            },
            Extent::Range { min, max } => Extent::Range {
                min: min.min(value),
                max: max.max(value),
            },
        }
    }
}

// Serialized as `[min, max]`, or `null` for the empty sentinel.
impl Serialize for Extent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Extent::Empty => serializer.serialize_none(),
            Extent::Range { min, max } => [min, max].serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Extent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<[i64; 2]>::deserialize(deserializer)? {
            None => Extent::Empty,
            Some([min, max]) => Extent::Range { min, max },
        })
    }
}

/// Extent of `metric` across every record of every region. Invalid counts are
/// skipped; an empty visible set gives [`Extent::Empty`].
pub fn get_extent(regions: &[RegionSeries], metric: Metric) -> Extent {
    regions
        .iter()
        .flat_map(|region| region.series.iter())
        .filter_map(|record| record.value(metric).value())
        .fold(Extent::Empty, Extent::include)
}

/// Longest series among `regions`; 0 when there are none.
pub fn get_max_days(regions: &[RegionSeries]) -> usize {
    regions.iter().map(RegionSeries::len).max().unwrap_or(0)
}

/// Largest value of `metric` within the first `max_day` days of each region,
/// floored at 0.
pub fn get_max_value(regions: &[RegionSeries], metric: Metric, max_day: usize) -> i64 {
    regions
        .iter()
        .flat_map(|region| region.series.iter().take(max_day))
        .filter_map(|record| record.value(metric).value())
        .fold(0, i64::max)
}
