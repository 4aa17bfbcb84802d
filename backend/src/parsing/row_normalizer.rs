//! Wide row → ordered per-date counts.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::csv_table::TableRow;
use crate::models::region::{
    LAT_COLUMN, LONG_COLUMN, METADATA_COLUMNS, REGION_COLUMN, SUB_REGION_COLUMN,
};
use crate::models::{parse_series_date, Count, RegionKey};

/// One table row with its date columns parsed and sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub key: RegionKey,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// Ascending by date, one entry per date column.
    pub values: Vec<(NaiveDate, Count)>,
}

impl NormalizedRow {
    pub fn display_name(&self) -> String {
        self.key.display_name()
    }

    /// Count recorded for `date`, if the row has that column.
    pub fn value_at(&self, date: NaiveDate) -> Option<Count> {
        self.values
            .binary_search_by_key(&date, |(d, _)| *d)
            .ok()
            .map(|i| self.values[i].1)
    }
}

/// Why a row could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{0}' is not a M/D/YY date")]
    InvalidDateColumn(String),
}

/// Normalize one row of a wide time-series table.
///
/// `Country/Region`, `Province/State`, `Lat` and `Long` are metadata; every other
/// column must be a `M/D/YY` date. Cells are read with [`Count::parse`], so a
/// malformed cell becomes the invalid count rather than an error. The output is
/// sorted by date whatever the column order; if two headers name the same date
/// the later column wins.
pub fn normalize_row(row: TableRow<'_>) -> Result<NormalizedRow, NormalizeError> {
    let region = row
        .get(REGION_COLUMN)
        .ok_or(NormalizeError::MissingColumn(REGION_COLUMN))?;
    let sub_region = row.get(SUB_REGION_COLUMN).unwrap_or("");

    let mut by_date = BTreeMap::new();
    for (header, cell) in row.cells() {
        if METADATA_COLUMNS.contains(&header) {
            continue;
        }
        let date = parse_series_date(header)
            .ok_or_else(|| NormalizeError::InvalidDateColumn(header.to_string()))?;
        by_date.insert(date, Count::parse(cell));
    }

    Ok(NormalizedRow {
        key: RegionKey::new(region, sub_region),
        lat: row.get(LAT_COLUMN).and_then(parse_coordinate),
        long: row.get(LONG_COLUMN).and_then(parse_coordinate),
        values: by_date.into_iter().collect(),
    })
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
