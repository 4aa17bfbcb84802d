use serde::{Deserialize, Serialize};
use std::fmt;

/// Column holding the country or region name.
pub const REGION_COLUMN: &str = "Country/Region";
/// Column holding the province or state name (may be empty).
pub const SUB_REGION_COLUMN: &str = "Province/State";
pub const LAT_COLUMN: &str = "Lat";
pub const LONG_COLUMN: &str = "Long";

/// Metadata columns of the wide tables; every other column is a date.
pub const METADATA_COLUMNS: [&str; 4] = [REGION_COLUMN, LAT_COLUMN, LONG_COLUMN, SUB_REGION_COLUMN];

/// Composite identity of a table row.
///
/// Joins between tables always go through this key. The display name is derived
/// from it for presentation and selection lookups, but two keys may share a
/// display name, so it is never used to join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionKey {
    /// Raw `Country/Region` value
    pub region: String,
    /// Raw `Province/State` value, kept as the literal empty string when blank
    pub sub_region: String,
}

impl RegionKey {
    pub fn new(region: impl Into<String>, sub_region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            sub_region: sub_region.into(),
        }
    }

    /// `region` alone when there is no distinct sub-region, otherwise
    /// `"{sub_region}, {region}"`.
    pub fn display_name(&self) -> String {
        display_name(&self.region, &self.sub_region)
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Derive the display name of a region from its raw column values.
pub fn display_name(region: &str, sub_region: &str) -> String {
    if sub_region.is_empty() || sub_region == region {
        region.to_string()
    } else {
        format!("{}, {}", sub_region, region)
    }
}
