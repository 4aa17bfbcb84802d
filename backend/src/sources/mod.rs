//! Acquisition of the four CSV tables.
//!
//! A [`CsvSource`] returns the raw text of one table. Sources are fetched once
//! at startup (and on explicit reload), one table after the other.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod file;
#[cfg(feature = "remote-sources")]
pub mod http;
pub mod location;
pub mod memory;

pub use error::{SourceError, SourceResult};
pub use file::FileSource;
#[cfg(feature = "remote-sources")]
pub use http::HttpSource;
pub use location::{LocatedSource, SourceLocation};
pub use memory::InMemorySource;

/// The tables the dataset is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Confirmed,
    Deaths,
    Recovered,
    Lockdown,
}

impl SourceKind {
    /// Fetch order.
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Confirmed,
        SourceKind::Deaths,
        SourceKind::Recovered,
        SourceKind::Lockdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Confirmed => "confirmed",
            SourceKind::Deaths => "deaths",
            SourceKind::Recovered => "recovered",
            SourceKind::Lockdown => "lockdown",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "confirmed" | "cases" => Ok(Self::Confirmed),
            "deaths" => Ok(Self::Deaths),
            "recovered" => Ok(Self::Recovered),
            "lockdown" | "lockdowns" => Ok(Self::Lockdown),
            _ => Err(format!("Unknown source: {}", s)),
        }
    }
}

/// Anything that can hand over the CSV text of a table.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a source can be shared with reload
/// jobs running on the tokio runtime.
#[async_trait]
pub trait CsvSource: Send + Sync {
    /// Full CSV text of `kind`, header row included.
    async fn fetch(&self, kind: SourceKind) -> SourceResult<String>;

    /// Short description for logs.
    fn describe(&self, kind: SourceKind) -> String {
        kind.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in SourceKind::ALL {
            assert_eq!(kind.as_str().parse::<SourceKind>().unwrap(), kind);
        }
        assert_eq!("cases".parse::<SourceKind>().unwrap(), SourceKind::Confirmed);
        assert!("vaccinations".parse::<SourceKind>().is_err());
    }
}
