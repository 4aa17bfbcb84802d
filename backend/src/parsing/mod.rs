//! Parsers for the CSV source tables.
//!
//! # Parsers
//!
//! - [`csv_table`]: read a CSV document into a header-addressed [`WideTable`]
//! - [`row_normalizer`]: turn one wide time-series row into ordered per-date counts
//! - [`lockdown`]: read the lockdown event table into [`LockdownEvents`]
//!
//! # Example
//!
//! ```
//! use outbreak_trends::parsing::{normalize_row, WideTable};
//!
//! let table = WideTable::from_csv_str(
//!     "Province/State,Country/Region,Lat,Long,1/23/20,1/22/20\nHubei,China,30.9,112.2,444,444\n",
//! )
//! .expect("valid csv");
//! let row = normalize_row(table.rows().next().unwrap()).expect("valid row");
//! assert_eq!(row.display_name(), "Hubei, China");
//! assert_eq!(row.values.len(), 2);
//! ```

pub mod csv_table;
pub mod error;
pub mod lockdown;
pub mod row_normalizer;

pub use csv_table::{TableRow, WideTable};
pub use error::{ParseError, ParseResult};
pub use lockdown::{parse_lockdown_table, LockdownEvents};
pub use row_normalizer::{normalize_row, NormalizeError, NormalizedRow};
