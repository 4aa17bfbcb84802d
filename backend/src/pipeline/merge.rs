//! Join the confirmed, deaths and recovered tables into one series per region.

use std::collections::{HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::annotate::annotate;
use crate::models::region::{REGION_COLUMN, SUB_REGION_COLUMN};
use crate::models::{DailyRecord, InvalidCountPolicy, RegionKey, RegionSeries};
use crate::parsing::{
    normalize_row, LockdownEvents, NormalizedRow, ParseError, ParseResult, WideTable,
};

/// The three joined time-series tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Confirmed,
    Deaths,
    Recovered,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Confirmed => f.write_str("confirmed"),
            TableKind::Deaths => f.write_str("deaths"),
            TableKind::Recovered => f.write_str("recovered"),
        }
    }
}

/// Why a confirmed region is absent from the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    #[error("missing from the {table} table")]
    MissingFrom { table: TableKind },

    #[error("repeated row in the {table} table")]
    DuplicateKey { table: TableKind },

    #[error("malformed row in the {table} table: {message}")]
    Malformed { table: TableKind, message: String },

    #[error("the {table} table has no value for {date}")]
    DateMismatch { table: TableKind, date: NaiveDate },
}

/// A region left out of the merged dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRegion {
    pub key: RegionKey,
    pub display_name: String,
    pub reason: SkipReason,
}

/// Result of merging one confirmed row.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionOutcome {
    Merged(RegionSeries),
    Skipped(SkippedRegion),
}

impl RegionOutcome {
    fn skipped(key: RegionKey, reason: SkipReason) -> Self {
        let display_name = key.display_name();
        RegionOutcome::Skipped(SkippedRegion {
            key,
            display_name,
            reason,
        })
    }
}

/// Merged regions plus everything that was left out on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Merged regions in confirmed-table order.
    pub regions: Vec<RegionSeries>,
    pub skipped: Vec<SkippedRegion>,
    /// Lockdown events whose date matched no day of their region.
    pub unmatched_events: usize,
}

impl MergeReport {
    pub fn merged_count(&self) -> usize {
        self.regions.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            merged: self.merged_count(),
            skipped: self.skipped.clone(),
            unmatched_events: self.unmatched_events,
        }
    }
}

/// Serializable view of a [`MergeReport`] without the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSummary {
    pub merged: usize,
    pub skipped: Vec<SkippedRegion>,
    pub unmatched_events: usize,
}

/// Rows of a secondary table keyed by region, with the rows that were unusable.
struct KeyedTable {
    rows: HashMap<RegionKey, NormalizedRow>,
    rejected: HashMap<RegionKey, SkipReason>,
    /// Keys of later rows repeating an earlier one, in table order.
    repeated: Vec<RegionKey>,
}

impl KeyedTable {
    fn build(table: &WideTable, kind: TableKind) -> Self {
        let mut rows = HashMap::new();
        let mut rejected = HashMap::new();
        let mut repeated = Vec::new();
        for row in table.rows() {
            let key = row_key(row.get(REGION_COLUMN), row.get(SUB_REGION_COLUMN));
            if rows.contains_key(&key) || rejected.contains_key(&key) {
                debug!("Ignoring repeated {} row for {}", kind, key);
                repeated.push(key);
                continue;
            }
            match normalize_row(row) {
                Ok(normalized) => {
                    rows.insert(key, normalized);
                }
                Err(e) => {
                    rejected.insert(
                        key,
                        SkipReason::Malformed {
                            table: kind,
                            message: e.to_string(),
                        },
                    );
                }
            }
        }
        Self {
            rows,
            rejected,
            repeated,
        }
    }

    fn lookup(&self, key: &RegionKey, kind: TableKind) -> Result<&NormalizedRow, SkipReason> {
        if let Some(row) = self.rows.get(key) {
            return Ok(row);
        }
        Err(self
            .rejected
            .get(key)
            .cloned()
            .unwrap_or(SkipReason::MissingFrom { table: kind }))
    }
}

fn row_key(region: Option<&str>, sub_region: Option<&str>) -> RegionKey {
    RegionKey::new(region.unwrap_or(""), sub_region.unwrap_or(""))
}

fn require_region_column(table: &WideTable) -> ParseResult<()> {
    if table.has_column(REGION_COLUMN) {
        Ok(())
    } else {
        Err(ParseError::MissingColumn(REGION_COLUMN.to_string()))
    }
}

/// Join the three tables region by region.
///
/// The confirmed table drives iteration and output order. A region missing from
/// (or malformed in) the deaths or recovered table is reported as skipped and
/// the merge carries on. Rows repeating a region key already seen in the same
/// table are skipped and reported; the first row wins. Repeats in the deaths
/// and recovered tables are reported after the confirmed rows. Lockdown events are attached to the
/// matching days of each merged region.
pub fn merge_regions(
    confirmed: &WideTable,
    deaths: &WideTable,
    recovered: &WideTable,
    lockdown: &LockdownEvents,
    policy: InvalidCountPolicy,
) -> ParseResult<(Vec<RegionOutcome>, usize)> {
    for table in [confirmed, deaths, recovered] {
        require_region_column(table)?;
    }

    let deaths = KeyedTable::build(deaths, TableKind::Deaths);
    let recovered = KeyedTable::build(recovered, TableKind::Recovered);

    let mut seen: HashSet<RegionKey> = HashSet::new();
    let mut outcomes = Vec::with_capacity(confirmed.len());
    let mut unmatched_events = 0;

    for row in confirmed.rows() {
        let key = row_key(row.get(REGION_COLUMN), row.get(SUB_REGION_COLUMN));
        if !seen.insert(key.clone()) {
            outcomes.push(RegionOutcome::skipped(
                key,
                SkipReason::DuplicateKey {
                    table: TableKind::Confirmed,
                },
            ));
            continue;
        }

        let cases = match normalize_row(row) {
            Ok(normalized) => normalized,
            Err(e) => {
                outcomes.push(RegionOutcome::skipped(
                    key,
                    SkipReason::Malformed {
                        table: TableKind::Confirmed,
                        message: e.to_string(),
                    },
                ));
                continue;
            }
        };

        let joined = deaths
            .lookup(&key, TableKind::Deaths)
            .and_then(|d| recovered.lookup(&key, TableKind::Recovered).map(|r| (d, r)))
            .and_then(|(d, r)| build_records(&cases, d, r, policy));

        match joined {
            Ok(records) => {
                let mut region = RegionSeries::new(key, records)
                    .with_coordinates(cases.lat, cases.long);
                if let Some(events) = lockdown.for_key(&region.key) {
                    unmatched_events += annotate(&mut region, events);
                }
                outcomes.push(RegionOutcome::Merged(region));
            }
            Err(reason) => outcomes.push(RegionOutcome::skipped(key, reason)),
        }
    }

    for (table, kind) in [(&deaths, TableKind::Deaths), (&recovered, TableKind::Recovered)] {
        for key in &table.repeated {
            outcomes.push(RegionOutcome::skipped(
                key.clone(),
                SkipReason::DuplicateKey { table: kind },
            ));
        }
    }

    Ok((outcomes, unmatched_events))
}

/// [`merge_regions`] folded into a report, with skips logged.
pub fn merge_tables(
    confirmed: &WideTable,
    deaths: &WideTable,
    recovered: &WideTable,
    lockdown: &LockdownEvents,
    policy: InvalidCountPolicy,
) -> ParseResult<MergeReport> {
    let (outcomes, unmatched_events) =
        merge_regions(confirmed, deaths, recovered, lockdown, policy)?;

    let mut report = MergeReport {
        unmatched_events,
        ..Default::default()
    };
    for outcome in outcomes {
        match outcome {
            RegionOutcome::Merged(region) => report.regions.push(region),
            RegionOutcome::Skipped(skipped) => {
                warn!("Skipping region {}: {}", skipped.display_name, skipped.reason);
                report.skipped.push(skipped);
            }
        }
    }

    info!(
        "Merged {} regions ({} skipped, {} unmatched lockdown events)",
        report.merged_count(),
        report.skipped_count(),
        report.unmatched_events
    );
    Ok(report)
}

fn build_records(
    cases: &NormalizedRow,
    deaths: &NormalizedRow,
    recovered: &NormalizedRow,
    policy: InvalidCountPolicy,
) -> Result<Vec<DailyRecord>, SkipReason> {
    let mut records = Vec::with_capacity(cases.values.len());
    for &(date, confirmed) in &cases.values {
        let dead = deaths.value_at(date).ok_or(SkipReason::DateMismatch {
            table: TableKind::Deaths,
            date,
        })?;
        let healed = recovered.value_at(date).ok_or(SkipReason::DateMismatch {
            table: TableKind::Recovered,
            date,
        })?;

        let (confirmed, dead, healed) = match policy {
            InvalidCountPolicy::Propagate => (confirmed, dead, healed),
            InvalidCountPolicy::Zero => (confirmed.or(0), dead.or(0), healed.or(0)),
            InvalidCountPolicy::DropRecord => {
                if !(confirmed.is_valid() && dead.is_valid() && healed.is_valid()) {
                    continue;
                }
                (confirmed, dead, healed)
            }
        };
        records.push(DailyRecord::new(date, confirmed, dead, healed));
    }
    Ok(records)
}

#[cfg(test)]
#[path = "merge_tests.rs"]
mod merge_tests;
