//! Lockdown event table.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::{debug, warn};

use super::csv_table::WideTable;
use super::error::{ParseError, ParseResult};
use crate::models::region::{REGION_COLUMN, SUB_REGION_COLUMN};
use crate::models::{parse_action_date, RegionKey};

pub const ACTION_DATE_COLUMN: &str = "Date of action";
pub const ACTION_TYPE_COLUMN: &str = "Action type";

/// Label used when a row has a date but no action type.
pub const DEFAULT_EVENT_LABEL: &str = "Lockdown";

/// Event labels per region and date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LockdownEvents {
    by_region: HashMap<RegionKey, BTreeMap<NaiveDate, String>>,
}

impl LockdownEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event; an existing label for the same region and date is replaced.
    pub fn insert(&mut self, key: RegionKey, date: NaiveDate, label: impl Into<String>) {
        self.by_region
            .entry(key)
            .or_default()
            .insert(date, label.into());
    }

    pub fn for_key(&self, key: &RegionKey) -> Option<&BTreeMap<NaiveDate, String>> {
        self.by_region.get(key)
    }

    /// Number of regions with at least one event.
    pub fn len(&self) -> usize {
        self.by_region.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_region.is_empty()
    }

    /// Total number of (region, date) events.
    pub fn event_count(&self) -> usize {
        self.by_region.values().map(BTreeMap::len).sum()
    }
}

/// Build the event mapping from the lockdown table.
///
/// Rows with an empty `Date of action` are dropped before insertion, as are rows
/// whose date is not `YYYY-MM-DD`.
pub fn parse_lockdown_table(table: &WideTable) -> ParseResult<LockdownEvents> {
    for column in [REGION_COLUMN, ACTION_DATE_COLUMN] {
        if !table.has_column(column) {
            return Err(ParseError::MissingColumn(column.to_string()));
        }
    }

    let mut events = LockdownEvents::new();
    for row in table.rows() {
        let raw_date = row.get(ACTION_DATE_COLUMN).unwrap_or("").trim();
        if raw_date.is_empty() {
            continue;
        }

        let key = RegionKey::new(
            row.get(REGION_COLUMN).unwrap_or(""),
            row.get(SUB_REGION_COLUMN).unwrap_or(""),
        );
        let Some(date) = parse_action_date(raw_date) else {
            warn!("Ignoring lockdown row for {}: bad date '{}'", key, raw_date);
            continue;
        };

        let label = match row.get(ACTION_TYPE_COLUMN).map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => DEFAULT_EVENT_LABEL.to_string(),
        };
        debug!("Lockdown event for {} on {}: {}", key, date, label);
        events.insert(key, date, label);
    }

    Ok(events)
}
