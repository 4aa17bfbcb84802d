//! Loading the base dataset from the four source tables.
//!
//! The base dataset is built once (and again on an explicit reload) and is
//! never modified afterwards; every chart view is derived from it.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use crate::config::PipelineSettings;
use crate::models::RegionSeries;
use crate::parsing::{parse_lockdown_table, LockdownEvents, ParseError, WideTable};
use crate::pipeline::{merge_tables, MergeSummary};
use crate::sources::{CsvSource, SourceError, SourceKind};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Failed to parse the {kind} table: {source}")]
    Parse {
        kind: SourceKind,
        #[source]
        source: ParseError,
    },

    #[error("Failed to merge the count tables: {0}")]
    Merge(#[source] ParseError),
}

/// The parsed source tables, before merging.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTables {
    pub confirmed: WideTable,
    pub deaths: WideTable,
    pub recovered: WideTable,
    /// `None` when the lockdown table could not be obtained.
    pub lockdown: Option<WideTable>,
}

/// The merged per-region series and what happened while building them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseDataset {
    /// Merged regions in confirmed-table order.
    pub regions: Vec<RegionSeries>,
    pub report: MergeSummary,
    /// Number of (region, date) lockdown events read.
    pub lockdown_events: usize,
    pub loaded_at: DateTime<Utc>,
}

impl BaseDataset {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

fn parse_table(kind: SourceKind, text: &str) -> Result<WideTable, DatasetError> {
    WideTable::from_csv_str(text).map_err(|source| DatasetError::Parse { kind, source })
}

async fn fetch_table(source: &dyn CsvSource, kind: SourceKind) -> Result<WideTable, DatasetError> {
    info!("Fetching {}", source.describe(kind));
    let text = source.fetch(kind).await?;
    parse_table(kind, &text)
}

/// Fetch the tables one after the other, in [`SourceKind::ALL`] order.
///
/// A missing or unreadable lockdown table is logged and left out; the three
/// count tables are required.
pub async fn fetch_tables(source: &dyn CsvSource) -> Result<SourceTables, DatasetError> {
    let confirmed = fetch_table(source, SourceKind::Confirmed).await?;
    let deaths = fetch_table(source, SourceKind::Deaths).await?;
    let recovered = fetch_table(source, SourceKind::Recovered).await?;
    let lockdown = match fetch_table(source, SourceKind::Lockdown).await {
        Ok(table) => Some(table),
        Err(e) => {
            warn!("Ignoring lockdown events: {}", e);
            None
        }
    };

    Ok(SourceTables {
        confirmed,
        deaths,
        recovered,
        lockdown,
    })
}

/// Merge already fetched tables into the base dataset.
pub fn build_base_dataset(
    tables: &SourceTables,
    settings: &PipelineSettings,
) -> Result<BaseDataset, DatasetError> {
    let lockdown = match &tables.lockdown {
        Some(table) => match parse_lockdown_table(table) {
            Ok(events) => events,
            Err(e) => {
                warn!("Ignoring lockdown events: {}", e);
                LockdownEvents::new()
            }
        },
        None => LockdownEvents::new(),
    };

    let report = merge_tables(
        &tables.confirmed,
        &tables.deaths,
        &tables.recovered,
        &lockdown,
        settings.invalid_counts,
    )
    .map_err(DatasetError::Merge)?;

    let summary = report.summary();
    Ok(BaseDataset {
        regions: report.regions,
        report: summary,
        lockdown_events: lockdown.event_count(),
        loaded_at: Utc::now(),
    })
}

/// Fetch, parse and merge everything into a fresh base dataset.
pub async fn load_base_dataset(
    source: &dyn CsvSource,
    settings: &PipelineSettings,
) -> Result<BaseDataset, DatasetError> {
    let tables = fetch_tables(source).await?;
    let dataset = build_base_dataset(&tables, settings)?;
    info!(
        "Loaded {} regions ({} skipped, {} lockdown events)",
        dataset.len(),
        dataset.report.skipped.len(),
        dataset.lockdown_events
    );
    Ok(dataset)
}
