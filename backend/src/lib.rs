//! # Outbreak Trends
//!
//! Per-region outbreak curves (confirmed cases, deaths, recoveries and lockdown
//! events) built from the wide CSV time-series tables, ready for a chart client.
//!
//! ## Features
//!
//! - **Parsing**: header-addressed CSV tables, `M/D/YY` date columns, lockdown events
//! - **Merging**: one series per region joined on (`Country/Region`, `Province/State`),
//!   with every left-out region reported and a reason attached
//! - **Views**: threshold trimming, selection filtering, day window, axis extents
//! - **Sources**: local files or HTTP(S) downloads, fetched once and on reload
//! - **HTTP API**: REST endpoints for a rendering client (feature `http-server`)
//!
//! ## Architecture
//!
//! - [`models`]: dates, counts, region identity, per-region series
//! - [`parsing`]: CSV tables into normalized rows and lockdown events
//! - [`pipeline`]: pure transformations from tables to chart views
//! - [`sources`]: where the CSV text comes from
//! - [`config`]: TOML and environment configuration
//! - [`services`]: loading, session state and background reloads
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! Every view is recomputed from the immutable base dataset; nothing is
//! patched incrementally.

pub mod config;
pub mod models;
pub mod parsing;
pub mod pipeline;
pub mod services;
pub mod sources;

#[cfg(feature = "http-server")]
pub mod http;

pub use config::AppConfig;
pub use models::{Count, DailyRecord, Metric, RegionKey, RegionSeries, ScaleMode};
pub use pipeline::{recompute, ChartView, SelectionState, ViewState};
pub use services::{load_base_dataset, BaseDataset};
