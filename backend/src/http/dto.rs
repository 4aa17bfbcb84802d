//! Data Transfer Objects for the HTTP API.
//!
//! Chart payloads ([`ChartView`](crate::pipeline::ChartView),
//! [`SelectionChange`](crate::pipeline::SelectionChange)) are serialized as
//! they are; the types here cover requests and the remaining responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Metric, RegionKey, ScaleMode};
use crate::pipeline::{SkippedRegion, ViewState};
use crate::services::job_tracker::{JobKind, JobStatus, LogEntry};

use super::error::AppError;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Regions in the loaded dataset
    pub regions: usize,
    pub loaded_at: DateTime<Utc>,
}

/// One region of the base dataset as listed to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionInfo {
    pub key: RegionKey,
    pub display_name: String,
    /// Line colour; `None` when the region has no case above the threshold
    pub colour: Option<String>,
    /// Days in the untrimmed series
    pub days: usize,
    pub selected: bool,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionListResponse {
    pub regions: Vec<RegionInfo>,
    pub total: usize,
}

/// What happened while the dataset was built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    pub merged: usize,
    pub skipped: Vec<SkippedRegion>,
    pub unmatched_events: usize,
    pub lockdown_events: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Currently selected region names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionResponse {
    pub selected: Vec<String>,
    /// Regions that can be selected
    pub total: usize,
}

/// Request body for replacing the whole selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceSelectionRequest {
    pub selected: Vec<String>,
}

/// Request body for toggling one region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub name: String,
    /// Explicit target state; flips the current state when absent
    #[serde(default)]
    pub selected: Option<bool>,
}

/// Query parameters of `GET /v1/view`, applied over the current view.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ViewQuery {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub days: Option<usize>,
    #[serde(default)]
    pub metric: Option<String>,
    #[serde(default)]
    pub scale: Option<String>,
}

impl ViewQuery {
    pub fn apply(&self, base: &ViewState) -> Result<ViewState, AppError> {
        let mut view = base.clone();
        if let Some(threshold) = self.threshold {
            view.threshold = threshold;
        }
        if let Some(days) = self.days {
            view.max_days = Some(days);
        }
        if let Some(metric) = &self.metric {
            view.metric = metric.parse::<Metric>().map_err(AppError::BadRequest)?;
        }
        if let Some(scale) = &self.scale {
            view.scale = scale.parse::<ScaleMode>().map_err(AppError::BadRequest)?;
        }
        validate_view(&view)?;
        Ok(view)
    }
}

pub fn validate_view(view: &ViewState) -> Result<(), AppError> {
    if !view.threshold.is_finite() || view.threshold < 0.0 {
        return Err(AppError::BadRequest(format!(
            "threshold must be a non-negative number, got {}",
            view.threshold
        )));
    }
    Ok(())
}

/// Request body of `POST /v1/view`: a chart for an explicit selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartRequest {
    pub selected: Vec<String>,
    #[serde(default)]
    pub view: ViewState,
}

/// Response for starting a dataset reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub job_id: String,
    pub message: String,
}

/// Job status response for async processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub result: Option<serde_json::Value>,
}
