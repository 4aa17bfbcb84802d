//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! session and service layer for the actual work.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    validate_view, ChartRequest, HealthResponse, JobStatusResponse, RegionInfo,
    RegionListResponse, ReloadResponse, ReplaceSelectionRequest, ReportResponse,
    SelectionResponse, ToggleRequest, ViewQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::pipeline::{
    recompute, trim_dataset, ChartView, Palette, SelectionChange, SelectionState, ViewState,
};
use crate::services::{reload_dataset_async, JobKind};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let dataset = state.dataset();
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        regions: dataset.len(),
        loaded_at: dataset.loaded_at,
    }))
}

// =============================================================================
// Dataset
// =============================================================================

/// GET /v1/regions
///
/// Every region of the base dataset with its colour and selection flag.
pub async fn list_regions(State(state): State<AppState>) -> HandlerResult<RegionListResponse> {
    let session = state.session.read();
    let dataset = session.dataset();
    let palette = Palette::for_regions(&trim_dataset(&dataset.regions, session.view().threshold));

    let regions: Vec<RegionInfo> = dataset
        .regions
        .iter()
        .map(|region| RegionInfo {
            key: region.key.clone(),
            display_name: region.display_name.clone(),
            colour: palette.colour(&region.key.region).map(str::to_string),
            days: region.len(),
            selected: session.selection().is_selected(&region.key),
            lat: region.lat,
            long: region.long,
        })
        .collect();
    let total = regions.len();

    Ok(Json(RegionListResponse { regions, total }))
}

/// GET /v1/report
///
/// Regions left out of the dataset and why.
pub async fn get_report(State(state): State<AppState>) -> HandlerResult<ReportResponse> {
    let dataset = state.dataset();
    Ok(Json(ReportResponse {
        merged: dataset.report.merged,
        skipped: dataset.report.skipped.clone(),
        unmatched_events: dataset.report.unmatched_events,
        lockdown_events: dataset.lockdown_events,
        loaded_at: dataset.loaded_at,
    }))
}

/// POST /v1/dataset/reload
///
/// Fetch the sources again in the background. Returns a job ID for tracking progress.
pub async fn reload_dataset(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ReloadResponse>), AppError> {
    let job_id = state
        .job_tracker
        .try_create_job(JobKind::DatasetReload)
        .ok_or_else(|| AppError::Conflict("A dataset reload is already running".to_string()))?;
    let response_job_id = job_id.clone();

    let tracker = state.job_tracker.clone();
    let source = Arc::clone(&state.source);
    let session = Arc::clone(&state.session);
    let settings = state.pipeline;

    tokio::spawn(async move {
        let _ = reload_dataset_async(job_id, tracker, source, settings, session).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ReloadResponse {
            job_id: response_job_id.clone(),
            message: format!(
                "Dataset reload started. Track progress at /v1/jobs/{}",
                response_job_id
            ),
        }),
    ))
}

/// GET /v1/jobs/{job_id}
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        kind: job.kind,
        status: job.status,
        logs: job.logs,
        result: job.result,
    }))
}

// =============================================================================
// Selection
// =============================================================================

fn selection_response(selection: &SelectionState) -> SelectionResponse {
    SelectionResponse {
        selected: selection.selected_names(),
        total: selection.len(),
    }
}

/// GET /v1/selection
pub async fn get_selection(State(state): State<AppState>) -> HandlerResult<SelectionResponse> {
    let session = state.session.read();
    Ok(Json(selection_response(session.selection())))
}

/// PUT /v1/selection
///
/// Replace the selection. Unknown names are ignored.
pub async fn replace_selection(
    State(state): State<AppState>,
    Json(request): Json<ReplaceSelectionRequest>,
) -> HandlerResult<SelectionResponse> {
    let mut session = state.session.write();
    session.replace_selection(&request.selected);
    Ok(Json(selection_response(session.selection())))
}

/// POST /v1/selection/toggle
///
/// Flip (or explicitly set) one region and report the change.
pub async fn toggle_selection(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> HandlerResult<SelectionChange> {
    let mut session = state.session.write();
    let change = match request.selected {
        Some(selected) => session.set_selected(&request.name, selected),
        None => session.toggle(&request.name),
    };
    change
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Region '{}' not found", request.name)))
}

// =============================================================================
// Chart
// =============================================================================

/// GET /v1/view?threshold=&days=&metric=&scale=
///
/// The chart for the current selection; query parameters override the
/// current view for this request only.
pub async fn get_view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> HandlerResult<ChartView> {
    let session = state.session.read();
    let view = query.apply(session.view())?;
    Ok(Json(session.chart_with(&view)))
}

/// PUT /v1/view
///
/// Store the view settings used by later chart requests.
pub async fn set_view(
    State(state): State<AppState>,
    Json(view): Json<ViewState>,
) -> HandlerResult<ChartView> {
    validate_view(&view)?;
    let mut session = state.session.write();
    session.set_view(view);
    Ok(Json(session.chart()))
}

/// POST /v1/view
///
/// The chart for an explicit selection and view, without touching the
/// stored selection.
pub async fn compute_view(
    State(state): State<AppState>,
    Json(request): Json<ChartRequest>,
) -> HandlerResult<ChartView> {
    validate_view(&request.view)?;
    let dataset = state.dataset();
    let selection = SelectionState::seed(&dataset.regions, &request.selected);
    Ok(Json(recompute(&dataset.regions, &selection, &request.view)))
}
