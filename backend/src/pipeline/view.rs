//! One pass from the base dataset to what the chart draws.

use serde::{Deserialize, Serialize};

use super::extent::{get_extent, get_max_days, Extent};
use super::palette::Palette;
use super::selection::{filter_selected, SelectionState};
use super::trim::trim_dataset;
use crate::models::{Count, Metric, RegionSeries, ScaleMode};

/// Case count a region must exceed before its series starts.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// Lower end of the day slider.
pub const MIN_SLIDER_DAYS: usize = 7;

/// Everything the user can change about the chart, passed in by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub threshold: f64,
    /// Days shown per region; `None` shows every day.
    pub max_days: Option<usize>,
    pub metric: Metric,
    pub scale: ScaleMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_days: None,
            metric: Metric::default(),
            scale: ScaleMode::default(),
        }
    }
}

impl ViewState {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_days(mut self, max_days: usize) -> Self {
        self.max_days = Some(max_days);
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_scale(mut self, scale: ScaleMode) -> Self {
        self.scale = scale;
        self
    }
}

/// Bounds and position of the day slider; `min <= value <= max` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlider {
    pub min: usize,
    pub max: usize,
    pub value: usize,
}

/// Where a series' name is drawn: its last visible day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLabel {
    pub day: usize,
    pub value: Count,
}

/// A visible region with its drawing attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibleSeries {
    #[serde(flatten)]
    pub region: RegionSeries,
    pub colour: Option<&'static str>,
    pub label: Option<SeriesLabel>,
}

/// Output of [`recompute`]: the visible series and the axes to draw them on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub view: ViewState,
    pub series: Vec<VisibleSeries>,
    pub extent: Extent,
    /// Longest visible series.
    pub max_days: usize,
    pub slider: DaySlider,
    pub x_domain: [f64; 2],
    /// `None` when nothing is visible.
    pub y_domain: Option<[f64; 2]>,
    pub palette: Palette,
}

/// Trim, filter and measure `base` for the given selection and view.
///
/// `base` is only borrowed, so calling this twice with the same inputs yields
/// the same output.
pub fn recompute(base: &[RegionSeries], selection: &SelectionState, view: &ViewState) -> ChartView {
    let trimmed = trim_dataset(base, view.threshold);
    let palette = Palette::for_regions(&trimmed);

    let total_days = get_max_days(&trimmed);
    let days = view.max_days.unwrap_or(total_days).min(total_days);
    let slider = DaySlider {
        min: MIN_SLIDER_DAYS.min(days),
        max: total_days,
        value: days,
    };

    let visible = filter_selected(&trimmed, selection, days);
    let extent = get_extent(&visible, view.metric);
    let max_days = get_max_days(&visible);

    let series = visible
        .into_iter()
        .map(|region| {
            let label = region.series.last().map(|last| SeriesLabel {
                day: region.series.len() - 1,
                value: last.value(view.metric),
            });
            VisibleSeries {
                colour: palette.colour(&region.key.region),
                label,
                region,
            }
        })
        .collect();

    ChartView {
        view: view.clone(),
        series,
        extent,
        max_days,
        slider,
        x_domain: [0.0, days as f64],
        y_domain: y_domain(extent, view),
        palette,
    }
}

/// Log scales start at the threshold for case counts (every visible case count
/// exceeds it) and at the smallest positive value otherwise.
fn y_domain(extent: Extent, view: &ViewState) -> Option<[f64; 2]> {
    let Extent::Range { min, max } = extent else {
        return None;
    };
    let max = max as f64;
    match view.scale {
        ScaleMode::Linear => Some([0.0_f64.min(min as f64), max]),
        ScaleMode::Log => {
            let lower = match view.metric {
                Metric::Cases => view.threshold.max(1.0),
                _ => (min as f64).max(1.0),
            };
            Some([lower, max.max(lower)])
        }
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod view_tests;
