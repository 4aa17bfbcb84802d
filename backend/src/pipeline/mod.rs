//! Transformations from parsed tables to chart-ready series.
//!
//! The base dataset produced by [`merge_tables`] is never modified after load.
//! Every view is derived from it by [`recompute`], which runs:
//!
//! 1. [`trim_dataset`]: re-base each region on its first day above the threshold
//!    and drop regions left without cases
//! 2. [`filter_selected`]: keep the selected regions, cut to the day window
//! 3. [`get_extent`]: measure the visible set for the y axis
//!
//! # Example
//!
//! ```
//! use outbreak_trends::parsing::{LockdownEvents, WideTable};
//! use outbreak_trends::pipeline::{merge_tables, recompute, SelectionState, ViewState};
//! use outbreak_trends::models::InvalidCountPolicy;
//!
//! let header = "Province/State,Country/Region,Lat,Long,3/1/20,3/2/20\n";
//! let confirmed = WideTable::from_csv_str(&format!("{header},Italy,43,12,50,150\n")).unwrap();
//! let deaths = WideTable::from_csv_str(&format!("{header},Italy,43,12,1,3\n")).unwrap();
//! let recovered = WideTable::from_csv_str(&format!("{header},Italy,43,12,0,2\n")).unwrap();
//!
//! let report = merge_tables(
//!     &confirmed,
//!     &deaths,
//!     &recovered,
//!     &LockdownEvents::new(),
//!     InvalidCountPolicy::default(),
//! )
//! .unwrap();
//! let selection = SelectionState::seed(&report.regions, ["Italy"]);
//! let chart = recompute(&report.regions, &selection, &ViewState::default());
//! assert_eq!(chart.series.len(), 1);
//! assert_eq!(chart.max_days, 1);
//! ```

pub mod annotate;
pub mod extent;
pub mod merge;
pub mod palette;
pub mod selection;
pub mod trim;
pub mod view;

pub use annotate::annotate;
pub use extent::{get_extent, get_max_days, get_max_value, Extent};
pub use merge::{
    merge_regions, merge_tables, MergeReport, MergeSummary, RegionOutcome, SkipReason,
    SkippedRegion, TableKind,
};
pub use palette::{Palette, CATEGORY10};
pub use selection::{filter_selected, SelectionChange, SelectionEntry, SelectionState};
pub use trim::{drop_cases_under, has_cases, trim_dataset, trim_region};
pub use view::{
    recompute, ChartView, DaySlider, SeriesLabel, ViewState, VisibleSeries, DEFAULT_THRESHOLD,
    MIN_SLIDER_DAYS,
};
