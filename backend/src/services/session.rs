//! The state a chart client works against: base dataset, selection and view.

use std::sync::Arc;

use log::debug;

use super::dataset::BaseDataset;
use crate::pipeline::{recompute, ChartView, SelectionChange, SelectionState, ViewState};

/// Base dataset plus the mutable selection and view settings.
///
/// The dataset itself is shared and never modified; a reload swaps in a new
/// one and carries the selected names over.
#[derive(Debug, Clone)]
pub struct Session {
    dataset: Arc<BaseDataset>,
    selection: SelectionState,
    view: ViewState,
}

impl Session {
    pub fn new<I, S>(dataset: Arc<BaseDataset>, selected: I, view: ViewState) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selection = SelectionState::seed(&dataset.regions, selected);
        Self {
            dataset,
            selection,
            view,
        }
    }

    pub fn dataset(&self) -> &Arc<BaseDataset> {
        &self.dataset
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn set_view(&mut self, view: ViewState) {
        self.view = view;
    }

    pub fn toggle(&mut self, name: &str) -> Option<SelectionChange> {
        self.selection.toggle(name)
    }

    pub fn set_selected(&mut self, name: &str, selected: bool) -> Option<SelectionChange> {
        self.selection.set(name, selected)
    }

    pub fn replace_selection<I, S>(&mut self, names: I) -> Vec<SelectionChange>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selection.replace(names)
    }

    /// The chart for the current selection and view.
    pub fn chart(&self) -> ChartView {
        recompute(&self.dataset.regions, &self.selection, &self.view)
    }

    /// The chart for the current selection under another view.
    pub fn chart_with(&self, view: &ViewState) -> ChartView {
        recompute(&self.dataset.regions, &self.selection, view)
    }

    /// Install a freshly loaded dataset, keeping the selected names that still exist.
    pub fn replace_dataset(&mut self, dataset: Arc<BaseDataset>) {
        let selected = self.selection.selected_names();
        self.selection = SelectionState::seed(&dataset.regions, &selected);
        debug!(
            "Dataset replaced: {} regions, {} selected",
            dataset.len(),
            self.selection.selected_names().len()
        );
        self.dataset = dataset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Count, DailyRecord, RegionKey, RegionSeries};
    use crate::pipeline::MergeSummary;
    use chrono::{Days, NaiveDate, Utc};

    fn dataset(names: &[&str]) -> Arc<BaseDataset> {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let regions = names
            .iter()
            .map(|name| {
                let series = (0..10)
                    .map(|i| {
                        DailyRecord::new(
                            start + Days::new(i),
                            Count::new(200 * (i as i64 + 1)),
                            Count::new(i as i64),
                            Count::new(0),
                        )
                    })
                    .collect();
                RegionSeries::new(RegionKey::new(*name, ""), series)
            })
            .collect();
        Arc::new(BaseDataset {
            regions,
            report: MergeSummary {
                merged: names.len(),
                skipped: vec![],
                unmatched_events: 0,
            },
            lockdown_events: 0,
            loaded_at: Utc::now(),
        })
    }

    #[test]
    fn test_chart_follows_selection() {
        let mut session = Session::new(dataset(&["Italy", "Spain"]), ["Italy"], ViewState::default());
        assert_eq!(session.chart().series.len(), 1);

        let change = session.toggle("Spain").unwrap();
        assert!(change.selected);
        assert_eq!(session.chart().series.len(), 2);
    }

    #[test]
    fn test_view_change_leaves_dataset_alone() {
        let mut session = Session::new(dataset(&["Italy"]), ["Italy"], ViewState::default());
        session.set_view(ViewState::default().with_max_days(3));
        assert_eq!(session.chart().max_days, 3);
        assert_eq!(session.dataset().regions[0].len(), 10);
        assert_eq!(session.chart_with(&ViewState::default()).max_days, 10);
    }

    #[test]
    fn test_reload_keeps_surviving_selection() {
        let mut session = Session::new(dataset(&["Italy", "Spain"]), ["Italy", "Spain"], ViewState::default());
        session.replace_dataset(dataset(&["Italy", "France"]));
        assert_eq!(session.selection().selected_names(), vec!["Italy".to_string()]);
        assert_eq!(session.selection().len(), 2);
    }
}
