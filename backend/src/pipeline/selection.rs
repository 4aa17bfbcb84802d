//! Which regions are shown, and the prefix cut applied to them.

use std::collections::{HashMap, HashSet};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::{RegionKey, RegionSeries};

/// One toggle, as emitted to whoever persists the selection (e.g. in the URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionChange {
    pub name: String,
    pub selected: bool,
}

/// Selection flag of one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub key: RegionKey,
    pub name: String,
    pub selected: bool,
}

/// Selected/unselected flag for every region of the base dataset.
///
/// Seeded once from the base dataset; entries are only ever flipped, never added
/// or removed afterwards. Callers address regions by display name, which is
/// what the persisted selection carries; a name shared by several regions
/// addresses all of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    entries: Vec<SelectionEntry>,
    index: HashMap<RegionKey, usize>,
}

impl SelectionState {
    /// Every region of `regions` unselected, then the regions whose display name
    /// appears in `selected` switched on. Unknown names are ignored.
    pub fn seed<I, S>(regions: &[RegionSeries], selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = SelectionState::default();
        for region in regions {
            if state.index.contains_key(&region.key) {
                continue;
            }
            state.index.insert(region.key.clone(), state.entries.len());
            state.entries.push(SelectionEntry {
                key: region.key.clone(),
                name: region.display_name.clone(),
                selected: false,
            });
        }
        for name in selected {
            if state.set(name.as_ref(), true).is_none() {
                debug!("Ignoring selection of unknown region '{}'", name.as_ref());
            }
        }
        state
    }

    pub fn is_selected(&self, key: &RegionKey) -> bool {
        self.index
            .get(key)
            .is_some_and(|&i| self.entries[i].selected)
    }

    /// Whether any region named `name` is selected; `None` for unknown names.
    pub fn is_name_selected(&self, name: &str) -> Option<bool> {
        let mut found = None;
        for entry in self.entries.iter().filter(|e| e.name == name) {
            found = Some(found.unwrap_or(false) || entry.selected);
        }
        found
    }

    /// Set every region named `name`. `None` when the name is unknown.
    pub fn set(&mut self, name: &str, selected: bool) -> Option<SelectionChange> {
        let mut matched = false;
        for entry in self.entries.iter_mut().filter(|e| e.name == name) {
            entry.selected = selected;
            matched = true;
        }
        matched.then(|| SelectionChange {
            name: name.to_string(),
            selected,
        })
    }

    /// Flip the regions named `name`. `None` when the name is unknown.
    pub fn toggle(&mut self, name: &str) -> Option<SelectionChange> {
        let currently = self.is_name_selected(name)?;
        self.set(name, !currently)
    }

    /// Replace the whole selection with `names`; returns the changes made.
    pub fn replace<I, S>(&mut self, names: I) -> Vec<SelectionChange>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
        let mut changes = Vec::new();
        for name in self.names() {
            let target = wanted.contains(&name);
            let changed = self.is_name_selected(&name) != Some(target);
            if let Some(change) = self.set(&name, target) {
                if changed {
                    changes.push(change);
                }
            }
        }
        changes
    }

    /// Every distinct region name, in dataset order.
    pub fn names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.name.as_str()))
            .map(|e| e.name.clone())
            .collect()
    }

    /// Names of the selected regions, in dataset order, without repeats.
    pub fn selected_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| e.selected && seen.insert(e.name.as_str()))
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Selected regions in input order, each cut to at most `max_days` days.
///
/// The cut is a plain prefix: shorter series are left as they are.
pub fn filter_selected(
    regions: &[RegionSeries],
    selection: &SelectionState,
    max_days: usize,
) -> Vec<RegionSeries> {
    regions
        .iter()
        .filter(|region| selection.is_selected(&region.key))
        .map(|region| truncate(region, max_days))
        .collect()
}

fn truncate(region: &RegionSeries, max_days: usize) -> RegionSeries {
    let keep = region.series.len().min(max_days);
    RegionSeries {
        series: region.series[..keep].to_vec(),
        ..region.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Count, DailyRecord};
    use chrono::{Days, NaiveDate};

    fn region(region: &str, sub: &str, days: usize) -> RegionSeries {
        let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        let series = (0..days)
            .map(|i| {
                DailyRecord::new(
                    start + Days::new(i as u64),
                    Count::new(100 + i as i64),
                    Count::new(0),
                    Count::new(0),
                )
            })
            .collect();
        RegionSeries::new(RegionKey::new(region, sub), series)
    }

    fn dataset() -> Vec<RegionSeries> {
        vec![
            region("Italy", "", 5),
            region("China", "Hubei", 2),
            region("Spain", "", 4),
        ]
    }

    #[test]
    fn test_seed_defaults_to_unselected() {
        let state = SelectionState::seed(&dataset(), Vec::<String>::new());
        assert_eq!(state.len(), 3);
        assert!(state.selected_names().is_empty());
    }

    #[test]
    fn test_seed_selects_named_regions_and_ignores_unknown() {
        let state = SelectionState::seed(&dataset(), ["Hubei, China", "Atlantis"]);
        assert_eq!(state.selected_names(), vec!["Hubei, China".to_string()]);
        assert_eq!(state.len(), 3);
        assert!(state.is_selected(&RegionKey::new("China", "Hubei")));
    }

    #[test]
    fn test_toggle_emits_change() {
        let mut state = SelectionState::seed(&dataset(), ["Italy"]);
        assert_eq!(
            state.toggle("Italy"),
            Some(SelectionChange {
                name: "Italy".to_string(),
                selected: false
            })
        );
        assert_eq!(state.toggle("Spain").map(|c| c.selected), Some(true));
        assert_eq!(state.toggle("Atlantis"), None);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn test_shared_name_addresses_every_region() {
        let regions = vec![region("France", "", 3), region("France", "France", 3)];
        let mut state = SelectionState::seed(&regions, ["France"]);
        assert!(state.is_selected(&regions[0].key));
        assert!(state.is_selected(&regions[1].key));
        assert_eq!(state.selected_names(), vec!["France".to_string()]);
        state.toggle("France");
        assert!(!state.is_selected(&regions[1].key));
    }

    #[test]
    fn test_replace_reports_only_flips() {
        let mut state = SelectionState::seed(&dataset(), ["Italy", "Spain"]);
        let changes = state.replace(["Spain", "Hubei, China"]);
        assert_eq!(
            changes,
            vec![
                SelectionChange {
                    name: "Italy".to_string(),
                    selected: false
                },
                SelectionChange {
                    name: "Hubei, China".to_string(),
                    selected: true
                },
            ]
        );
        assert_eq!(
            state.selected_names(),
            vec!["Hubei, China".to_string(), "Spain".to_string()]
        );
    }

    #[test]
    fn test_filter_truncates_to_prefix() {
        let regions = dataset();
        let state = SelectionState::seed(&regions, ["Italy"]);
        let visible = filter_selected(&regions, &state, 3);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].len(), 3);
        assert_eq!(visible[0].series[..], regions[0].series[..3]);
    }

    #[test]
    fn test_filter_never_extends_and_keeps_order() {
        let regions = dataset();
        let state = SelectionState::seed(&regions, ["Spain", "Italy", "Hubei, China"]);
        let visible = filter_selected(&regions, &state, 3);
        let names: Vec<&str> = visible.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Italy", "Hubei, China", "Spain"]);
        assert_eq!(visible[1].len(), 2);
    }

    #[test]
    fn test_filter_with_zero_days() {
        let regions = dataset();
        let state = SelectionState::seed(&regions, ["Italy"]);
        let visible = filter_selected(&regions, &state, 0);
        assert_eq!(visible.len(), 1);
        assert!(visible[0].is_empty());
    }
}
