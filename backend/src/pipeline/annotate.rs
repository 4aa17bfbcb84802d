use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::RegionSeries;

/// Attach event labels to the days of `region` whose date matches exactly.
///
/// Returns how many events found no matching day. Those are dropped: a
/// lockdown date outside the series (or on a missing day) is not moved to a
/// neighbouring day.
pub fn annotate(region: &mut RegionSeries, events: &BTreeMap<NaiveDate, String>) -> usize {
    let mut unmatched = 0;
    for (date, label) in events {
        match region.series.binary_search_by_key(date, |r| r.date) {
            Ok(i) => region.series[i].event = Some(label.clone()),
            Err(_) => unmatched += 1,
        }
    }
    unmatched
}
