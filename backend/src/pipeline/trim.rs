use crate::models::{DailyRecord, RegionSeries};

/// Suffix of `series` starting at the first day whose case count is strictly
/// above `threshold`. Empty when no day gets there.
///
/// Assumes `series` is ascending by date.
pub fn drop_cases_under(series: &[DailyRecord], threshold: f64) -> &[DailyRecord] {
    match series.iter().position(|r| r.cases.exceeds(threshold)) {
        Some(start) => &series[start..],
        None => &[],
    }
}

/// True when at least one day has a positive case count.
pub fn has_cases(region: &RegionSeries) -> bool {
    region.series.iter().any(|r| r.cases.exceeds(0.0))
}

/// Copy of `region` re-based on the first day above `threshold`.
pub fn trim_region(region: &RegionSeries, threshold: f64) -> RegionSeries {
    RegionSeries {
        series: drop_cases_under(&region.series, threshold).to_vec(),
        ..region.clone()
    }
}

/// Trim every region and drop the ones left without cases.
pub fn trim_dataset(regions: &[RegionSeries], threshold: f64) -> Vec<RegionSeries> {
    regions
        .iter()
        .map(|region| trim_region(region, threshold))
        .filter(has_cases)
        .collect()
}
