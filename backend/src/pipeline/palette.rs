use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::RegionSeries;

/// The ten-colour categorical scheme lines are drawn with.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Colour per `Country/Region`, assigned in order of first appearance and
/// cycling through [`CATEGORY10`]. Sub-regions share their country's colour.
/// Serialized as a JSON object keyed by country name in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    colours: BTreeMap<String, &'static str>,
}

impl Palette {
    pub fn for_regions(regions: &[RegionSeries]) -> Self {
        let mut colours = BTreeMap::new();
        for region in regions {
            let next = CATEGORY10[colours.len() % CATEGORY10.len()];
            colours.entry(region.key.region.clone()).or_insert(next);
        }
        Self { colours }
    }

    pub fn colour(&self, region: &str) -> Option<&'static str> {
        self.colours.get(region).copied()
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }
}
