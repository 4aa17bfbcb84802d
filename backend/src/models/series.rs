use chrono::NaiveDate;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::count::Count;
use super::metric::Metric;
use super::region::RegionKey;

/// One day of one region.
///
/// `current_cases` is always derived from the other three counts and is only
/// materialized when serialized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cases: Count,
    pub deaths: Count,
    pub recovered: Count,
    #[serde(default)]
    pub event: Option<String>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, cases: Count, deaths: Count, recovered: Count) -> Self {
        Self {
            date,
            cases,
            deaths,
            recovered,
            event: None,
        }
    }

    /// Cases that are neither dead nor recovered.
    pub fn current_cases(&self) -> Count {
        self.cases - self.deaths - self.recovered
    }

    pub fn value(&self, metric: Metric) -> Count {
        match metric {
            Metric::Cases => self.cases,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::CurrentCases => self.current_cases(),
        }
    }
}

impl Serialize for DailyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DailyRecord", 6)?;
        state.serialize_field("date", &self.date)?;
        state.serialize_field("cases", &self.cases)?;
        state.serialize_field("deaths", &self.deaths)?;
        state.serialize_field("recovered", &self.recovered)?;
        state.serialize_field("current_cases", &self.current_cases())?;
        state.serialize_field("event", &self.event)?;
        state.end()
    }
}

/// A region and its daily records, ascending by date with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSeries {
    pub key: RegionKey,
    pub display_name: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub series: Vec<DailyRecord>,
}

impl RegionSeries {
    pub fn new(key: RegionKey, series: Vec<DailyRecord>) -> Self {
        let display_name = key.display_name();
        Self {
            key,
            display_name,
            lat: None,
            long: None,
            series,
        }
    }

    pub fn with_coordinates(mut self, lat: Option<f64>, long: Option<f64>) -> Self {
        self.lat = lat;
        self.long = long;
        self
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Records carrying a lockdown annotation.
    pub fn events(&self) -> impl Iterator<Item = &DailyRecord> {
        self.series.iter().filter(|r| r.event.is_some())
    }
}
