use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The per-day value a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Cases,
    Deaths,
    Recovered,
    CurrentCases,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Cases,
        Metric::Deaths,
        Metric::Recovered,
        Metric::CurrentCases,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
            Metric::CurrentCases => "current_cases",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cases" | "confirmed" => Ok(Self::Cases),
            "deaths" => Ok(Self::Deaths),
            "recovered" => Ok(Self::Recovered),
            "current_cases" | "current" | "active" => Ok(Self::CurrentCases),
            _ => Err(format!("Unknown metric: {}", s)),
        }
    }
}

/// Y-axis scale of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    Linear,
    #[default]
    Log,
}

impl FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "lin" => Ok(Self::Linear),
            "log" | "logarithmic" => Ok(Self::Log),
            _ => Err(format!("Unknown scale: {}", s)),
        }
    }
}
