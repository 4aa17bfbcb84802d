use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// A daily count read from a table cell.
///
/// A cell that does not start with an integer produces the invalid count. Invalid
/// counts survive arithmetic (`valid - invalid` is invalid) and never compare
/// greater than anything, so they never open a trimmed series or widen an extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Count(Option<i64>);

impl Count {
    /// The invalid-number sentinel.
    pub const INVALID: Count = Count(None);

    /// Create a valid count.
    pub fn new(value: i64) -> Self {
        Count(Some(value))
    }

    /// Parse the leading integer of a cell: optional sign then digits, trailing text
    /// ignored (`"12abc"` is 12, `"1.5"` is 1). Anything else is invalid.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (sign, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (-1, &trimmed[1..]),
            Some(b'+') => (1, &trimmed[1..]),
            _ => (1, trimmed),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return Count::INVALID;
        }
        digits[..end]
            .parse::<i64>()
            .map(|v| Count::new(sign * v))
            .unwrap_or(Count::INVALID)
    }

    /// The value, or `None` for the invalid sentinel.
    pub fn value(&self) -> Option<i64> {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// True only for a valid count strictly greater than `threshold`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.0.is_some_and(|v| v as f64 > threshold)
    }

    /// Replace the invalid sentinel with `fallback`.
    pub fn or(self, fallback: i64) -> Count {
        Count(Some(self.0.unwrap_or(fallback)))
    }
}

impl From<i64> for Count {
    fn from(v: i64) -> Self {
        Count::new(v)
    }
}

impl Sub for Count {
    type Output = Count;

    fn sub(self, rhs: Count) -> Count {
        match (self.0, rhs.0) {
            (Some(a), Some(b)) => Count(a.checked_sub(b)),
            _ => Count::INVALID,
        }
    }
}

impl FromStr for Count {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Count::parse(s))
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => write!(f, "NaN"),
        }
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<i64>::deserialize(deserializer).map(Count)
    }
}

/// What to do with a cell that does not hold a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidCountPolicy {
    /// Keep the invalid sentinel; derived values become invalid too.
    #[default]
    Propagate,
    /// Read the cell as zero.
    Zero,
    /// Remove the whole day from the region's series.
    DropRecord,
}

impl FromStr for InvalidCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "propagate" => Ok(Self::Propagate),
            "zero" => Ok(Self::Zero),
            "drop_record" | "drop" => Ok(Self::DropRecord),
            _ => Err(format!("Unknown invalid count policy: {}", s)),
        }
    }
}
