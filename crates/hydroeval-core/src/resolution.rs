//! Temporal resolution of a discharge series.
//!
//! Parsed from pandas-style offset aliases (`"1D"`, `"3H"`, `"15min"`).
//! Only fixed-length frequencies are supported; monthly and annual offsets
//! have no constant step and cannot express a timing error.
use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

/// Base unit of a resolution. Ordered from finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    Second,
    Minute,
    Hourly,
    Daily,
    Weekly,
}

impl Frequency {
    /// Length of one unit in seconds.
    pub fn seconds(self) -> i64 {
        match self {
            Frequency::Second => 1,
            Frequency::Minute => 60,
            Frequency::Hourly => 3_600,
            Frequency::Daily => 86_400,
            Frequency::Weekly => 604_800,
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Frequency::Second => "s",
            Frequency::Minute => "min",
            Frequency::Hourly => "h",
            Frequency::Daily => "D",
            Frequency::Weekly => "W",
        }
    }

    fn from_alias(alias: &str) -> Option<Self> {
        match alias {
            "S" | "s" => Some(Frequency::Second),
            "T" | "min" => Some(Frequency::Minute),
            "H" | "h" => Some(Frequency::Hourly),
            "D" => Some(Frequency::Daily),
            "W" => Some(Frequency::Weekly),
            _ => None,
        }
    }
}

/// A fixed step: `multiple` units of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    multiple: u32,
    unit: Frequency,
}

impl Resolution {
    pub const DAILY: Resolution = Resolution {
        multiple: 1,
        unit: Frequency::Daily,
    };

    pub const HOURLY: Resolution = Resolution {
        multiple: 1,
        unit: Frequency::Hourly,
    };

    pub const HALF_DAY: Resolution = Resolution {
        multiple: 12,
        unit: Frequency::Hourly,
    };

    pub fn new(multiple: u32, unit: Frequency) -> Result<Self> {
        if multiple == 0 {
            return Err(EvalError::InvalidArgument(
                "resolution multiple must be positive".to_string(),
            ));
        }
        Ok(Self { multiple, unit })
    }

    pub fn multiple(&self) -> u32 {
        self.multiple
    }

    pub fn unit(&self) -> Frequency {
        self.unit
    }

    /// Step length in seconds.
    pub fn seconds(&self) -> i64 {
        i64::from(self.multiple) * self.unit.seconds()
    }

    /// Step length as a duration.
    pub fn step(&self) -> TimeDelta {
        // multiple is a u32, so the product stays far inside TimeDelta's range
        TimeDelta::seconds(self.seconds())
    }

    /// How many steps of `other` fit into one step of `self`.
    ///
    /// `"12h"` against `"1D"` gives 0.5; `"12h"` against `"1h"` gives 12.
    pub fn frequency_factor(&self, other: &Resolution) -> f64 {
        self.seconds() as f64 / other.seconds() as f64
    }

    /// Express a duration in units of this resolution.
    pub fn steps_in(&self, delta: TimeDelta) -> f64 {
        delta.num_milliseconds() as f64 / (self.seconds() as f64 * 1000.0)
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::DAILY
    }
}

impl FromStr for Resolution {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, alias) = s.split_at(split);

        let unit = Frequency::from_alias(alias).ok_or_else(|| {
            EvalError::InvalidArgument(format!("unsupported resolution {s:?}"))
        })?;
        let multiple = if digits.is_empty() {
            1
        } else {
            digits.parse::<u32>().map_err(|_| {
                EvalError::InvalidArgument(format!("resolution multiple out of range in {s:?}"))
            })?
        };
        Resolution::new(multiple, unit)
    }
}

impl TryFrom<String> for Resolution {
    type Error = EvalError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiple, self.unit.alias())
    }
}
