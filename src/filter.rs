//! Month / weekday filtering.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::derive::Dataset;
use crate::error::Error;

/// Months covered by the trip logs, in calendar order.
pub const MONTH_NAMES: [&str; 6] = ["january", "february", "march", "april", "may", "june"];

/// Weekday abbreviations, Monday first.
pub const DAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const MONTH_EXPECTED: &str = "all, january, february, march, april, may, june";
const DAY_EXPECTED: &str = "all, mon, tue, wed, thu, fri, sat, sun";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthFilter {
    #[default]
    All,
    /// Calendar month, 1 = January.
    Month(u8),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayFilter {
    #[default]
    All,
    /// 0 = Monday.
    Day(u8),
}

impl MonthFilter {
    pub fn matches(&self, month: u8) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => *m == month,
        }
    }
}

impl DayFilter {
    pub fn matches(&self, weekday: u8) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(d) => *d == weekday,
        }
    }
}

impl FromStr for MonthFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        if token == "all" {
            return Ok(MonthFilter::All);
        }
        MONTH_NAMES
            .iter()
            .position(|name| *name == token)
            .map(|i| MonthFilter::Month(i as u8 + 1))
            .ok_or_else(|| Error::InvalidFilter {
                axis: "month",
                value: s.to_string(),
                expected: MONTH_EXPECTED,
            })
    }
}

impl FromStr for DayFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        if token == "all" {
            return Ok(DayFilter::All);
        }
        DAY_NAMES
            .iter()
            .position(|name| *name == token)
            .map(|i| DayFilter::Day(i as u8))
            .ok_or_else(|| Error::InvalidFilter {
                axis: "day",
                value: s.to_string(),
                expected: DAY_EXPECTED,
            })
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("all"),
            MonthFilter::Month(m) => match MONTH_NAMES.get(usize::from(*m).wrapping_sub(1)) {
                Some(name) => f.write_str(name),
                None => write!(f, "month {m}"),
            },
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("all"),
            DayFilter::Day(d) => match DAY_NAMES.get(usize::from(*d)) {
                Some(name) => f.write_str(name),
                None => write!(f, "day {d}"),
            },
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for DayFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Keeps the trips matching both filters, in their original order.
///
/// Derived fields of the surviving trips are left untouched.
pub fn filter(dataset: Dataset, month: MonthFilter, day: DayFilter) -> Dataset {
    let before = dataset.len();
    let trips: Vec<_> = dataset
        .trips
        .into_iter()
        .filter(|t| month.matches(t.month) && day.matches(t.weekday))
        .collect();
    debug!(%month, %day, before, after = trips.len(), "Applied filters");

    Dataset {
        id: dataset.id,
        columns: dataset.columns,
        trips,
    }
}
