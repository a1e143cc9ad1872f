//! Descriptive statistics over a filtered trip dataset.
//!
//! Every group reads the dataset immutably and is timed on its own. A group
//! that needs at least one trip reports [`Error::EmptyDataset`] in its
//! [`Section`] without affecting the others. Groups backed by optional
//! columns are left out of the [`Report`] when the columns are absent.

pub mod birth_year;
pub mod duration;
pub mod mode;
pub mod station;
pub mod time;
pub mod user;

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::derive::Dataset;
use crate::error::{Error, Result};
use crate::filter::{DayFilter, MonthFilter};

pub use birth_year::{BirthYearStats, CLEANED_BIRTH_YEAR_FLOOR, birth_year_stats};
pub use duration::{DurationStats, duration_stats, format_elapsed};
pub use mode::{Modal, ValueCount};
pub use station::{PopularRoute, StationStats, station_stats};
pub use time::{TimeStats, time_stats};
pub use user::{UserStats, user_stats};

/// One statistic group's outcome and how long it took to compute.
#[derive(Debug)]
pub struct Section<T> {
    pub elapsed: Duration,
    pub outcome: Result<T>,
}

impl<T> Section<T> {
    fn run(name: &'static str, f: impl FnOnce() -> Result<T>) -> Self {
        let (elapsed, outcome) = timed(f);
        match &outcome {
            Ok(_) => debug!(section = name, elapsed_us = elapsed.as_micros() as u64, "Computed"),
            Err(e) => debug!(section = name, error = %e, "Statistic unavailable"),
        }
        Section { elapsed, outcome }
    }

    /// Like [`Section::run`] for groups that may be skipped entirely.
    fn run_optional(name: &'static str, f: impl FnOnce() -> Option<T>) -> Option<Self> {
        let (elapsed, value) = timed(f);
        match value {
            Some(value) => {
                debug!(section = name, elapsed_us = elapsed.as_micros() as u64, "Computed");
                Some(Section {
                    elapsed,
                    outcome: Ok(value),
                })
            }
            None => {
                debug!(section = name, "Skipped, column not available");
                None
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        self.outcome.as_ref().ok()
    }
}

impl<T: Serialize> Serialize for Section<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Section", 2)?;
        state.serialize_field("elapsed_secs", &self.elapsed.as_secs_f64())?;
        match &self.outcome {
            Ok(value) => state.serialize_field("value", value)?,
            Err(e) => state.serialize_field("error", &e.to_string())?,
        }
        state.end()
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (Duration, T) {
    let start = Instant::now();
    let value = f();
    (start.elapsed(), value)
}

/// The complete set of statistics for one dataset and filter selection.
#[derive(Debug, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub dataset: String,
    pub month: MonthFilter,
    pub day: DayFilter,
    pub trip_count: usize,
    pub time: Section<TimeStats>,
    pub stations: Section<StationStats>,
    pub duration: Section<DurationStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Section<UserStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_years: Option<Section<BirthYearStats>>,
}

impl Report {
    /// Computes every statistic group over an already filtered dataset.
    ///
    /// `month` and `day` only label the report.
    #[tracing::instrument(skip(dataset), fields(dataset = %dataset.id, trips = dataset.len()))]
    pub fn compute(dataset: &Dataset, month: MonthFilter, day: DayFilter) -> Self {
        Report {
            generated_at: Utc::now(),
            dataset: dataset.id.clone(),
            month,
            day,
            trip_count: dataset.len(),
            time: Section::run("time", || time_stats(dataset)),
            stations: Section::run("stations", || station_stats(dataset)),
            duration: Section::run("duration", || duration_stats(dataset)),
            users: Section::run_optional("users", || user_stats(dataset)),
            birth_years: Section::run_optional("birth_years", || birth_year_stats(dataset)),
        }
    }

    /// Sections that failed, with their error.
    pub fn failures(&self) -> Vec<(&'static str, &Error)> {
        let mut failures = Vec::new();
        if let Err(e) = &self.time.outcome {
            failures.push(("time", e));
        }
        if let Err(e) = &self.stations.outcome {
            failures.push(("stations", e));
        }
        if let Err(e) = &self.duration.outcome {
            failures.push(("duration", e));
        }
        failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::test_util::{dataset, trip};
    use crate::loader::ColumnSet;

    #[test]
    fn test_report_on_empty_dataset_isolates_failures() {
        let ds = dataset(
            vec![],
            ColumnSet {
                user_type: true,
                birth_year: true,
                ..Default::default()
            },
        );
        let report = Report::compute(&ds, MonthFilter::Month(4), DayFilter::All);

        assert_eq!(report.trip_count, 0);
        assert_eq!(report.failures().len(), 3);
        // User counts are still reported, birth years have nothing to show.
        assert!(report.users.as_ref().unwrap().value().is_some());
        assert!(report.birth_years.is_none());
    }

    #[test]
    fn test_report_skips_missing_groups() {
        let ds = dataset(
            vec![trip("2017-01-02 08:00:00", "A", "B", 60.0)],
            ColumnSet::default(),
        );
        let report = Report::compute(&ds, MonthFilter::All, DayFilter::All);
        assert!(report.failures().is_empty());
        assert!(report.users.is_none());
        assert!(report.birth_years.is_none());
    }

    #[test]
    fn test_section_serializes_error_as_message() {
        let ds = dataset(vec![], ColumnSet::default());
        let report = Report::compute(&ds, MonthFilter::All, DayFilter::Day(2));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["day"], "wed");
        assert!(json["time"]["error"].as_str().unwrap().contains("no trips"));
        assert!(json["time"].get("value").is_none());
        assert!(json.get("birth_years").is_none());
    }
}
