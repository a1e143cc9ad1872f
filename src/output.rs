//! Output formatting and persistence for reports.
//!
//! Supports human-readable text, JSON serialization, and CSV summary append.

use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;

use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::filter::{DayFilter, MonthFilter};
use crate::stats::{
    BirthYearStats, CLEANED_BIRTH_YEAR_FLOOR, DurationStats, Report, Section, StationStats,
    TimeStats, UserStats, ValueCount,
};

const SEPARATOR_WIDTH: usize = 40;

/// Renders a report as the text shown to the user.
pub fn render(report: &Report) -> String {
    Rendered(report).to_string()
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Serializes the report as pretty-printed JSON.
pub fn to_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

struct Rendered<'a>(&'a Report);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "Bikeshare statistics for {} (month: {}, day: {}), {} trips",
            report.dataset, report.month, report.day, report.trip_count
        )?;
        separator(f)?;

        section(
            f,
            "Calculating The Most Frequent Times of Travel...",
            &report.time,
            write_time,
        )?;
        section(
            f,
            "Calculating The Most Popular Stations and Trip...",
            &report.stations,
            write_stations,
        )?;
        section(f, "Calculating Trip Duration...", &report.duration, write_duration)?;
        if let Some(users) = &report.users {
            section(f, "Calculating User Stats...", users, write_users)?;
        }
        if let Some(birth_years) = &report.birth_years {
            section(
                f,
                "Calculating Birth Year Stats...",
                birth_years,
                write_birth_years,
            )?;
        }
        Ok(())
    }
}

fn separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
}

fn section<T>(
    f: &mut fmt::Formatter<'_>,
    heading: &str,
    section: &Section<T>,
    body: fn(&mut fmt::Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    writeln!(f, "\n{heading}\n")?;
    match &section.outcome {
        Ok(value) => body(f, value)?,
        Err(e) => writeln!(f, "Sorry, {e}.")?,
    }
    writeln!(f, "\nThis took {} seconds.", section.elapsed.as_secs_f64())?;
    separator(f)
}

fn write_time(f: &mut fmt::Formatter<'_>, stats: &TimeStats) -> fmt::Result {
    writeln!(f, "Most common Month: {}", stats.month_name())?;
    writeln!(f, "Most common Day: {}", stats.weekday_name())?;
    writeln!(f, "Most Frequent Start Hour: {}", stats.hour.value)
}

fn write_stations(f: &mut fmt::Formatter<'_>, stats: &StationStats) -> fmt::Result {
    writeln!(
        f,
        "Most commonly used start station: {}",
        stats.start_station.value
    )?;
    writeln!(f, "Most commonly used end station: {}", stats.end_station.value)?;
    writeln!(
        f,
        "Most frequent combination of start station and end station: {} --> {} ({} trips)",
        stats.route.start_station, stats.route.end_station, stats.route.route_count
    )
}

fn write_duration(f: &mut fmt::Formatter<'_>, stats: &DurationStats) -> fmt::Result {
    writeln!(f, "Total travel time: {} (Days HH:MM:SS)", stats.total_display())?;
    writeln!(f, "Mean of travel time: {} (HH:MM:SS)", stats.mean_display())
}

fn write_users(f: &mut fmt::Formatter<'_>, stats: &UserStats) -> fmt::Result {
    if let Some(types) = &stats.user_types {
        writeln!(f, "Following user types apply:")?;
        write_counts(f, types)?;
    }
    if let Some(genders) = &stats.genders {
        if stats.user_types.is_some() {
            writeln!(f)?;
        }
        writeln!(f, "User split into gender as:")?;
        write_counts(f, genders)?;
    }
    Ok(())
}

fn write_counts(f: &mut fmt::Formatter<'_>, counts: &[ValueCount]) -> fmt::Result {
    if counts.is_empty() {
        return writeln!(f, "(no data)");
    }
    for c in counts {
        writeln!(f, "{} {}", c.value, c.count)?;
    }
    Ok(())
}

fn write_birth_years(f: &mut fmt::Formatter<'_>, stats: &BirthYearStats) -> fmt::Result {
    writeln!(f, "The earliest year of birth (not cleaned): {}", stats.earliest)?;
    match stats.earliest_cleaned {
        Some(year) => writeln!(f, "The earliest year of birth (cleaned): {year}")?,
        None => writeln!(
            f,
            "The earliest year of birth (cleaned): none after {CLEANED_BIRTH_YEAR_FLOOR}"
        )?,
    }
    writeln!(f, "The most recent year of birth: {}", stats.most_recent)?;
    writeln!(
        f,
        "The most common year of birth: {}",
        stats.most_common.value
    )
}

/// One flat CSV row per report.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    generated_at: DateTime<Utc>,
    dataset: &'a str,
    month: MonthFilter,
    day: DayFilter,
    trip_count: usize,
    popular_month: Option<u8>,
    popular_weekday: Option<u8>,
    popular_hour: Option<u8>,
    popular_start_station: Option<&'a str>,
    popular_end_station: Option<&'a str>,
    popular_route: Option<String>,
    total_duration_seconds: Option<u64>,
    mean_duration_seconds: Option<u64>,
    earliest_birth_year: Option<i32>,
    earliest_birth_year_cleaned: Option<i32>,
    most_recent_birth_year: Option<i32>,
    most_common_birth_year: Option<i32>,
}

impl<'a> SummaryRow<'a> {
    fn from_report(report: &'a Report) -> Self {
        let time = report.time.value();
        let stations = report.stations.value();
        let duration = report.duration.value();
        let births = report.birth_years.as_ref().and_then(Section::value);

        SummaryRow {
            generated_at: report.generated_at,
            dataset: &report.dataset,
            month: report.month,
            day: report.day,
            trip_count: report.trip_count,
            popular_month: time.map(|t| t.month.value),
            popular_weekday: time.map(|t| t.weekday.value),
            popular_hour: time.map(|t| t.hour.value),
            popular_start_station: stations.map(|s| s.start_station.value.as_str()),
            popular_end_station: stations.map(|s| s.end_station.value.as_str()),
            popular_route: stations
                .map(|s| format!("{} --> {}", s.route.start_station, s.route.end_station)),
            total_duration_seconds: duration.map(|d| d.total_seconds),
            mean_duration_seconds: duration.map(|d| d.mean_seconds),
            earliest_birth_year: births.map(|b| b.earliest),
            earliest_birth_year_cleaned: births.and_then(|b| b.earliest_cleaned),
            most_recent_birth_year: births.map(|b| b.most_recent),
            most_common_birth_year: births.map(|b| b.most_common.value),
        }
    }
}

/// Appends a one-row summary of `report` to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_summary(path: &Path, report: &Report) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV summary");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(SummaryRow::from_report(report))?;
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::test_util::{dataset, trip};
    use crate::loader::{ColumnSet, TripRecord};
    use std::fs;

    fn rider(start: &str, from: &str, to: &str, secs: f64, year: Option<i32>) -> TripRecord {
        let mut t = trip(start, from, to, secs);
        t.user_type = Some("Subscriber".to_string());
        t.birth_year = year;
        t
    }

    fn sample_report() -> Report {
        let ds = dataset(
            vec![
                rider("2017-01-02 08:00:00", "Clark St", "Lake St", 600.0, Some(1980)),
                rider("2017-01-02 08:30:00", "Clark St", "Lake St", 1200.0, Some(1911)),
                rider("2017-01-03 17:00:00", "Lake St", "Clark St", 90_000.0, None),
            ],
            ColumnSet {
                user_type: true,
                birth_year: true,
                ..Default::default()
            },
        );
        Report::compute(&ds, MonthFilter::Month(1), DayFilter::All)
    }

    #[test]
    fn test_render_full_report() {
        let text = render(&sample_report());
        assert!(text.starts_with("Bikeshare statistics for test (month: january, day: all), 3 trips"));
        assert!(text.contains("Most common Month: January"));
        assert!(text.contains("Most common Day: Monday"));
        assert!(text.contains("Most Frequent Start Hour: 8"));
        assert!(text.contains(
            "Most frequent combination of start station and end station: Clark St --> Lake St (2 trips)"
        ));
        assert!(text.contains("Total travel time: 1 day, 1:30:00 (Days HH:MM:SS)"));
        assert!(text.contains("Subscriber 3"));
        assert!(!text.contains("User split into gender as:"));
        assert!(text.contains("The earliest year of birth (not cleaned): 1911"));
        assert!(text.contains("The earliest year of birth (cleaned): 1980"));
    }

    #[test]
    fn test_render_omits_skipped_groups() {
        let ds = dataset(
            vec![trip("2017-01-02 08:00:00", "A", "B", 60.0)],
            ColumnSet::default(),
        );
        let text = render(&Report::compute(&ds, MonthFilter::All, DayFilter::All));
        assert!(!text.contains("User Stats"));
        assert!(!text.contains("Birth Year"));
        assert_eq!(text.matches("This took").count(), 3);
    }

    #[test]
    fn test_render_failed_section() {
        let ds = dataset(vec![], ColumnSet::default());
        let text = render(&Report::compute(&ds, MonthFilter::Month(2), DayFilter::Day(6)));
        assert!(text.contains("Sorry, no trips match the selected filters"));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stations"]["value"]["route"]["route_count"], 2);
        assert_eq!(value["month"], "january");
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
    }

    #[test]
    fn test_append_summary_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let report = sample_report();
        append_summary(&path, &report).unwrap();
        append_summary(&path, &report).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("generated_at,dataset,month,day,trip_count"));
        assert!(lines[1].contains(",test,january,all,3,1,0,8,Clark St,Lake St,"));
    }
}
