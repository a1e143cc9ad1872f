use serde::Serialize;

use crate::derive::Dataset;
use crate::error::{Error, Result};

const SECONDS_PER_DAY: u64 = 86_400;

/// Total and mean trip length, truncated to whole seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationStats {
    pub total_seconds: u64,
    pub mean_seconds: u64,
}

impl DurationStats {
    pub fn total_display(&self) -> String {
        format_elapsed(self.total_seconds)
    }

    pub fn mean_display(&self) -> String {
        format_elapsed(self.mean_seconds)
    }
}

pub fn duration_stats(dataset: &Dataset) -> Result<DurationStats> {
    if dataset.is_empty() {
        return Err(Error::EmptyDataset {
            statistic: "the mean trip duration",
        });
    }

    let total: f64 = dataset
        .trips
        .iter()
        .map(|t| t.trip.trip_duration_seconds)
        .sum();
    let mean = total / dataset.len() as f64;

    Ok(DurationStats {
        total_seconds: total as u64,
        mean_seconds: mean as u64,
    })
}

/// Renders seconds as `H:MM:SS`, prefixed by `N day(s), ` past one day.
pub fn format_elapsed(seconds: u64) -> String {
    let days = seconds / SECONDS_PER_DAY;
    let rem = seconds % SECONDS_PER_DAY;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::test_util::{dataset, trip};
    use crate::loader::ColumnSet;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(754), "0:12:34");
        assert_eq!(format_elapsed(86_400), "1 day, 0:00:00");
        assert_eq!(format_elapsed(3 * 86_400 + 4 * 3600 + 5 * 60 + 6), "3 days, 4:05:06");
    }

    #[test]
    fn test_sum_and_mean_truncate() {
        let ds = dataset(
            vec![
                trip("2017-01-02 08:00:00", "A", "B", 100.6),
                trip("2017-01-02 09:00:00", "A", "B", 200.7),
                trip("2017-01-02 10:00:00", "A", "B", 300.0),
            ],
            ColumnSet::default(),
        );
        let stats = duration_stats(&ds).unwrap();
        // 601.3 total, 200.43 mean
        assert_eq!(stats.total_seconds, 601);
        assert_eq!(stats.mean_seconds, 200);
        assert_eq!(stats.total_display(), "0:10:01");
    }

    #[test]
    fn test_mean_within_bounds() {
        let durations = [60.0, 61.0, 3600.0, 5.0, 900.0];
        let ds = dataset(
            durations
                .iter()
                .map(|d| trip("2017-01-02 08:00:00", "A", "B", *d))
                .collect(),
            ColumnSet::default(),
        );
        let stats = duration_stats(&ds).unwrap();
        assert!(stats.mean_seconds >= 5 && stats.mean_seconds <= 3600);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = dataset(vec![], ColumnSet::default());
        assert!(matches!(
            duration_stats(&ds),
            Err(Error::EmptyDataset { .. })
        ));
    }
}
