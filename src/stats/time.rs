use chrono::Month;
use serde::Serialize;

use super::mode::{Modal, mode};
use crate::derive::Dataset;
use crate::error::{Error, Result};

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Most frequent month, weekday and start hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeStats {
    pub month: Modal<u8>,
    pub weekday: Modal<u8>,
    pub hour: Modal<u8>,
}

impl TimeStats {
    pub fn month_name(&self) -> &'static str {
        Month::try_from(self.month.value)
            .map(|m| m.name())
            .unwrap_or("unknown")
    }

    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES
            .get(usize::from(self.weekday.value))
            .copied()
            .unwrap_or("unknown")
    }
}

pub fn time_stats(dataset: &Dataset) -> Result<TimeStats> {
    let empty = || Error::EmptyDataset {
        statistic: "the most frequent times of travel",
    };
    let trips = &dataset.trips;

    Ok(TimeStats {
        month: mode(trips.iter().map(|t| t.month)).ok_or_else(empty)?,
        weekday: mode(trips.iter().map(|t| t.weekday)).ok_or_else(empty)?,
        hour: mode(trips.iter().map(|t| t.hour)).ok_or_else(empty)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::test_util::{dataset, trip};
    use crate::filter::{DayFilter, MonthFilter, filter};
    use crate::loader::ColumnSet;

    #[test]
    fn test_empty_dataset() {
        let ds = dataset(vec![], ColumnSet::default());
        let err = time_stats(&ds).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset { .. }));
    }

    #[test]
    fn test_modal_fields() {
        let ds = dataset(
            vec![
                trip("2017-03-06 17:10:00", "A", "B", 1.0),
                trip("2017-03-07 17:40:00", "A", "B", 1.0),
                trip("2017-04-06 08:00:00", "A", "B", 1.0),
            ],
            ColumnSet::default(),
        );
        let stats = time_stats(&ds).unwrap();
        assert_eq!(stats.month, Modal { value: 3, count: 2 });
        assert_eq!(stats.month_name(), "March");
        assert_eq!(stats.hour.value, 17);
        // Monday, Tuesday, Thursday: all tied, Monday is smallest.
        assert_eq!(stats.weekday.value, 0);
        assert_eq!(stats.weekday_name(), "Monday");
    }

    #[test]
    fn test_january_filter_scenario() {
        // months [1, 1, 2], weekdays [0, 0, 1]
        let ds = dataset(
            vec![
                trip("2017-01-02 08:00:00", "A", "B", 1.0),
                trip("2017-01-16 08:00:00", "A", "B", 1.0),
                trip("2017-02-07 08:00:00", "A", "B", 1.0),
            ],
            ColumnSet::default(),
        );
        let filtered = filter(ds, MonthFilter::Month(1), DayFilter::All);
        assert_eq!(filtered.len(), 2);
        assert_eq!(time_stats(&filtered).unwrap().weekday.value, 0);
    }
}
