use serde::Serialize;

use super::mode::{Modal, min_max, mode};
use crate::derive::Dataset;

/// Birth years at or below this are treated as typos (e.g. 1916 for 2016)
/// when computing the cleaned earliest year. Other statistics keep them.
pub const CLEANED_BIRTH_YEAR_FLOOR: i32 = 1916;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    /// Minimum over every recorded year.
    pub earliest: i32,
    /// Minimum over years above [`CLEANED_BIRTH_YEAR_FLOOR`].
    pub earliest_cleaned: Option<i32>,
    pub most_recent: i32,
    pub most_common: Modal<i32>,
}

/// Returns `None` if the column is absent or no trip records a birth year.
pub fn birth_year_stats(dataset: &Dataset) -> Option<BirthYearStats> {
    if !dataset.columns.birth_year {
        return None;
    }
    let years = || dataset.trips.iter().filter_map(|t| t.trip.birth_year);

    let (earliest, most_recent) = min_max(years())?;
    let earliest_cleaned = years().filter(|y| *y > CLEANED_BIRTH_YEAR_FLOOR).min();
    let most_common = mode(years())?;

    Some(BirthYearStats {
        earliest,
        earliest_cleaned,
        most_recent,
        most_common,
    })
}
