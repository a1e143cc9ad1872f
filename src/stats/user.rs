use serde::Serialize;

use super::mode::{ValueCount, value_counts};
use crate::derive::Dataset;

/// Rider breakdowns. A field is `None` when the dataset lacks that column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_types: Option<Vec<ValueCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genders: Option<Vec<ValueCount>>,
}

/// Returns `None` when neither `User Type` nor `Gender` is present.
pub fn user_stats(dataset: &Dataset) -> Option<UserStats> {
    let trips = &dataset.trips;
    let user_types = dataset
        .columns
        .user_type
        .then(|| value_counts(trips.iter().filter_map(|t| t.trip.user_type.as_deref())));
    let genders = dataset
        .columns
        .gender
        .then(|| value_counts(trips.iter().filter_map(|t| t.trip.gender.as_deref())));

    if user_types.is_none() && genders.is_none() {
        return None;
    }
    Some(UserStats {
        user_types,
        genders,
    })
}
