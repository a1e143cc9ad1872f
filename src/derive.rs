//! Calendar and route features attached to each trip.

use std::collections::HashMap;

use chrono::{Datelike, Timelike};
use serde::Serialize;
use tracing::debug;

use crate::loader::{ColumnSet, RawDataset, TripRecord};

/// A trip plus the fields derived from it at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTrip {
    #[serde(flatten)]
    pub trip: TripRecord,
    /// 1 = January.
    pub month: u8,
    /// 0 = Monday … 6 = Sunday.
    pub weekday: u8,
    pub hour: u8,
    /// Trips in the whole loaded dataset sharing this start/end pair.
    pub route_count: usize,
}

impl DerivedTrip {
    pub fn route(&self) -> (&str, &str) {
        (self.trip.start_station.as_str(), self.trip.end_station.as_str())
    }
}

/// An enriched dataset. Stages after derivation only ever drop trips.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub id: String,
    pub columns: ColumnSet,
    pub trips: Vec<DerivedTrip>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}

/// Derives month, weekday, hour and route counts for every record.
///
/// Route counts are taken over the entire input, so they must be computed
/// here and never after filtering.
#[tracing::instrument(skip(raw), fields(dataset = %raw.id, trips = raw.records.len()))]
pub fn derive(raw: RawDataset) -> Dataset {
    let counts: Vec<usize> = {
        let mut route_counts: HashMap<(&str, &str), usize> = HashMap::new();
        for record in &raw.records {
            *route_counts
                .entry((record.start_station.as_str(), record.end_station.as_str()))
                .or_insert(0) += 1;
        }
        debug!(routes = route_counts.len(), "Counted distinct routes");

        raw.records
            .iter()
            .map(|r| route_counts[&(r.start_station.as_str(), r.end_station.as_str())])
            .collect()
    };

    let trips = raw
        .records
        .into_iter()
        .zip(counts)
        .map(|(trip, route_count)| {
            let start = trip.start_time;
            DerivedTrip {
                month: start.month() as u8,
                weekday: start.weekday().num_days_from_monday() as u8,
                hour: start.hour() as u8,
                route_count,
                trip,
            }
        })
        .collect();

    Dataset {
        id: raw.id,
        columns: raw.columns,
        trips,
    }
}


#[cfg(test)]
mod tests {
    use super::test_util::{dataset, trip};
    use super::*;

    #[test]
    fn test_calendar_fields() {
        // 2017-01-01 was a Sunday.
        let ds = dataset(
            vec![trip("2017-01-01 23:59:00", "A", "B", 10.0)],
            ColumnSet::default(),
        );
        let t = &ds.trips[0];
        assert_eq!(t.month, 1);
        assert_eq!(t.weekday, 6);
        assert_eq!(t.hour, 23);
    }

    #[test]
    fn test_monday_is_zero() {
        let ds = dataset(
            vec![trip("2017-06-05 07:15:00", "A", "B", 10.0)],
            ColumnSet::default(),
        );
        assert_eq!(ds.trips[0].weekday, 0);
        assert_eq!(ds.trips[0].month, 6);
    }

    #[test]
    fn test_route_count_over_whole_input() {
        let ds = dataset(
            vec![
                trip("2017-01-02 08:00:00", "A", "B", 10.0),
                trip("2017-02-02 08:00:00", "A", "C", 10.0),
                trip("2017-03-02 08:00:00", "A", "B", 10.0),
                trip("2017-03-02 09:00:00", "B", "A", 10.0),
            ],
            ColumnSet::default(),
        );
        let counts: Vec<usize> = ds.trips.iter().map(|t| t.route_count).collect();
        assert_eq!(counts, vec![2, 1, 2, 1]);
    }

    #[test]
    fn test_order_preserved() {
        let ds = dataset(
            vec![
                trip("2017-05-01 08:00:00", "Z", "Y", 1.0),
                trip("2017-01-01 08:00:00", "A", "B", 2.0),
            ],
            ColumnSet::default(),
        );
        assert_eq!(ds.trips[0].route(), ("Z", "Y"));
        assert_eq!(ds.trips[1].route(), ("A", "B"));
        assert_eq!(ds.len(), 2);
    }
}
