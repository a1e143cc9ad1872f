use serde::Serialize;

use super::mode::{Modal, mode};
use crate::derive::Dataset;
use crate::error::{Error, Result};

/// The start/end pair with the highest route count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularRoute {
    pub start_station: String,
    pub end_station: String,
    /// Trips on this route in the unfiltered dataset.
    pub route_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub start_station: Modal<String>,
    pub end_station: Modal<String>,
    pub route: PopularRoute,
}

pub fn station_stats(dataset: &Dataset) -> Result<StationStats> {
    let empty = || Error::EmptyDataset {
        statistic: "the most popular stations and trip",
    };
    let trips = &dataset.trips;

    let start = mode(trips.iter().map(|t| t.trip.start_station.as_str())).ok_or_else(empty)?;
    let end = mode(trips.iter().map(|t| t.trip.end_station.as_str())).ok_or_else(empty)?;

    // First trip with the highest count wins ties.
    let best = trips
        .iter()
        .reduce(|best, t| if t.route_count > best.route_count { t } else { best })
        .ok_or_else(empty)?;

    Ok(StationStats {
        start_station: owned(start),
        end_station: owned(end),
        route: PopularRoute {
            start_station: best.trip.start_station.clone(),
            end_station: best.trip.end_station.clone(),
            route_count: best.route_count,
        },
    })
}

fn owned(m: Modal<&str>) -> Modal<String> {
    Modal {
        value: m.value.to_string(),
        count: m.count,
    }
}
