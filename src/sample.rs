//! Random samples of raw trip records for display.

use std::fmt::Write;

use rand::Rng;
use rand::seq::index;

use crate::derive::{Dataset, DerivedTrip};

/// Records shown per "raw data" request.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

/// Picks up to `n` distinct trips uniformly at random, returned in source order.
pub fn raw_sample<'a, R: Rng + ?Sized>(
    dataset: &'a Dataset,
    n: usize,
    rng: &mut R,
) -> Vec<&'a DerivedTrip> {
    let amount = n.min(dataset.len());
    let mut picked = index::sample(rng, dataset.len(), amount).into_vec();
    picked.sort_unstable();
    picked.into_iter().map(|i| &dataset.trips[i]).collect()
}

/// Formats trips as a fixed-width table.
pub fn render_rows(trips: &[&DerivedTrip]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>8}  {:<19}  {:>9}  {:<30}  {:<30}  {:<10}  {:<6}  {:>5}",
        "row", "start time", "duration", "start station", "end station", "user type", "gender",
        "born"
    );
    for t in trips {
        let trip = &t.trip;
        let _ = writeln!(
            out,
            "{:>8}  {:<19}  {:>9.0}  {:<30}  {:<30}  {:<10}  {:<6}  {:>5}",
            trip.row,
            trip.start_time.format("%Y-%m-%d %H:%M:%S"),
            trip.trip_duration_seconds,
            truncate(&trip.start_station, 30),
            truncate(&trip.end_station, 30),
            trip.user_type.as_deref().unwrap_or("-"),
            trip.gender.as_deref().unwrap_or("-"),
            trip.birth_year.map_or_else(|| "-".to_string(), |y| y.to_string()),
        );
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(max - 1).collect();
        cut.push('…');
        cut
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::derive::test_util::{dataset, trip};
    use crate::loader::ColumnSet;

    fn ten_trips() -> Dataset {
        dataset(
            (0..10)
                .map(|i| trip("2017-01-02 08:00:00", &format!("S{i}"), "End", i as f64))
                .collect(),
            ColumnSet::default(),
        )
    }

    #[test]
    fn test_sample_is_distinct_and_ordered() {
        let ds = ten_trips();
        let mut rng = StdRng::seed_from_u64(7);
        let rows: Vec<u64> = raw_sample(&ds, 5, &mut rng).iter().map(|t| t.trip.row).collect();

        assert_eq!(rows.len(), 5);
        assert!(rows.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_larger_than_dataset() {
        let ds = ten_trips();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(raw_sample(&ds, 50, &mut rng).len(), 10);
    }

    #[test]
    fn test_sample_empty_dataset() {
        let ds = dataset(vec![], ColumnSet::default());
        let mut rng = StdRng::seed_from_u64(1);
        assert!(raw_sample(&ds, 5, &mut rng).is_empty());
    }

    #[test]
    fn test_render_rows() {
        let ds = ten_trips();
        let picked: Vec<_> = ds.trips.iter().take(2).collect();
        let text = render_rows(&picked);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("S0"));
        assert!(text.contains("2017-01-02 08:00:00"));
    }

    #[test]
    fn test_truncate_long_station_name() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
