//! Frequency helpers shared by the statistic groups.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

/// The most frequent value of a column and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modal<T> {
    pub value: T,
    pub count: usize,
}

/// A distinct value and its number of occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Most frequent value; among equally frequent values the smallest wins.
///
/// Returns `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<Modal<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    // Ascending iteration + strict comparison keeps the smallest tied value.
    let mut best: Option<Modal<T>> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Modal { value, count });
        }
    }
    best
}

/// Counts of each distinct value, most frequent first.
///
/// Equal counts keep the order in which the values were first seen.
pub fn value_counts<'a, I>(values: I) -> Vec<ValueCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<ValueCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for value in values {
        match index.get(value) {
            Some(&i) => order[i].count += 1,
            None => {
                index.insert(value, order.len());
                order.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }
    // sort_by is stable.
    order.sort_by(|a, b| b.count.cmp(&a.count));
    order
}

/// Smallest and largest item of an iterator in one pass.
pub fn min_max<T, I>(values: I) -> Option<(T, T)>
where
    T: Ord + Copy,
    I: IntoIterator<Item = T>,
{
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
