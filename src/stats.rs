use std::collections::BTreeMap;

use crate::models::Trip;

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount<T> {
    pub value: T,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub value: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationParts {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// Occurrence counts, highest first. Equal counts keep ascending value order.
pub fn value_counts<T, I>(values: I) -> Vec<ValueCount<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut ranked: Vec<ValueCount<T>> = counts
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

pub fn mode<T, I>(values: I) -> Option<ValueCount<T>>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next()
}

/// Category counts with their share of all counted values.
pub fn breakdown<I>(values: I) -> Vec<Share>
where
    I: IntoIterator<Item = String>,
{
    let ranked = value_counts(values);
    let total: usize = ranked.iter().map(|entry| entry.count).sum();

    ranked
        .into_iter()
        .map(|entry| Share {
            percent: round3(entry.count as f64 / total as f64 * 100.0),
            value: entry.value,
            count: entry.count,
        })
        .collect()
}

/// Splits the whole seconds of `total` into days, hours, minutes and seconds.
pub fn decompose(total: f64) -> DurationParts {
    let whole = total.max(0.0).floor() as u64;
    DurationParts {
        days: whole / SECONDS_PER_DAY,
        hours: whole % SECONDS_PER_DAY / SECONDS_PER_HOUR,
        minutes: whole % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
        seconds: whole % SECONDS_PER_MINUTE,
    }
}

fn durations(trips: &[Trip]) -> impl Iterator<Item = f64> + '_ {
    trips.iter().filter_map(|trip| trip.record.trip_duration)
}

/// Sum of the known durations; blank ones are skipped.
pub fn total_duration(trips: &[Trip]) -> f64 {
    durations(trips).sum()
}

pub fn mean_duration(trips: &[Trip]) -> Option<f64> {
    let known = durations(trips).count();
    if known == 0 {
        return None;
    }
    Some(total_duration(trips) / known as f64)
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
