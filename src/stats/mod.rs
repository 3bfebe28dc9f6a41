//! Statistics over a filtered view.
//!
//! Every routine takes `&FilteredView` and returns a structured report; none
//! of them keep state, so they can run in any order. Rendering lives in
//! `ui::report`.
//!
//! Ties: whenever several values share the highest frequency, the one that
//! appears first in the view (source order) is reported. `value_counts`
//! breaks count ties the same way.

pub mod duration;
pub mod station;
pub mod time;
pub mod user;

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::Warning;

pub use duration::{trip_duration_stats, DurationStats, Hms};
pub use station::{station_stats, StationStats};
pub use time::{time_stats, TimeStats};
pub use user::{user_stats, BirthYearStats, UserStats};

/// Result of a routine that needs at least one value to say anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ready(T),
    NoData,
}

impl<T> Outcome<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            Outcome::Ready(value) => Some(value),
            Outcome::NoData => None,
        }
    }
}

impl<T> From<Option<T>> for Outcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Outcome::NoData, Outcome::Ready)
    }
}

/// A report section backed by an optional column.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Present(T),
    NotAvailable(Warning),
}

/// Count and first position of every distinct value.
fn tally<T, I>(values: I) -> HashMap<T, (usize, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut counts: HashMap<T, (usize, usize)> = HashMap::new();
    for (idx, value) in values.into_iter().enumerate() {
        counts.entry(value).or_insert((0, idx)).0 += 1;
    }
    counts
}

/// Most frequent value; ties go to the value seen first. `None` when empty.
pub fn mode<T, I>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    tally(values)
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

/// Occurrences per distinct value, most frequent first.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    I: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    let mut counts: Vec<(T, (usize, usize))> = tally(values).into_iter().collect();
    counts.sort_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });
    counts
        .into_iter()
        .map(|(value, (count, _))| (value, count))
        .collect()
}
