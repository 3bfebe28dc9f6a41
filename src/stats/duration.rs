use std::fmt;

use super::Outcome;
use crate::data::model::FilteredView;

/// A number of seconds split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u128,
    pub minutes: u128,
    pub seconds: u128,
}

impl Hms {
    /// Same split for every magnitude: `minutes` is always below 60.
    pub fn from_seconds(total: u128) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total / 60) % 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} hours, {} minutes and {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationStats {
    /// Wide enough that summing any loaded view cannot overflow.
    pub total_seconds: u128,
    /// Mean rounded to the nearest second. Halves round up, not to even, so
    /// a 2.5 s mean reports 3 rather than 2.
    pub mean_seconds: u64,
    pub total: Hms,
    pub mean: Hms,
}

pub fn trip_duration_stats(view: &FilteredView) -> Outcome<DurationStats> {
    let records = view.records();
    if records.is_empty() {
        return Outcome::NoData;
    }

    let total_seconds: u128 = records.iter().map(|r| u128::from(r.trip_duration)).sum();
    let n = records.len() as u128;
    // Never above the largest duration, so it fits back into u64.
    let mean = (2 * total_seconds + n) / (2 * n);
    let mean_seconds = u64::try_from(mean).unwrap_or(u64::MAX);

    Outcome::Ready(DurationStats {
        total_seconds,
        mean_seconds,
        total: Hms::from_seconds(total_seconds),
        mean: Hms::from_seconds(mean),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::ts;
    use crate::data::model::TripRecord;
    use crate::stats::tests::view;

    fn durations(secs: &[u64]) -> FilteredView {
        view(
            secs.iter()
                .map(|&s| TripRecord::new(ts(2017, 2, 1, 9), s, "A", "B"))
                .collect(),
        )
    }

    #[test]
    fn total_and_mean() {
        let stats = trip_duration_stats(&durations(&[60, 120, 180])).ready().unwrap();
        assert_eq!(stats.total_seconds, 360);
        assert_eq!(stats.total, Hms { hours: 0, minutes: 6, seconds: 0 });
        assert_eq!(stats.mean_seconds, 120);
        assert_eq!(stats.mean, Hms { hours: 0, minutes: 2, seconds: 0 });
    }

    #[test]
    fn mean_rounds_to_nearest_second() {
        let stats = trip_duration_stats(&durations(&[1, 2])).ready().unwrap();
        assert_eq!(stats.mean_seconds, 2);
        let stats = trip_duration_stats(&durations(&[1, 1, 2])).ready().unwrap();
        assert_eq!(stats.mean_seconds, 1);
        let stats = trip_duration_stats(&durations(&[2, 3])).ready().unwrap();
        assert_eq!(stats.mean_seconds, 3);
    }

    #[test]
    fn decomposition_is_uniform() {
        assert_eq!(
            Hms::from_seconds(3 * 3600 + 59 * 60 + 7),
            Hms { hours: 3, minutes: 59, seconds: 7 }
        );
        // one hour exactly: minutes must not overflow into 60
        assert_eq!(Hms::from_seconds(3600), Hms { hours: 1, minutes: 0, seconds: 0 });
        assert_eq!(Hms::from_seconds(59), Hms { hours: 0, minutes: 0, seconds: 59 });
        assert_eq!(
            Hms::from_seconds(100 * 3600 + 1),
            Hms { hours: 100, minutes: 0, seconds: 1 }
        );
    }

    #[test]
    fn display() {
        assert_eq!(
            Hms::from_seconds(3725).to_string(),
            "1 hours, 2 minutes and 5 seconds"
        );
    }

    #[test]
    fn extreme_durations_do_not_overflow() {
        let stats = trip_duration_stats(&durations(&[u64::MAX, 5, u64::MAX])).ready().unwrap();
        let expected_total = 2 * u128::from(u64::MAX) + 5;
        assert_eq!(stats.total_seconds, expected_total);
        assert_eq!(stats.total.hours, expected_total / 3600);
        assert!(stats.mean_seconds > u64::MAX / 2);
    }

    #[test]
    fn empty_view_has_no_data() {
        assert_eq!(trip_duration_stats(&durations(&[])), Outcome::NoData);
    }
}
