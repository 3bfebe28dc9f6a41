use super::{mode, Outcome};
use crate::data::model::{month_name, FilteredView, TripRecord};

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStats {
    /// 1-based month number.
    pub month: u32,
    pub month_name: &'static str,
    pub weekday: &'static str,
    /// Start hour, 0–23.
    pub hour: u32,
}

pub fn time_stats(view: &FilteredView) -> Outcome<TimeStats> {
    compute(view.records()).into()
}

fn compute(records: &[TripRecord]) -> Option<TimeStats> {
    let month = mode(records.iter().map(|r| r.month()))?;
    Some(TimeStats {
        month,
        month_name: month_name(month)?,
        weekday: mode(records.iter().map(|r| r.weekday_name()))?,
        hour: mode(records.iter().map(|r| r.hour()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::ts;
    use crate::stats::tests::view;

    #[test]
    fn most_frequent_month_day_hour() {
        let view = view(vec![
            TripRecord::new(ts(2017, 3, 6, 8), 1, "A", "B"),  // Mon
            TripRecord::new(ts(2017, 3, 7, 17), 1, "A", "B"), // Tue
            TripRecord::new(ts(2017, 5, 1, 17), 1, "A", "B"), // Mon
            TripRecord::new(ts(2017, 3, 13, 9), 1, "A", "B"), // Mon
        ]);

        let stats = time_stats(&view).ready().unwrap();
        assert_eq!(stats.month, 3);
        assert_eq!(stats.month_name, "March");
        assert_eq!(stats.weekday, "Monday");
        assert_eq!(stats.hour, 17);
    }

    #[test]
    fn ties_resolve_to_first_record() {
        let view = view(vec![
            TripRecord::new(ts(2017, 6, 2, 12), 1, "A", "B"), // Fri
            TripRecord::new(ts(2017, 1, 2, 7), 1, "A", "B"),  // Mon
        ]);

        let first = time_stats(&view);
        assert_eq!(first, time_stats(&view));
        let stats = first.ready().unwrap();
        assert_eq!(stats.month_name, "June");
        assert_eq!(stats.weekday, "Friday");
        assert_eq!(stats.hour, 12);
    }

    #[test]
    fn empty_view_has_no_data() {
        assert_eq!(time_stats(&view(Vec::new())), Outcome::NoData);
    }
}
