use super::model::{DayFilter, FilteredView, MonthFilter, TripRecord};

/// Keep the records whose derived month and weekday pass both filters.
///
/// Source order is preserved. `All` for a filter means no constraint, so
/// `apply(records, All, All)` returns every record.
pub fn apply(records: &[TripRecord], month: MonthFilter, day: DayFilter) -> Vec<TripRecord> {
    records
        .iter()
        .filter(|rec| month.matches(rec.month()) && day.matches(rec.weekday_name()))
        .cloned()
        .collect()
}

impl FilteredView {
    /// Narrow an existing view. The records are the intersection of both
    /// filters; the recorded selection keeps the old filter for a field only
    /// when the new one is `All`. Conflicting months or days therefore give
    /// an empty view labelled with the new filter.
    pub fn refilter(&self, month: MonthFilter, day: DayFilter) -> FilteredView {
        let mut selection = self.selection;
        if month != MonthFilter::All {
            selection.month = month;
        }
        if day != DayFilter::All {
            selection.day = day;
        }
        FilteredView::new(selection, self.schema, apply(self.records(), month, day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::ts;
    use crate::data::model::{City, FilterSelection, TripSchema};
    use chrono::Weekday;

    fn sample() -> Vec<TripRecord> {
        vec![
            // Sunday 1 Jan
            TripRecord::new(ts(2017, 1, 1, 9), 100, "A", "B"),
            // Monday 2 Jan
            TripRecord::new(ts(2017, 1, 2, 10), 200, "B", "C"),
            // Monday 6 Mar
            TripRecord::new(ts(2017, 3, 6, 11), 300, "C", "A"),
            // Friday 2 Jun
            TripRecord::new(ts(2017, 6, 2, 8), 400, "A", "C"),
            // Monday 26 Jun
            TripRecord::new(ts(2017, 6, 26, 18), 500, "B", "A"),
        ]
    }

    fn durations(records: &[TripRecord]) -> Vec<u64> {
        records.iter().map(|r| r.trip_duration).collect()
    }

    #[test]
    fn all_all_is_noop() {
        let records = sample();
        assert_eq!(apply(&records, MonthFilter::All, DayFilter::All), records);
    }

    #[test]
    fn month_filter_keeps_matching_months() {
        let kept = apply(&sample(), MonthFilter::Month(6), DayFilter::All);
        assert_eq!(durations(&kept), vec![400, 500]);
        assert!(kept.iter().all(|r| r.month() == 6));
    }

    #[test]
    fn day_filter_keeps_matching_weekdays_in_order() {
        let kept = apply(&sample(), MonthFilter::All, DayFilter::Day(Weekday::Mon));
        assert_eq!(durations(&kept), vec![200, 300, 500]);
    }

    #[test]
    fn combined_filters() {
        let kept = apply(&sample(), MonthFilter::Month(1), DayFilter::Day(Weekday::Mon));
        assert_eq!(durations(&kept), vec![200]);
    }

    #[test]
    fn no_match_yields_empty() {
        let kept = apply(&sample(), MonthFilter::Month(2), DayFilter::All);
        assert!(kept.is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let once = apply(&sample(), MonthFilter::Month(6), DayFilter::Day(Weekday::Mon));
        let twice = apply(&once, MonthFilter::Month(6), DayFilter::Day(Weekday::Mon));
        assert_eq!(once, twice);
    }

    #[test]
    fn refilter_view() {
        let selection = FilterSelection::new(City::Chicago, MonthFilter::All, DayFilter::All);
        let view = FilteredView::new(selection, TripSchema::default(), sample());

        assert_eq!(view.refilter(MonthFilter::All, DayFilter::All), view);

        let narrowed = view.refilter(MonthFilter::Month(1), DayFilter::All);
        assert_eq!(narrowed.len(), 2);
        assert_eq!(narrowed.selection.month, MonthFilter::Month(1));
        assert_eq!(narrowed.refilter(MonthFilter::Month(1), DayFilter::All), narrowed);

        let kept = narrowed.refilter(MonthFilter::All, DayFilter::Day(Weekday::Sun));
        assert_eq!(kept.selection.month, MonthFilter::Month(1));
        assert_eq!(kept.selection.day, DayFilter::Day(Weekday::Sun));
    }

    #[test]
    fn conflicting_refilter_is_empty_and_takes_new_label() {
        let selection = FilterSelection::new(City::Chicago, MonthFilter::Month(1), DayFilter::All);
        let january = FilteredView::new(
            selection,
            TripSchema::default(),
            apply(&sample(), MonthFilter::Month(1), DayFilter::All),
        );

        let june = january.refilter(MonthFilter::Month(6), DayFilter::All);
        assert!(june.is_empty());
        assert_eq!(june.selection.month, MonthFilter::Month(6));
    }
}
