use super::model::TripRecord;

/// Records per raw-data page.
pub const PAGE_SIZE: usize = 5;

/// Return the page starting at `cursor` and the cursor of the following page.
///
/// The slice is clipped to the end of `records`; once `cursor` is past the
/// end the slice is empty, which is how callers detect the last page.
pub fn page(records: &[TripRecord], cursor: usize) -> (&[TripRecord], usize) {
    let start = cursor.min(records.len());
    let end = cursor.saturating_add(PAGE_SIZE).min(records.len());
    (&records[start..end], cursor.saturating_add(PAGE_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::ts;

    fn records(n: u64) -> Vec<TripRecord> {
        (0..n)
            .map(|i| TripRecord::new(ts(2017, 1, 2, 8), i, "A", "B"))
            .collect()
    }

    fn ids(page: &[TripRecord]) -> Vec<u64> {
        page.iter().map(|r| r.trip_duration).collect()
    }

    #[test]
    fn pages_through_twelve_records() {
        let view = records(12);

        let (p, next) = page(&view, 0);
        assert_eq!(ids(p), vec![0, 1, 2, 3, 4]);
        assert_eq!(next, 5);

        let (p, next) = page(&view, next);
        assert_eq!(ids(p), vec![5, 6, 7, 8, 9]);
        assert_eq!(next, 10);

        let (p, next) = page(&view, next);
        assert_eq!(ids(p), vec![10, 11]);
        assert_eq!(next, 15);

        let (p, _) = page(&view, next);
        assert!(p.is_empty());
    }

    #[test]
    fn empty_view_has_no_pages() {
        let (p, next) = page(&[], 0);
        assert!(p.is_empty());
        assert_eq!(next, PAGE_SIZE);
    }

    #[test]
    fn cursor_is_resumable() {
        let view = records(8);
        let (first, _) = page(&view, 3);
        let (again, _) = page(&view, 3);
        assert_eq!(first, again);
        assert_eq!(ids(first), vec![3, 4, 5, 6, 7]);
    }
}
