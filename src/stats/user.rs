use super::{mode, value_counts, Outcome, Section};
use crate::data::model::{columns, FilteredView, TripRecord};
use crate::error::Warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

/// Who is riding. Blank cells are left out of every count.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    /// Most frequent first.
    pub user_types: Vec<(String, usize)>,
    pub genders: Section<Vec<(String, usize)>>,
    /// `NoData` when the column exists but every cell in the view is blank.
    pub birth_years: Section<Outcome<BirthYearStats>>,
}

pub fn user_stats(view: &FilteredView) -> Outcome<UserStats> {
    let records = view.records();
    if records.is_empty() {
        return Outcome::NoData;
    }

    let genders = if view.schema.has_gender {
        Section::Present(counts_of(records, |r| r.gender.as_deref()))
    } else {
        Section::NotAvailable(Warning::MissingColumn(columns::GENDER))
    };

    let birth_years = if view.schema.has_birth_year {
        Section::Present(birth_year_stats(records).into())
    } else {
        Section::NotAvailable(Warning::MissingColumn(columns::BIRTH_YEAR))
    };

    Outcome::Ready(UserStats {
        user_types: counts_of(records, |r| r.user_type.as_deref()),
        genders,
        birth_years,
    })
}

fn counts_of<F>(records: &[TripRecord], field: F) -> Vec<(String, usize)>
where
    F: Fn(&TripRecord) -> Option<&str>,
{
    value_counts(records.iter().filter_map(field))
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

fn birth_year_stats(records: &[TripRecord]) -> Option<BirthYearStats> {
    let years = || records.iter().filter_map(|r| r.birth_year);
    Some(BirthYearStats {
        earliest: years().min()?,
        most_recent: years().max()?,
        most_common: mode(years())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::ts;
    use crate::data::model::TripSchema;
    use crate::stats::tests::{view, view_with_schema};

    fn rider(user_type: &str, gender: Option<&str>, birth_year: Option<i32>) -> TripRecord {
        let mut rec = TripRecord::new(ts(2017, 5, 5, 8), 60, "A", "B");
        rec.user_type = Some(user_type.to_string());
        rec.gender = gender.map(str::to_string);
        rec.birth_year = birth_year;
        rec
    }

    fn full_schema() -> TripSchema {
        TripSchema {
            has_end_time: true,
            has_gender: true,
            has_birth_year: true,
        }
    }

    #[test]
    fn user_type_counts_descending() {
        let view = view(vec![
            rider("Subscriber", None, None),
            rider("Subscriber", None, None),
            rider("Customer", None, None),
        ]);

        let stats = user_stats(&view).ready().unwrap();
        assert_eq!(
            stats.user_types,
            vec![("Subscriber".to_string(), 2), ("Customer".to_string(), 1)]
        );
    }

    #[test]
    fn gender_and_birth_year_when_present() {
        let view = view_with_schema(
            full_schema(),
            vec![
                rider("Customer", Some("Female"), Some(1990)),
                rider("Subscriber", Some("Male"), Some(1975)),
                rider("Subscriber", Some("Male"), Some(1990)),
                rider("Subscriber", None, None),
                rider("Subscriber", Some("Female"), Some(2001)),
                rider("Subscriber", Some("Male"), Some(1975)),
            ],
        );

        let stats = user_stats(&view).ready().unwrap();
        assert_eq!(
            stats.genders,
            Section::Present(vec![("Male".to_string(), 3), ("Female".to_string(), 2)])
        );
        assert_eq!(
            stats.birth_years,
            Section::Present(Outcome::Ready(BirthYearStats {
                earliest: 1975,
                most_recent: 2001,
                // 1990 and 1975 tie; 1990 is seen first
                most_common: 1990,
            }))
        );
    }

    #[test]
    fn missing_columns_are_reported_not_available() {
        let schema = TripSchema {
            has_end_time: true,
            has_gender: false,
            has_birth_year: false,
        };
        let view = view_with_schema(schema, vec![rider("Subscriber", None, None)]);

        let stats = user_stats(&view).ready().unwrap();
        assert_eq!(
            stats.genders,
            Section::NotAvailable(Warning::MissingColumn("Gender"))
        );
        assert_eq!(
            stats.birth_years,
            Section::NotAvailable(Warning::MissingColumn("Birth Year"))
        );
    }

    #[test]
    fn present_but_blank_birth_years() {
        let view = view_with_schema(full_schema(), vec![rider("Customer", None, None)]);
        let stats = user_stats(&view).ready().unwrap();
        assert_eq!(stats.genders, Section::Present(Vec::new()));
        assert_eq!(stats.birth_years, Section::Present(Outcome::NoData));
    }

    #[test]
    fn blank_user_types_are_skipped() {
        let mut blank = rider("Customer", None, None);
        blank.user_type = None;
        let view = view(vec![blank, rider("Customer", None, None)]);
        let stats = user_stats(&view).ready().unwrap();
        assert_eq!(stats.user_types, vec![("Customer".to_string(), 1)]);
    }

    #[test]
    fn empty_view_has_no_data() {
        assert_eq!(user_stats(&view_with_schema(full_schema(), Vec::new())), Outcome::NoData);
    }
}
