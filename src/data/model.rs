use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Calendar tables
// ---------------------------------------------------------------------------

/// Full month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// The datasets only cover January–June, so only those months can be filtered on.
pub const FILTERABLE_MONTHS: usize = 6;

/// Full weekday names, Monday first (matches `Weekday::num_days_from_monday`).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Name of a 1-based month number, `None` outside 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).checked_sub(1)?).copied()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAY_NAMES[day.num_days_from_monday() as usize]
}

/// Source column headers.
pub mod columns {
    pub const START_TIME: &str = "Start Time";
    pub const END_TIME: &str = "End Time";
    pub const TRIP_DURATION: &str = "Trip Duration";
    pub const START_STATION: &str = "Start Station";
    pub const END_STATION: &str = "End Station";
    pub const USER_TYPE: &str = "User Type";
    pub const GENDER: &str = "Gender";
    pub const BIRTH_YEAR: &str = "Birth Year";

    pub const REQUIRED: [&str; 5] = [START_TIME, TRIP_DURATION, START_STATION, END_STATION, USER_TYPE];
}

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// The cities with a bikeshare dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

impl City {
    /// Validate user text. Case and surrounding whitespace are ignored;
    /// `new york city` and `new_york_city` are both accepted.
    pub fn parse(input: &str) -> Option<Self> {
        let normalized = input.trim().to_ascii_lowercase().replace('_', " ");
        match normalized.as_str() {
            "chicago" => Some(City::Chicago),
            "new york city" => Some(City::NewYorkCity),
            "washington" => Some(City::Washington),
            _ => None,
        }
    }

    /// Default data file name for this city.
    pub fn default_file(self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            City::Chicago => "Chicago",
            City::NewYorkCity => "New York City",
            City::Washington => "Washington",
        };
        f.write_str(name)
    }
}

/// Month filter: everything, or one 1-based month in January–June.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

impl MonthFilter {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Some(MonthFilter::All);
        }
        MONTH_NAMES[..FILTERABLE_MONTHS]
            .iter()
            .position(|name| name.eq_ignore_ascii_case(input))
            .map(|idx| MonthFilter::Month(idx as u32 + 1))
    }

    pub fn matches(self, month: u32) -> bool {
        match self {
            MonthFilter::All => true,
            MonthFilter::Month(m) => m == month,
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::All => f.write_str("All"),
            MonthFilter::Month(m) => f.write_str(month_name(*m).unwrap_or("?")),
        }
    }
}

/// Day-of-week filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl DayFilter {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("all") {
            return Some(DayFilter::All);
        }
        WEEKDAY_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(input))
            .map(|idx| DayFilter::Day(WEEKDAYS[idx]))
    }

    /// Case-insensitive comparison against a weekday name.
    pub fn matches(self, name: &str) -> bool {
        match self {
            DayFilter::All => true,
            DayFilter::Day(day) => weekday_name(day).eq_ignore_ascii_case(name),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::All => f.write_str("All"),
            DayFilter::Day(day) => f.write_str(weekday_name(*day)),
        }
    }
}

/// What the user asked to see in one session iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSelection {
    pub city: City,
    pub month: MonthFilter,
    pub day: DayFilter,
}

impl FilterSelection {
    pub fn new(city: City, month: MonthFilter, day: DayFilter) -> Self {
        Self { city, month, day }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (month: {}, day: {})", self.city, self.month, self.day)
    }
}

// ---------------------------------------------------------------------------
// TripRecord – one row of a city dataset
// ---------------------------------------------------------------------------

/// A single bikeshare trip.
///
/// `month`, `weekday_name` and `hour` are derived from `start_time` when the
/// record is built and cannot be changed afterwards, so `start_time` is only
/// reachable through an accessor.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Whole seconds.
    pub trip_duration: u64,
    pub start_station: String,
    pub end_station: String,
    /// `None` for a blank cell.
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    month: u32,
    weekday_name: &'static str,
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration: u64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type: None,
            gender: None,
            birth_year: None,
            month: start_time.month(),
            weekday_name: weekday_name(start_time.weekday()),
            hour: start_time.hour(),
        }
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    /// 1-based month of `start_time`.
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn weekday_name(&self) -> &'static str {
        self.weekday_name
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }
}

// ---------------------------------------------------------------------------
// TripSchema – which optional columns a dataset carries
// ---------------------------------------------------------------------------

/// Optional columns are a property of the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TripSchema {
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl TripSchema {
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let has = |name: &str| headers.iter().any(|h| h.as_ref() == name);
        Self {
            has_end_time: has(columns::END_TIME),
            has_gender: has(columns::GENDER),
            has_birth_year: has(columns::BIRTH_YEAR),
        }
    }

    /// Every schema column, required ones first.
    pub fn column_names(&self) -> Vec<&'static str> {
        let mut names = vec![columns::START_TIME];
        if self.has_end_time {
            names.push(columns::END_TIME);
        }
        names.extend([
            columns::TRIP_DURATION,
            columns::START_STATION,
            columns::END_STATION,
            columns::USER_TYPE,
        ]);
        if self.has_gender {
            names.push(columns::GENDER);
        }
        if self.has_birth_year {
            names.push(columns::BIRTH_YEAR);
        }
        names
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the working subset for one session iteration
// ---------------------------------------------------------------------------

/// Records matching a selection, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    pub selection: FilterSelection,
    pub schema: TripSchema,
    records: Vec<TripRecord>,
}

impl FilteredView {
    pub fn new(selection: FilterSelection, schema: TripSchema, records: Vec<TripRecord>) -> Self {
        Self {
            selection,
            schema,
            records,
        }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Build a timestamp for fixtures.
    pub(crate) fn ts(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 15, 0)
            .unwrap()
    }

    #[test]
    fn derived_fields_follow_start_time() {
        // 2017-03-06 was a Monday.
        let rec = TripRecord::new(ts(2017, 3, 6, 17), 300, "A", "B");
        assert_eq!(rec.month(), 3);
        assert_eq!(rec.weekday_name(), "Monday");
        assert_eq!(rec.hour(), 17);
    }

    #[test]
    fn city_parse_accepts_variants() {
        assert_eq!(City::parse(" Chicago "), Some(City::Chicago));
        assert_eq!(City::parse("NEW YORK CITY"), Some(City::NewYorkCity));
        assert_eq!(City::parse("new_york_city"), Some(City::NewYorkCity));
        assert_eq!(City::parse("boston"), None);
    }

    #[test]
    fn month_parse_limited_to_first_half() {
        assert_eq!(MonthFilter::parse("all"), Some(MonthFilter::All));
        assert_eq!(MonthFilter::parse("January"), Some(MonthFilter::Month(1)));
        assert_eq!(MonthFilter::parse("june"), Some(MonthFilter::Month(6)));
        assert_eq!(MonthFilter::parse("july"), None);
        assert_eq!(MonthFilter::parse(""), None);
    }

    #[test]
    fn day_parse_and_match() {
        let friday = DayFilter::parse("FRIDAY").unwrap();
        assert_eq!(friday, DayFilter::Day(Weekday::Fri));
        assert!(friday.matches("friday"));
        assert!(!friday.matches("Monday"));
        assert!(DayFilter::All.matches("Sunday"));
        assert_eq!(DayFilter::parse("someday"), None);
    }

    #[test]
    fn schema_detects_optional_columns() {
        let schema = TripSchema::from_headers(&["", "Start Time", "Trip Duration", "Gender"]);
        assert!(schema.has_gender);
        assert!(!schema.has_birth_year);
        assert!(!schema.has_end_time);
    }

    #[test]
    fn month_names_lookup() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
