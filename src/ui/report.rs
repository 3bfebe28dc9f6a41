use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int32Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::data::model::{columns, TripRecord, TripSchema};
use crate::error::Warning;
use crate::stats::{DurationStats, Outcome, Section, StationStats, TimeStats, UserStats};

pub const SEPARATOR: &str = "----------------------------------------";

// ---------------------------------------------------------------------------
// Statistics reports
// ---------------------------------------------------------------------------

fn no_data() -> String {
    format!("{}.\n", capitalize(&Warning::EmptyResult.to_string()))
}

pub fn render_time(stats: &Outcome<TimeStats>) -> String {
    match stats {
        Outcome::NoData => no_data(),
        Outcome::Ready(s) => format!(
            "The month I see the most is {}.\n\
             The day I see the most is {}.\n\
             Popular starting hour is {}.\n",
            s.month_name, s.weekday, s.hour
        ),
    }
}

pub fn render_stations(stats: &Outcome<StationStats>) -> String {
    match stats {
        Outcome::NoData => no_data(),
        Outcome::Ready(s) => format!(
            "The most commonly used start station is {}.\n\
             The most commonly used end station is {}.\n\
             The most frequent trip combination is from {}.\n",
            s.start_station,
            s.end_station,
            s.trip_label()
        ),
    }
}

pub fn render_duration(stats: &Outcome<DurationStats>) -> String {
    match stats {
        Outcome::NoData => no_data(),
        Outcome::Ready(s) => format!(
            "The total trip duration is {}.\nThe average trip duration is {}.\n",
            s.total, s.mean
        ),
    }
}

fn render_counts(out: &mut String, counts: &[(String, usize)]) {
    let width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, count) in counts {
        let _ = writeln!(out, "{name:<width$}  {count}");
    }
}

pub fn render_users(stats: &Outcome<UserStats>) -> String {
    let s = match stats {
        Outcome::NoData => return no_data(),
        Outcome::Ready(s) => s,
    };

    let mut out = String::from("Here are the types of users:\n\n");
    render_counts(&mut out, &s.user_types);

    match &s.genders {
        Section::Present(counts) if counts.is_empty() => {
            out.push_str("\nNo gender details for these trips.\n");
        }
        Section::Present(counts) => {
            out.push_str("\nHere are the types of users by gender:\n\n");
            render_counts(&mut out, counts);
        }
        Section::NotAvailable(warning) => {
            let _ = writeln!(out, "\n{}.", capitalize(&warning.to_string()));
        }
    }

    match &s.birth_years {
        Section::Present(Outcome::Ready(years)) => {
            let _ = write!(
                out,
                "\nThe earliest year of birth: {}\n\
                 \nThe most recent year of birth: {}\n\
                 \nThe most common year of birth: {}\n",
                years.earliest, years.most_recent, years.most_common
            );
        }
        Section::Present(Outcome::NoData) => {
            out.push_str("\nNo birth year details for these trips.\n");
        }
        Section::NotAvailable(warning) => {
            let _ = writeln!(out, "\n{}.", capitalize(&warning.to_string()));
        }
    }

    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Raw data pages
// ---------------------------------------------------------------------------

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a page as a text table. `first_row` is the view position of
/// `records[0]` and fills the leading `#` column.
pub fn render_page(records: &[TripRecord], first_row: usize, schema: &TripSchema) -> Result<String> {
    let strings = |f: &dyn Fn(&TripRecord) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(records.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![Field::new("#", DataType::UInt64, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(UInt64Array::from(
        (first_row..first_row + records.len())
            .map(|i| i as u64)
            .collect::<Vec<_>>(),
    ))];

    for name in schema.column_names() {
        let array = match name {
            columns::START_TIME => {
                strings(&|r| Some(r.start_time().format(TIMESTAMP_FORMAT).to_string()))
            }
            columns::END_TIME => {
                strings(&|r| r.end_time.map(|t| t.format(TIMESTAMP_FORMAT).to_string()))
            }
            columns::TRIP_DURATION => Arc::new(UInt64Array::from(
                records.iter().map(|r| r.trip_duration).collect::<Vec<_>>(),
            )),
            columns::START_STATION => strings(&|r| Some(r.start_station.clone())),
            columns::END_STATION => strings(&|r| Some(r.end_station.clone())),
            columns::USER_TYPE => strings(&|r| r.user_type.clone()),
            columns::GENDER => strings(&|r| r.gender.clone()),
            columns::BIRTH_YEAR => Arc::new(Int32Array::from(
                records.iter().map(|r| r.birth_year).collect::<Vec<_>>(),
            )),
            _ => continue,
        };
        fields.push(Field::new(name, array.data_type().clone(), true));
        arrays.push(array);
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .context("building raw data table")?;
    let table = pretty_format_batches(&[batch]).context("formatting raw data table")?;
    Ok(table.to_string())
}
