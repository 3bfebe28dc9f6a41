use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use arrow::array::timezone::Tz;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    ArrowTimestampType, DataType, TimeUnit, TimestampMicrosecondType, TimestampMillisecondType,
    TimestampNanosecondType, TimestampSecondType,
};
use arrow::util::display::array_value_to_string;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::filter;
use super::model::{columns, FilterSelection, FilteredView, TripRecord, TripSchema};
use crate::config::Config;
use crate::error::DataFormatError;

type Result<T> = std::result::Result<T, DataFormatError>;

/// Every record of one city file, before filtering.
#[derive(Debug, Clone)]
pub struct TripDataset {
    pub schema: TripSchema,
    pub records: Vec<TripRecord>,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the selected city's trips and apply the month and day filters.
///
/// A single unparseable row fails the whole load rather than being skipped,
/// so statistics are never computed over a silently truncated dataset.
pub fn load(config: &Config, selection: FilterSelection) -> Result<FilteredView> {
    let path = config.city_path(selection.city);
    let dataset = load_file(&path).inspect_err(|err| {
        warn!("Loading {} failed: {err}", path.display());
    })?;

    let total = dataset.records.len();
    let records = filter::apply(&dataset.records, selection.month, selection.day);
    info!(
        "{}: kept {} of {total} trips for {selection}",
        selection.city,
        records.len()
    );

    Ok(FilteredView::new(selection, dataset.schema, records))
}

/// Load a trip dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the bikeshare column names (the published layout)
/// * `.json`    – `[{ "Start Time": "...", "Trip Duration": 300, ... }, ...]`
/// * `.parquet` – one column per field; timestamps as strings or Arrow timestamps
pub fn load_file(path: &Path) -> Result<TripDataset> {
    if !path.exists() {
        return Err(DataFormatError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataFormatError::UnsupportedFormat(other.to_string())),
    };

    info!("Loaded {} trips from {}", dataset.records.len(), path.display());
    debug!("Schema of {}: {:?}", path.display(), dataset.schema);
    Ok(dataset)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// The published city files: a header row, an unnamed index column, then the
/// trip columns. Washington has no `Gender` / `Birth Year` columns.
fn load_csv(path: &Path) -> Result<TripDataset> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    check_required(&headers)?;
    let schema = TripSchema::from_headers(&headers);
    let positions: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = result?;
        let cell = |column: &'static str| {
            positions
                .get(column)
                .and_then(|&pos| record.get(pos))
                .and_then(non_blank)
        };
        records.push(build_record(row, &schema, cell)?);
    }

    Ok(TripDataset { schema, records })
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// The schema is the union of keys across all records.
fn load_json(path: &Path) -> Result<TripDataset> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let rows = root.as_array().ok_or_else(|| DataFormatError::InvalidRow {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut keys = BTreeSet::new();
    for (idx, rec) in rows.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataFormatError::InvalidRow {
            row: idx + 1,
            message: "not a JSON object".to_string(),
        })?;
        keys.extend(obj.keys().map(String::as_str));
    }

    let keys: Vec<&str> = keys.into_iter().collect();
    if !rows.is_empty() {
        check_required(&keys)?;
    }
    let schema = TripSchema::from_headers(&keys);

    let mut records = Vec::with_capacity(rows.len());
    for (idx, rec) in rows.iter().enumerate() {
        let cell = |column: &'static str| rec.get(column).and_then(json_to_cell);
        records.push(build_record(idx + 1, &schema, cell)?);
    }

    Ok(TripDataset { schema, records })
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => non_blank(s),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Cells are rendered as text so integer, float, string
/// and timestamp columns all go through the same parsing as the CSV loader.
/// A cell Arrow cannot render fails the load with `DataFormatError::Arrow`.
fn load_parquet(path: &Path) -> Result<TripDataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_required(&headers)?;
    let schema = TripSchema::from_headers(&headers);

    let reader = builder.build()?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let batch_schema = batch.schema();

        for batch_row in 0..batch.num_rows() {
            let row = records.len() + 1;
            let mut cells = HashMap::new();
            for column in schema.column_names() {
                let Ok(idx) = batch_schema.index_of(column) else {
                    continue;
                };
                if let Some(value) = parquet_cell(batch.column(idx).as_ref(), batch_row)? {
                    cells.insert(column, value);
                }
            }
            let cell = |column: &'static str| cells.get(column).cloned();
            records.push(build_record(row, &schema, cell)?);
        }
    }

    Ok(TripDataset { schema, records })
}

/// Render one Parquet cell as text. Native timestamps are formatted as
/// wall-clock time in their column's zone; everything else goes through
/// Arrow's display formatter. `None` for a null or blank cell.
fn parquet_cell(col: &dyn Array, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Timestamp(unit, tz) => {
            let value = match unit {
                TimeUnit::Second => timestamp_value::<TimestampSecondType>(col, row, tz.as_deref())?,
                TimeUnit::Millisecond => {
                    timestamp_value::<TimestampMillisecondType>(col, row, tz.as_deref())?
                }
                TimeUnit::Microsecond => {
                    timestamp_value::<TimestampMicrosecondType>(col, row, tz.as_deref())?
                }
                TimeUnit::Nanosecond => {
                    timestamp_value::<TimestampNanosecondType>(col, row, tz.as_deref())?
                }
            };
            value.map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.f").to_string())
        }
        _ => non_blank(&array_value_to_string(col, row)?),
    };
    Ok(text)
}

/// Local time of a timestamp cell. `UTC` and fixed offsets such as `+01:00`
/// are supported; other named zones are rejected.
fn timestamp_value<T>(col: &dyn Array, row: usize, tz: Option<&str>) -> Result<Option<NaiveDateTime>>
where
    T: ArrowTimestampType,
{
    let array = col.as_primitive::<T>();
    let value = match tz {
        None => array.value_as_datetime(row),
        Some(name) if is_utc(name) => array.value_as_datetime(row),
        Some(name) => {
            let tz: Tz = name.parse()?;
            array
                .value_as_datetime_with_tz(row, tz)
                .map(|dt| dt.naive_local())
        }
    };
    Ok(value)
}

fn is_utc(name: &str) -> bool {
    ["UTC", "Etc/UTC", "Z", "GMT"]
        .iter()
        .any(|utc| utc.eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// Shared row parsing
// ---------------------------------------------------------------------------

fn check_required<S: AsRef<str>>(headers: &[S]) -> Result<()> {
    for required in columns::REQUIRED {
        if !headers.iter().any(|h| h.as_ref() == required) {
            return Err(DataFormatError::MissingColumn(required));
        }
    }
    Ok(())
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Turn one source row into a record. `cell` yields `None` for an absent or
/// blank cell. `row` is 1-based and only used for error messages.
fn build_record<F>(row: usize, schema: &TripSchema, cell: F) -> Result<TripRecord>
where
    F: Fn(&'static str) -> Option<String>,
{
    let invalid = |column: &'static str, value: String| DataFormatError::InvalidValue {
        row,
        column,
        value,
    };

    let raw = cell(columns::START_TIME).unwrap_or_default();
    let start_time = parse_timestamp(&raw).ok_or_else(|| invalid(columns::START_TIME, raw))?;

    let raw = cell(columns::TRIP_DURATION).unwrap_or_default();
    let trip_duration =
        parse_duration(&raw).ok_or_else(|| invalid(columns::TRIP_DURATION, raw))?;

    let required = |column: &'static str| cell(column).ok_or_else(|| invalid(column, String::new()));
    let start_station = required(columns::START_STATION)?;
    let end_station = required(columns::END_STATION)?;

    let mut rec = TripRecord::new(start_time, trip_duration, start_station, end_station);
    rec.user_type = cell(columns::USER_TYPE);

    if schema.has_end_time {
        rec.end_time = cell(columns::END_TIME)
            .map(|raw| parse_timestamp(&raw).ok_or_else(|| invalid(columns::END_TIME, raw)))
            .transpose()?;
    }
    if schema.has_gender {
        rec.gender = cell(columns::GENDER);
    }
    if schema.has_birth_year {
        rec.birth_year = cell(columns::BIRTH_YEAR)
            .map(|raw| parse_year(&raw).ok_or_else(|| invalid(columns::BIRTH_YEAR, raw)))
            .transpose()?;
    }

    Ok(rec)
}

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Whole seconds. Fractional sources are rounded; negatives are rejected.
pub fn parse_duration(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u64>() {
        return Some(secs);
    }
    let secs = s.parse::<f64>().ok()?;
    (secs.is_finite() && secs >= 0.0).then(|| secs.round() as u64)
}

/// Birth years are stored as `1992.0` in the published files.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Some(year);
    }
    let year = s.parse::<f64>().ok()?;
    (year.is_finite() && year.fract() == 0.0 && year.abs() < i32::MAX as f64)
        .then_some(year as i32)
}
