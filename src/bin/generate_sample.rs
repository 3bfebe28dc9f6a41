use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write synthetic bikeshare datasets in the published layout.
#[derive(Parser)]
struct Args {
    /// Output directory
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Trips per city
    #[arg(long, default_value_t = 2000)]
    rows: usize,

    /// Also write <city>.parquet next to each CSV
    #[arg(long)]
    parquet: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

struct CitySpec {
    file_stem: &'static str,
    stations: &'static [&'static str],
    /// Washington publishes neither gender nor birth year.
    demographics: bool,
    /// Washington stores durations with millisecond precision.
    fractional_durations: bool,
}

const CITIES: [CitySpec; 3] = [
    CitySpec {
        file_stem: "chicago",
        stations: &[
            "Streeter Dr & Grand Ave",
            "Clinton St & Washington Blvd",
            "Canal St & Adams St",
            "Lake Shore Dr & Monroe St",
            "Theater on the Lake",
            "Michigan Ave & Oak St",
        ],
        demographics: true,
        fractional_durations: false,
    },
    CitySpec {
        file_stem: "new_york_city",
        stations: &[
            "Pershing Square North",
            "E 17 St & Broadway",
            "W 21 St & 6 Ave",
            "West St & Chambers St",
            "Broadway & E 22 St",
            "8 Ave & W 31 St",
        ],
        demographics: true,
        fractional_durations: false,
    },
    CitySpec {
        file_stem: "washington",
        stations: &[
            "Columbus Circle / Union Station",
            "Lincoln Memorial",
            "Jefferson Dr & 14th St SW",
            "Massachusetts Ave & Dupont Circle NW",
            "15th & P St NW",
            "Thomas Circle",
        ],
        demographics: false,
        fractional_durations: true,
    },
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `0..n`.
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n.max(1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len() as u64) as usize]
    }
}

struct Trip {
    start: NaiveDateTime,
    duration: f64,
    start_station: &'static str,
    end_station: &'static str,
    user_type: &'static str,
    gender: Option<&'static str>,
    birth_year: Option<i64>,
}

/// Commute peaks at 8:00 and 17:00, quieter at night.
const HOUR_WEIGHTS: [u64; 24] = [1, 1, 1, 1, 1, 2, 4, 8, 12, 7, 5, 5, 6, 6, 6, 7, 10, 14, 11, 7, 5, 4, 3, 2];

fn weighted_hour(rng: &mut SimpleRng) -> u32 {
    let total: u64 = HOUR_WEIGHTS.iter().sum();
    let mut roll = rng.below(total);
    for (hour, weight) in HOUR_WEIGHTS.iter().enumerate() {
        if roll < *weight {
            return hour as u32;
        }
        roll -= weight;
    }
    23
}

fn generate_trip(city: &CitySpec, rng: &mut SimpleRng) -> Result<Trip> {
    let first_day = NaiveDate::from_ymd_opt(2017, 1, 1).context("invalid start date")?;
    let day = first_day + Duration::days(rng.below(181) as i64);
    let start = day
        .and_hms_opt(weighted_hour(rng), rng.below(60) as u32, rng.below(60) as u32)
        .context("invalid start time")?;

    // Mostly short hops with a long tail.
    let minutes = 2.0 + 40.0 * rng.next_f64().powi(3) + 8.0 * rng.next_f64();
    let mut duration = (minutes * 60.0).round();
    if city.fractional_durations {
        duration += (rng.below(1000) as f64) / 1000.0;
    }

    let subscriber = rng.next_f64() < 0.8;
    let (gender, birth_year) = if city.demographics && subscriber {
        let gender = match rng.below(20) {
            0 => None,
            1..=5 => Some("Female"),
            _ => Some("Male"),
        };
        let spread = (rng.next_f64() + rng.next_f64() + rng.next_f64()) / 3.0;
        (gender, Some(1945 + (spread * 57.0) as i64))
    } else {
        (None, None)
    };

    Ok(Trip {
        start,
        duration,
        start_station: *rng.pick(city.stations),
        end_station: *rng.pick(city.stations),
        user_type: if subscriber { "Subscriber" } else { "Customer" },
        gender,
        birth_year,
    })
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn end_time(trip: &Trip) -> NaiveDateTime {
    trip.start + Duration::seconds(trip.duration as i64)
}

fn write_csv(path: &Path, city: &CitySpec, trips: &[Trip]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;

    let mut header = vec![
        "",
        "Start Time",
        "End Time",
        "Trip Duration",
        "Start Station",
        "End Station",
        "User Type",
    ];
    if city.demographics {
        header.extend(["Gender", "Birth Year"]);
    }
    writer.write_record(&header)?;

    for (idx, trip) in trips.iter().enumerate() {
        let mut row = vec![
            idx.to_string(),
            trip.start.format(TIMESTAMP_FORMAT).to_string(),
            end_time(trip).format(TIMESTAMP_FORMAT).to_string(),
            if city.fractional_durations {
                format!("{:.3}", trip.duration)
            } else {
                format!("{}", trip.duration as u64)
            },
            trip.start_station.to_string(),
            trip.end_station.to_string(),
            trip.user_type.to_string(),
        ];
        if city.demographics {
            row.push(trip.gender.unwrap_or_default().to_string());
            // published files store birth years as floats
            row.push(trip.birth_year.map(|y| format!("{y}.0")).unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, city: &CitySpec, trips: &[Trip]) -> Result<()> {
    let text = |f: &dyn Fn(&Trip) -> Option<String>| -> ArrayRef {
        Arc::new(StringArray::from(trips.iter().map(f).collect::<Vec<_>>()))
    };

    let mut fields = vec![
        Field::new("Start Time", DataType::Utf8, false),
        Field::new("End Time", DataType::Utf8, false),
        Field::new("Trip Duration", DataType::Float64, false),
        Field::new("Start Station", DataType::Utf8, false),
        Field::new("End Station", DataType::Utf8, false),
        Field::new("User Type", DataType::Utf8, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        text(&|t| Some(t.start.format(TIMESTAMP_FORMAT).to_string())),
        text(&|t| Some(end_time(t).format(TIMESTAMP_FORMAT).to_string())),
        Arc::new(Float64Array::from(trips.iter().map(|t| t.duration).collect::<Vec<_>>())),
        text(&|t| Some(t.start_station.to_string())),
        text(&|t| Some(t.end_station.to_string())),
        text(&|t| Some(t.user_type.to_string())),
    ];
    if city.demographics {
        fields.push(Field::new("Gender", DataType::Utf8, true));
        fields.push(Field::new("Birth Year", DataType::Int64, true));
        columns.push(text(&|t| t.gender.map(str::to_string)));
        columns.push(Arc::new(Int64Array::from(
            trips.iter().map(|t| t.birth_year).collect::<Vec<_>>(),
        )));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    for city in &CITIES {
        let trips = (0..args.rows)
            .map(|_| generate_trip(city, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        let csv_path = args.out.join(format!("{}.csv", city.file_stem));
        write_csv(&csv_path, city, &trips)?;
        println!("Wrote {} trips to {}", trips.len(), csv_path.display());

        if args.parquet {
            let pq_path = args.out.join(format!("{}.parquet", city.file_stem));
            write_parquet(&pq_path, city, &trips)?;
            println!("Wrote {} trips to {}", trips.len(), pq_path.display());
        }
    }

    Ok(())
}
