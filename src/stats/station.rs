use super::{mode, Outcome};
use crate::data::model::{FilteredView, TripRecord};

/// Most popular stations and trip. Each field is computed independently
/// over the whole view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    /// (start, end) of the most frequent trip.
    pub trip: (String, String),
}

impl StationStats {
    /// "`start` to `end`".
    pub fn trip_label(&self) -> String {
        format!("{} to {}", self.trip.0, self.trip.1)
    }
}

pub fn station_stats(view: &FilteredView) -> Outcome<StationStats> {
    compute(view.records()).into()
}

fn compute(records: &[TripRecord]) -> Option<StationStats> {
    let start = mode(records.iter().map(|r| r.start_station.as_str()))?;
    let end = mode(records.iter().map(|r| r.end_station.as_str()))?;
    let (trip_start, trip_end) = mode(
        records
            .iter()
            .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
    )?;

    Some(StationStats {
        start_station: start.to_string(),
        end_station: end.to_string(),
        trip: (trip_start.to_string(), trip_end.to_string()),
    })
}
