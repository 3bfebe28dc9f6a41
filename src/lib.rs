//! Explore US bikeshare trip data: load a city's trips, filter them by month
//! and weekday, and report popular times, stations, trip durations and
//! rider demographics.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod state;
pub mod stats;
pub mod ui;
