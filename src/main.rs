use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bikeshare_explorer::app::BikeshareExplorer;
use bikeshare_explorer::config::Config;
use bikeshare_explorer::data::model::{City, DayFilter, FilterSelection, MonthFilter};
use bikeshare_explorer::ui::prompt::Prompter;
use clap::Parser;

/// Explore US bikeshare trip data for Chicago, New York City and Washington.
///
/// Without `--city` the explorer asks for the city, month and day
/// interactively and offers to restart after each round.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON config file (data_dir and per-city file overrides)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the reports for this city once and exit
    #[arg(long, value_parser = parse_arg(City::parse))]
    city: Option<City>,

    /// january … june, or all
    #[arg(long, requires = "city", value_parser = parse_arg(MonthFilter::parse))]
    month: Option<MonthFilter>,

    /// monday … sunday, or all
    #[arg(long, requires = "city", value_parser = parse_arg(DayFilter::parse))]
    day: Option<DayFilter>,

    /// Raw data pages (5 trips each) to print before the reports
    #[arg(long, requires = "city", default_value_t = 0)]
    raw: usize,
}

fn parse_arg<T>(parse: fn(&str) -> Option<T>) -> impl Fn(&str) -> Result<T, String> + Clone {
    move |s: &str| parse(s).ok_or_else(|| format!("unrecognised value '{s}'"))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    log::debug!("Using {config:?}");

    let explorer = BikeshareExplorer::new(config);

    match args.city {
        Some(city) => {
            let selection = FilterSelection::new(
                city,
                args.month.unwrap_or_default(),
                args.day.unwrap_or_default(),
            );
            explorer
                .run_once(selection, args.raw, &mut io::stdout().lock())
                .context("bikeshare report failed")
        }
        None => {
            let mut prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
            explorer.run_interactive(&mut prompter)
        }
    }
}
