use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use log::{debug, error};

use crate::config::Config;
use crate::data::loader;
use crate::data::model::{FilterSelection, FilteredView};
use crate::state::SessionState;
use crate::stats;
use crate::ui::prompt::{parse_yes_no, Prompter};
use crate::ui::report::{self, SEPARATOR};

// ---------------------------------------------------------------------------
// Bikeshare explorer
// ---------------------------------------------------------------------------

pub struct BikeshareExplorer {
    pub config: Config,
}

impl BikeshareExplorer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Prompt for filters, show raw data and reports, and repeat until the
    /// user declines to restart or the input ends.
    ///
    /// A failed load is reported and the user is offered a restart; it never
    /// ends the process.
    pub fn run_interactive<R: BufRead, W: Write>(&self, prompter: &mut Prompter<R, W>) -> Result<()> {
        loop {
            let Some(selection) = prompter.filters()? else {
                break;
            };
            prompter.say(SEPARATOR)?;
            prompter.say("\nLoading data...")?;

            match loader::load(&self.config, selection) {
                Ok(view) => {
                    let mut session = SessionState::new(view);
                    session.log_warnings();
                    if !browse_raw_data(prompter, &mut session)? {
                        break;
                    }
                    print_reports(&session.view, prompter.output())?;
                }
                Err(err) => {
                    error!("Load failed for {selection}: {err}");
                    prompter.say(&format!("Could not load data for {}: {err}", selection.city))?;
                }
            }

            let restart = prompter.ask_raw("\nWould you like to restart? Enter yes or no.")?;
            if restart.as_deref().and_then(parse_yes_no) != Some(true) {
                break;
            }
        }
        Ok(())
    }

    /// Print every report for one selection, preceded by up to `raw_pages`
    /// pages of raw data. Load errors are returned to the caller.
    pub fn run_once<W: Write>(&self, selection: FilterSelection, raw_pages: usize, out: &mut W) -> Result<()> {
        let view = loader::load(&self.config, selection)
            .with_context(|| format!("loading data for {}", selection.city))?;
        let mut session = SessionState::new(view);
        session.log_warnings();

        writeln!(out, "{selection}: {} trips", session.view.len())?;
        let schema = session.view.schema;
        for _ in 0..raw_pages {
            let (start, page) = session.next_page();
            if page.is_empty() {
                break;
            }
            writeln!(out, "{}", report::render_page(page, start, &schema)?)?;
        }
        writeln!(out, "{SEPARATOR}")?;

        print_reports(&session.view, out)
    }
}

/// Page through the raw records on request. Returns `false` when the input ended.
fn browse_raw_data<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, session: &mut SessionState) -> Result<bool> {
    let Some(wanted) = prompter.ask("\nDo you wish to view the raw data? (Yes/No)", parse_yes_no)? else {
        return Ok(false);
    };

    let schema = session.view.schema;
    let mut show = wanted;
    while show {
        let (start, page) = session.next_page();
        if page.is_empty() {
            prompter.say("There is no more raw data to display.")?;
            break;
        }
        let table = report::render_page(page, start, &schema)?;
        prompter.say(&table)?;

        let Some(answer) = prompter.ask_raw("Do you wish to view more raw data?")? else {
            return Ok(false);
        };
        show = parse_yes_no(&answer) == Some(true);
    }

    prompter.say(SEPARATOR)?;
    Ok(true)
}

/// Run the four statistics routines, timing each one.
pub fn print_reports<W: Write>(view: &FilteredView, out: &mut W) -> Result<()> {
    timed(
        out,
        "Calculating The Most Frequent Times of Travel...",
        || report::render_time(&stats::time_stats(view)),
    )?;
    timed(
        out,
        "Calculating The Most Popular Stations and Trip...",
        || report::render_stations(&stats::station_stats(view)),
    )?;
    timed(out, "Calculating Trip Duration...", || {
        report::render_duration(&stats::trip_duration_stats(view))
    })?;
    timed(out, "Calculating User Stats...", || {
        report::render_users(&stats::user_stats(view))
    })?;
    Ok(())
}

fn timed<W, F>(out: &mut W, heading: &str, run: F) -> Result<()>
where
    W: Write,
    F: FnOnce() -> String,
{
    writeln!(out, "\n{heading}\n")?;
    let started = Instant::now();
    let text = run();
    let elapsed = started.elapsed();
    debug!("{heading} took {elapsed:?}");

    write!(out, "{text}")?;
    writeln!(out, "\nThis took {} seconds.", elapsed.as_secs_f64())?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}
