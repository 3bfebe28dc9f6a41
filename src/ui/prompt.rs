use std::io::{self, BufRead, Write};

use crate::data::model::{City, DayFilter, FilterSelection, MonthFilter};

const RETRY: &str = "I didn't get that... Please try again.";

/// `yes` / `no`, case-insensitive.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// Line-oriented questions over any reader/writer pair.
///
/// Every question returns `Ok(None)` once the input is exhausted, which the
/// session treats as "exit".
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask once and return the raw answer.
    pub fn ask_raw(&mut self, question: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{question}")?;
        self.read_line()
    }

    /// Ask until `parse` accepts the answer.
    pub fn ask<T, F>(&mut self, question: &str, parse: F) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Option<T>,
    {
        loop {
            let Some(answer) = self.ask_raw(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => self.say(RETRY)?,
            }
        }
    }

    /// Ask for city, month and day.
    pub fn filters(&mut self) -> io::Result<Option<FilterSelection>> {
        self.say("Hello! Let's explore some US bikeshare data!")?;

        let Some(city) = self.ask(
            "Which city are you interested in - Chicago, New York City or Washington?",
            City::parse,
        )?
        else {
            return Ok(None);
        };
        self.say(&format!("OK, we'll go with {city}."))?;

        let Some(month) = self.ask(
            "Which month are you interested in between January and June? You can also choose all.",
            MonthFilter::parse,
        )?
        else {
            return Ok(None);
        };
        self.say(&format!("OK, I'll show you {month}."))?;

        let Some(day) = self.ask(
            "Which day exactly are you interested in? You can also choose all.",
            DayFilter::parse,
        )?
        else {
            return Ok(None);
        };
        self.say(&format!("OK, you want to see {day}."))?;

        Ok(Some(FilterSelection::new(city, month, day)))
    }
}
