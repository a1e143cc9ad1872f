//! Interactive question/answer session.
//!
//! Every question is re-asked until the answer is valid. Typing `stop` (or
//! closing the input) cancels the session cleanly.

use std::io::{BufRead, Write};
use std::str::FromStr;

use rand::Rng;
use tracing::{info, warn};

use crate::config::DatasetCatalog;
use crate::error::Result;
use crate::filter::{DayFilter, MonthFilter};
use crate::output::render;
use crate::pipeline;
use crate::sample::{DEFAULT_SAMPLE_SIZE, raw_sample, render_rows};

/// Answer that cancels the current question.
pub const STOP: &str = "stop";

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const INVALID_ENTRY: &str = "Sorry, your entry is not valid. Try again or enter stop to exit.";

pub struct Prompter<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            clear_screen: false,
        }
    }

    /// Clear the terminal at the start of each session.
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    /// Reads one trimmed line. `None` on end of input.
    fn read_answer(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks until `parse` accepts the answer. `None` means the user stopped.
    pub fn ask_with<T>(
        &mut self,
        question: &str,
        invalid: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        loop {
            let Some(answer) = self.read_answer(question)? else {
                return Ok(None);
            };
            if answer.eq_ignore_ascii_case(STOP) {
                return Ok(None);
            }
            match parse(&answer) {
                Some(value) => return Ok(Some(value)),
                None => writeln!(self.output, "{invalid}")?,
            }
        }
    }

    /// Asks until the answer parses as `T`.
    pub fn ask<T: FromStr>(&mut self, question: &str, invalid: &str) -> Result<Option<T>> {
        self.ask_with(question, invalid, |s| s.parse().ok())
    }

    /// `true` only for an explicit "yes".
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self
            .read_answer(question)?
            .is_some_and(|a| a.eq_ignore_ascii_case("yes")))
    }

    /// Runs sessions until the user declines to restart or stops.
    pub fn run_session<G: Rng + ?Sized>(
        &mut self,
        catalog: &DatasetCatalog,
        rng: &mut G,
    ) -> Result<()> {
        loop {
            if self.clear_screen {
                write!(self.output, "{CLEAR_SCREEN}")?;
            }
            if !self.run_once(catalog, rng)? {
                info!("Session stopped by user");
                return Ok(());
            }
            if !self.confirm("\nWould you like to restart? Enter yes or no.\n")? {
                writeln!(
                    self.output,
                    "\nThank you for your interest in bike sharing data."
                )?;
                return Ok(());
            }
        }
    }

    /// One selection → report → raw data round. `false` if the user stopped.
    fn run_once<G: Rng + ?Sized>(&mut self, catalog: &DatasetCatalog, rng: &mut G) -> Result<bool> {
        writeln!(self.output, "Hello! Let's explore some US bikeshare data!")?;

        let cities = catalog.ids().collect::<Vec<_>>().join(", ");
        let Some(city) = self.ask_with(
            &format!("Please enter the city ({cities}) you would like to analyse: "),
            "Sorry, your entry does not match the available cities. Try again or enter stop to exit.",
            |s| catalog.contains(s).then(|| s.to_lowercase()),
        )?
        else {
            return Ok(false);
        };
        let Some(month) = self.ask::<MonthFilter>(
            "Please enter the month (all, january, february, ... , june) you would like to analyse: ",
            INVALID_ENTRY,
        )?
        else {
            return Ok(false);
        };
        let Some(day) = self.ask::<DayFilter>(
            "Please enter the weekday (all, Mon, Tue, Wed, Thu, Fri, Sat, Sun ) you would like to analyse: ",
            INVALID_ENTRY,
        )?
        else {
            return Ok(false);
        };
        writeln!(self.output, "{}", "-".repeat(40))?;

        let analysis = match pipeline::run(catalog, &city, month, day) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, city = %city, "Could not analyse dataset");
                if e.is_data_format() {
                    writeln!(self.output, "Sorry, the {city} data file is unusable: {e}")?;
                } else {
                    writeln!(self.output, "Sorry, {e}")?;
                }
                return Ok(true);
            }
        };
        write!(self.output, "{}", render(&analysis.report))?;

        let mut question = "\nWould you like to see some raw data? Enter yes or no.\n";
        while self.confirm(question)? {
            let rows = raw_sample(&analysis.dataset, DEFAULT_SAMPLE_SIZE, rng);
            write!(self.output, "{}", render_rows(&rows))?;
            question = "\nWould you like to see further raw data? Enter yes or no.\n";
        }
        Ok(true)
    }
}
