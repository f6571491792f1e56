use std::io::{BufRead, Write};

use anyhow::{bail, Context};

use crate::models::{self, City, Filters};

/// Line-based prompter over any input/output pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn say(&mut self, text: &str) -> anyhow::Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn print(&mut self, text: &str) -> anyhow::Result<()> {
        write!(self.output, "{text}")?;
        Ok(())
    }

    /// Prints `question` without a newline and reads one answer line.
    pub fn ask(&mut self, question: &str) -> anyhow::Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            bail!("input closed");
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let answer = self.ask(question)?;
        Ok(is_yes(&answer))
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Asks for city, month and weekday until each answer is valid.
pub fn get_filters<R: BufRead, W: Write>(console: &mut Console<R, W>) -> anyhow::Result<Filters> {
    console.say("Hello! Let's explore some US bikeshare data!\n")?;

    let mut answer = console.ask("Let's start by choosing a city (Chicago, New York, or Washington):")?;
    let city = loop {
        match City::parse(&answer) {
            Some(city) => break city,
            None => {
                answer = console.ask("Please input a valid city (Chicago, New York, or Washington):")?
            }
        }
    };

    console.say("\nNext, let's choose our calendar filter.")?;

    let mut answer =
        console.ask("Which month do you want to report on? (January to June, or ENTER for any):")?;
    let month = loop {
        match models::parse_month(&answer) {
            Some(month) => break month,
            None => answer = console.ask("Please input a valid month? (or ENTER for any):")?,
        }
    };

    let mut answer =
        console.ask("Which day of the week do you want to report on? (or ENTER for any):")?;
    let weekday = loop {
        match models::parse_weekday(&answer) {
            Some(weekday) => break weekday,
            None => answer = console.ask("Please input a valid weekday? (or ENTER for any):")?,
        }
    };

    Ok(Filters {
        city,
        month,
        weekday,
    })
}
