pub mod command;
pub mod run;

use crate::errors::AppError;
use std::fmt::Display;
use std::io::{BufRead, Write};

pub const SEPARATOR: &str = "-----------------------------";

/// Line-oriented console over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // OUTPUT FUNCTIONS
    pub fn say(&mut self, line: impl Display) -> Result<(), AppError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    pub fn say_framed(&mut self, line: impl Display) -> Result<(), AppError> {
        self.say(SEPARATOR)?;
        self.say(line)?;
        self.say(SEPARATOR)
    }

    // INPUT FUNCTIONS

    /// Prints `prompt` without a newline and reads one line of input.
    /// End of input is reported as [`AppError::InputClosed`].
    pub fn prompt(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Prompts until `parse` accepts the input, printing `describe(err)` after each rejection.
    pub fn retry<T, P, D>(&mut self, prompt: &str, parse: P, describe: D) -> Result<T, AppError>
    where
        P: Fn(&str) -> Result<T, AppError>,
        D: Fn(&AppError) -> String,
    {
        loop {
            let input = self.prompt(prompt)?;

            match parse(&input) {
                Ok(value) => break Ok(value),
                Err(e) => self.say(describe(&e))?,
            }
        }
    }

    pub fn prompt_int(&mut self, prompt: &str, retry_message: &str) -> Result<i64, AppError> {
        self.retry(
            prompt,
            |input| Ok(input.trim().parse::<i64>()?),
            |_| retry_message.to_string(),
        )
    }

    /// `y` or `yes` in any case confirms; anything else declines.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, AppError> {
        let answer = self.prompt(prompt)?.trim().to_lowercase();
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }
}
