//! Manual fallback when the result banner cannot be read.

use anyhow::{bail, Result};
use std::io::{BufRead, Write};

use crate::history::MatchResult;

/// Asks a human how the match ended.
pub trait ResultPrompt {
    fn ask_result(&self) -> Result<MatchResult>;
}

/// Prompts on the terminal.
pub struct StdinPrompt;

impl ResultPrompt for StdinPrompt {
    fn ask_result(&self) -> Result<MatchResult> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        ask_until_answered(&mut stdin.lock(), &mut stdout.lock())
    }
}

/// Repeats the y/n question until a valid answer arrives.
///
/// Fails only if input closes.
pub fn ask_until_answered<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<MatchResult> {
    loop {
        write!(output, "Did you win or lose? (y/n): ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before a match result was entered");
        }

        match line.trim() {
            "y" => return Ok(MatchResult::Win),
            "n" => return Ok(MatchResult::Loss),
            other => writeln!(output, "Error: '{}' is not one of 'y', 'n'.", other)?,
        }
    }
}
