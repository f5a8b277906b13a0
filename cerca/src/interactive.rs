//! Blocking console prompts.
//!
//! These run on the invoking thread only, after the scan has finished.
//! Input and output are generic so the prompts can be driven from tests.
use std::collections::HashSet;
use std::io::{self, BufRead, Stdout, StdinLock, Write};
use std::num::IntErrorKind;

use crate::errors::{SearchError, SearchResult};
use crate::results::{ExtensionCount, ResultSet};

/// A line-oriented question/answer channel
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    /// Prompt bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns the trimmed answer.
    /// End of input is read as an empty answer.
    pub fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }

    /// Asks a Y/N question. An empty answer yields `default`.
    pub fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let answer = self.ask(question)?.to_uppercase();
        Ok(match answer.as_str() {
            "" => default,
            "Y" => true,
            _ => false,
        })
    }

    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

/// Resolves 1-based indices into `summary` to the extensions they name.
///
/// Indices outside the list are ignored, however large. Any token that is
/// not a number rejects the whole selection.
pub fn parse_selection(input: &str, summary: &[ExtensionCount]) -> SearchResult<HashSet<String>> {
    let mut selected = HashSet::new();
    for token in input.split_whitespace() {
        let index = match token.parse::<i64>() {
            Ok(index) => index,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                continue;
            }
            Err(_) => return Err(SearchError::invalid_selection(input)),
        };
        if index >= 1 && (index as usize) <= summary.len() {
            selected.insert(summary[index as usize - 1].extension.clone());
        }
    }
    Ok(selected)
}

fn print_summary<W: Write>(out: &mut W, summary: &[ExtensionCount]) -> io::Result<()> {
    writeln!(out, "\nExtensions summary:")?;
    for (i, entry) in summary.iter().enumerate() {
        writeln!(out, "  {:2}. {:<15} {:4} file", i + 1, entry.label(), entry.files)?;
    }
    Ok(())
}

/// Offers to drop results by extension.
///
/// Nothing is asked when the results hold a single extension. The original
/// set is returned unchanged when the user declines, selects nothing, or
/// types something that is not a list of numbers.
pub fn filter_by_extension<R: BufRead, W: Write>(
    results: ResultSet,
    prompt: &mut Prompt<R, W>,
) -> io::Result<ResultSet> {
    let summary = results.extension_summary();
    if summary.len() <= 1 {
        return Ok(results);
    }

    print_summary(prompt.output(), &summary)?;
    if !prompt.confirm(
        "\nDo you want to exclude any extension? (Y/N) [Enter=N]: ",
        false,
    )? {
        return Ok(results);
    }

    let out = prompt.output();
    writeln!(out, "\nEnter the numbers of extensions to EXCLUDE separated by spaces")?;
    writeln!(out, "(e.g.: '1 3 5' to exclude the 1st, 3rd and 5th extension)")?;
    let answer = prompt.ask("Numbers to exclude (enter for none): ")?;
    if answer.is_empty() {
        return Ok(results);
    }

    match parse_selection(&answer, &summary) {
        Ok(excluded) if !excluded.is_empty() => {
            let mut labels: Vec<&str> = summary
                .iter()
                .filter(|e| excluded.contains(&e.extension))
                .map(|e| e.label())
                .collect();
            labels.sort_unstable();
            writeln!(prompt.output(), "\nExcluding: {}", labels.join(", "))?;
            Ok(results.exclude_extensions(&excluded))
        }
        Ok(_) => Ok(results),
        Err(_) => {
            writeln!(prompt.output(), "Invalid input, no filter applied")?;
            Ok(results)
        }
    }
}
