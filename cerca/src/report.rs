//! Ranked console listing of a [`ResultSet`].
use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use std::path::Path;

use crate::results::{MatchResult, ResultSet};
use crate::search::matcher::LiteralMatcher;

/// Display-only substitution shown inside context snippets
#[derive(Debug, Clone)]
pub struct ReplacementPreview {
    matcher: LiteralMatcher,
    replacement: String,
}

impl ReplacementPreview {
    /// `matcher` must use the same case mode as the search
    pub fn new(matcher: LiteralMatcher, replacement: impl Into<String>) -> Self {
        Self {
            matcher,
            replacement: replacement.into(),
        }
    }

    pub fn annotate(&self, snippet: &str) -> String {
        self.matcher.annotate_replacement(snippet, &self.replacement)
    }
}

/// What to print for each file
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub show_context: bool,
    pub preview: Option<ReplacementPreview>,
    pub use_color: bool,
}

/// The ranked entries that were printed and their occurrence total
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub ranked: Vec<MatchResult>,
    pub total_occurrences: usize,
}

/// Formats a byte count with 1024-based units and one decimal
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1}{}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1}TB", size)
}

fn occurrences(count: usize) -> String {
    format!("{} occurrence{}", count, if count == 1 { "" } else { "s" })
}

/// Applies `style` only when `use_color` is set
pub fn paint(text: String, use_color: bool, style: fn(&str) -> ColoredString) -> ColoredString {
    if use_color {
        style(&text)
    } else {
        text.as_str().normal()
    }
}

fn file_size(path: &Path) -> Option<String> {
    std::fs::metadata(path).ok().map(|m| format_size(m.len()))
}

/// Prints `results` ranked by count under `header`
pub fn print_results<W: Write>(
    results: &ResultSet,
    options: &ReportOptions,
    header: &str,
    out: &mut W,
) -> io::Result<Report> {
    let ranked: Vec<MatchResult> = results.ranked().into_iter().cloned().collect();
    let total_occurrences = ranked.iter().map(|r| r.count).sum();
    let show_context = options.show_context || options.preview.is_some();

    writeln!(out, "\n{}\n", header)?;

    for (i, entry) in ranked.iter().enumerate() {
        let path = paint(entry.path.display().to_string(), options.use_color, |s| {
            s.blue()
        });
        let count = paint(occurrences(entry.count), options.use_color, |s| s.green());
        match file_size(&entry.path) {
            Some(size) => writeln!(out, "{:3}. {} ({}, {})", i + 1, path, count, size)?,
            None => writeln!(out, "{:3}. {} ({})", i + 1, path, count)?,
        }

        if show_context && !entry.contexts.is_empty() {
            for context in &entry.contexts {
                let snippet = match &options.preview {
                    Some(preview) => preview.annotate(&context.snippet),
                    None => context.snippet.clone(),
                };
                let label = paint(
                    format!("Line {}", context.line_number),
                    options.use_color,
                    |s| s.yellow(),
                );
                writeln!(out, "     {}: {}", label, snippet)?;
            }
            writeln!(out)?;
        }
    }

    Ok(Report {
        ranked,
        total_occurrences,
    })
}
