use std::borrow::Cow;
use std::path::Path;
use tracing::{trace, warn};

use super::matcher::LiteralMatcher;
use crate::errors::{SearchError, SearchResult};
use crate::filters::is_binary_content;
use crate::metrics::ScanMetrics;
use crate::results::{ContextLine, MatchResult, ScanCandidate, MAX_CONTEXT_LINES};

/// Trimmed lines longer than this many characters are windowed
pub const MAX_SNIPPET_CHARS: usize = 80;
/// Characters kept before the match in a windowed snippet
pub const WINDOW_BEFORE: usize = 30;
/// Characters kept after the match start in a windowed snippet
pub const WINDOW_AFTER: usize = 50;

/// Decodes file bytes as UTF-8, replacing invalid sequences
fn decode_lossy<'a>(bytes: &'a [u8], path: &Path, metrics: &ScanMetrics) -> Cow<'a, str> {
    let cow = String::from_utf8_lossy(bytes);
    // Owned means at least one invalid sequence was replaced
    if let Cow::Owned(_) = cow {
        warn!("Invalid UTF-8 replaced in file: {}", path.display());
        metrics.record_lossy_decode();
    }
    cow
}

/// Builds the context entry for the occurrence at `start..end`
pub fn context_line(content: &str, start: usize, end: usize) -> ContextLine {
    let line_start = content[..start].rfind('\n').map_or(0, |n| n + 1);
    let line_end = content[end..].find('\n').map_or(content.len(), |n| end + n);
    let line_number = 1 + content[..line_start].bytes().filter(|&b| b == b'\n').count();

    let raw = &content[line_start..line_end];
    let trimmed = raw.trim();
    let char_len = trimmed.chars().count();

    let snippet = if char_len > MAX_SNIPPET_CHARS {
        let leading = raw.len() - raw.trim_start().len();
        let rel_byte = (start - line_start).saturating_sub(leading).min(trimmed.len());
        let rel_char = trimmed[..rel_byte].chars().count();
        let from = rel_char.saturating_sub(WINDOW_BEFORE);
        let to = (rel_char + WINDOW_AFTER).min(char_len);
        let window: String = trimmed.chars().skip(from).take(to - from).collect();
        format!("...{}...", window)
    } else {
        trimmed.to_string()
    };

    ContextLine {
        line_number,
        snippet,
    }
}

/// Context entries for the first [`MAX_CONTEXT_LINES`] occurrences
pub fn extract_context(content: &str, matches: &[(usize, usize)]) -> Vec<ContextLine> {
    matches
        .iter()
        .take(MAX_CONTEXT_LINES)
        .map(|&(start, end)| context_line(content, start, end))
        .collect()
}

/// Searches one file at a time
#[derive(Debug)]
pub struct FileProcessor {
    matcher: LiteralMatcher,
    show_context: bool,
    sniff_binary: bool,
    metrics: ScanMetrics,
}

impl FileProcessor {
    /// Creates a new FileProcessor with the given matcher
    pub fn new(matcher: LiteralMatcher, show_context: bool, sniff_binary: bool) -> Self {
        Self {
            matcher,
            show_context,
            sniff_binary,
            metrics: ScanMetrics::new(),
        }
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Searches a candidate file.
    ///
    /// Returns `Ok(None)` when the file has no occurrences or was rejected by
    /// the binary sniff, and an error when it could not be read.
    pub fn process_file(&self, candidate: &ScanCandidate) -> SearchResult<Option<MatchResult>> {
        let path = candidate.path.as_path();
        trace!("Processing file: {}", path.display());

        if self.sniff_binary && is_binary_content(path) {
            trace!("Skipping binary content: {}", path.display());
            self.metrics.record_skip();
            return Ok(None);
        }

        let bytes = std::fs::read(path).map_err(|e| {
            self.metrics.record_skip();
            SearchError::from_io(path, e)
        })?;
        let contents = decode_lossy(&bytes, path, &self.metrics);

        let result = if self.show_context {
            let matches = self.matcher.find_matches(&contents);
            (!matches.is_empty()).then(|| MatchResult {
                path: path.to_path_buf(),
                count: matches.len(),
                extension: candidate.extension.clone(),
                contexts: extract_context(&contents, &matches),
            })
        } else {
            let count = self.matcher.count(&contents);
            (count > 0).then(|| MatchResult {
                path: path.to_path_buf(),
                count,
                extension: candidate.extension.clone(),
                contexts: Vec::new(),
            })
        };

        self.metrics
            .record_scan(bytes.len() as u64, result.is_some());
        Ok(result)
    }
}
