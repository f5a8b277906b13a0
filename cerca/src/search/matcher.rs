use regex::{NoExpand, Regex, RegexBuilder};

use crate::errors::{SearchError, SearchResult};

/// Matches a literal string, optionally ignoring case.
///
/// The literal is escaped and compiled into a regex so case folding follows
/// the regex crate's Unicode rules rather than a hand-rolled lowercase pass.
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    pattern: String,
    ignore_case: bool,
    regex: Regex,
}

impl LiteralMatcher {
    /// Creates a matcher for `pattern`. Empty patterns are rejected.
    pub fn new(pattern: &str, ignore_case: bool) -> SearchResult<Self> {
        if pattern.is_empty() {
            return Err(SearchError::invalid_pattern("pattern must not be empty"));
        }
        let regex = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(ignore_case)
            .build()
            .map_err(|e| SearchError::invalid_pattern(e.to_string()))?;
        Ok(Self {
            pattern: pattern.to_string(),
            ignore_case,
            regex,
        })
    }

    /// The literal as given by the user
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of non-overlapping occurrences in `text`
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }

    /// Byte ranges of all non-overlapping occurrences, in order
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Rewrites every occurrence in `line` as `[pattern → replacement]`
    pub fn annotate_replacement(&self, line: &str, replacement: &str) -> String {
        let annotation = format!("[{} → {}]", self.pattern, replacement);
        self.regex
            .replace_all(line, NoExpand(&annotation))
            .into_owned()
    }
}
