use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Label shown for files that have no extension
pub const NO_EXTENSION_LABEL: &str = "(no extension)";

/// Maximum number of context entries kept per file
pub const MAX_CONTEXT_LINES: usize = 3;

/// A file selected by the tree walker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCandidate {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Lowercase extension with leading dot, empty if none
    pub extension: String,
}

/// One occurrence shown with its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// 1-based line number
    pub line_number: usize,
    /// Trimmed line, windowed around the match when long
    pub snippet: String,
}

/// Matches found in a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub path: PathBuf,
    /// Number of non-overlapping occurrences, always > 0
    pub count: usize,
    pub extension: String,
    /// Up to three entries, ordered by match position
    pub contexts: Vec<ContextLine>,
}

impl MatchResult {
    /// Extension as displayed in summaries
    pub fn extension_label(&self) -> &str {
        extension_label(&self.extension)
    }
}

/// Maps an empty extension to [`NO_EXTENSION_LABEL`]
pub fn extension_label(extension: &str) -> &str {
    if extension.is_empty() {
        NO_EXTENSION_LABEL
    } else {
        extension
    }
}

/// Number of result files sharing one extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCount {
    pub extension: String,
    pub files: usize,
}

impl ExtensionCount {
    pub fn label(&self) -> &str {
        extension_label(&self.extension)
    }
}

/// All per-file results of one run, keyed by absolute path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    entries: HashMap<PathBuf, MatchResult>,
}

impl ResultSet {
    /// Creates a new empty result set
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a file result. Results with a zero count are dropped.
    pub fn insert(&mut self, result: MatchResult) {
        if result.count == 0 {
            return;
        }
        self.entries.insert(result.path.clone(), result);
    }

    pub fn get(&self, path: &Path) -> Option<&MatchResult> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchResult> {
        self.entries.values()
    }

    /// Sum of all per-file counts
    pub fn total_occurrences(&self) -> usize {
        self.entries.values().map(|r| r.count).sum()
    }

    /// Results ordered by count descending, then by path
    pub fn ranked(&self) -> Vec<&MatchResult> {
        let mut ranked: Vec<&MatchResult> = self.entries.values().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.path.cmp(&b.path)));
        ranked
    }

    /// Extensions present, most frequent first. Ties are ordered by label.
    pub fn extension_summary(&self) -> Vec<ExtensionCount> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for result in self.entries.values() {
            *counts.entry(result.extension.as_str()).or_default() += 1;
        }
        let mut summary: Vec<ExtensionCount> = counts
            .into_iter()
            .map(|(extension, files)| ExtensionCount {
                extension: extension.to_string(),
                files,
            })
            .collect();
        summary.sort_by(|a, b| b.files.cmp(&a.files).then_with(|| a.label().cmp(b.label())));
        summary
    }

    /// Returns a new set without the results whose extension is in `excluded`
    pub fn exclude_extensions(&self, excluded: &HashSet<String>) -> ResultSet {
        ResultSet {
            entries: self
                .entries
                .iter()
                .filter(|(_, r)| !excluded.contains(&r.extension))
                .map(|(p, r)| (p.clone(), r.clone()))
                .collect(),
        }
    }
}

impl FromIterator<MatchResult> for ResultSet {
    fn from_iter<T: IntoIterator<Item = MatchResult>>(iter: T) -> Self {
        let mut set = ResultSet::new();
        for result in iter {
            set.insert(result);
        }
        set
    }
}
