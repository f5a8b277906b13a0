use std::collections::BTreeSet;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Directory names that are never descended into
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    ".git",
    ".svn",
    "__pycache__",
    "node_modules",
    ".venv",
    "venv",
    "env",
    ".idea",
    ".vscode",
    "build",
    "dist",
];

/// Extensions skipped unless binary files are explicitly included
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    ".exe", ".dll", ".so", ".dylib", ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".ico", ".zip",
    ".rar", ".7z", ".tar", ".gz", ".bz2", ".mp3", ".mp4", ".avi", ".mov", ".mkv", ".pyc", ".pyo",
    ".class", ".o", ".obj", ".lib",
];

/// Worker count used when none is given
pub const DEFAULT_WORKERS: usize = 8;

/// Configuration for one search run.
///
/// Built once at startup and handed to the walker and scanner by reference.
/// The excluded-directory and binary-extension sets live here rather than in
/// globals, so tests can narrow or widen them per run.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// The literal text to search for
    pub pattern: String,

    /// Root directory to start search from
    pub root_path: PathBuf,

    /// Match independent of case
    pub ignore_case: bool,

    /// Optional allow-list of normalized extensions (".py", ".txt").
    /// If None, all extensions are included
    pub extensions: Option<Vec<String>>,

    /// Skip files whose extension is in `binary_extensions`
    pub exclude_binary: bool,

    /// Also skip files whose first kilobyte contains a NUL byte
    pub sniff_binary: bool,

    /// Collect up to three context lines per file
    pub show_context: bool,

    /// Size of the scanning worker pool
    pub workers: NonZeroUsize,

    /// Draw the "Analyzed N/total files" indicator on stderr
    pub show_progress: bool,

    /// Directory names pruned during the walk
    pub excluded_dirs: BTreeSet<String>,

    /// Normalized extensions treated as binary
    pub binary_extensions: BTreeSet<String>,
}

fn default_workers() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_WORKERS).unwrap_or(NonZeroUsize::MIN)
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            pattern: String::new(),
            root_path: PathBuf::from("."),
            ignore_case: false,
            extensions: None,
            exclude_binary: true,
            sniff_binary: false,
            show_context: false,
            workers: default_workers(),
            show_progress: true,
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl SearchConfig {
    /// Creates a new configuration with the given pattern and root path
    pub fn new(pattern: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        SearchConfig {
            pattern: pattern.into(),
            root_path: root_path.into(),
            ..Default::default()
        }
    }

    /// Builder method to toggle case-insensitive matching
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Builder method to set the extension allow-list.
    /// Entries are normalized, so "py", ".py" and ".PY" are equivalent.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized: Vec<String> = extensions
            .into_iter()
            .map(|e| normalize_extension(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        self.extensions = Some(normalized);
        self
    }

    /// Builder method to keep or drop the binary-extension deny-list
    pub fn with_exclude_binary(mut self, exclude_binary: bool) -> Self {
        self.exclude_binary = exclude_binary;
        self
    }

    /// Builder method to enable the NUL-byte content sniff
    pub fn with_sniff_binary(mut self, sniff_binary: bool) -> Self {
        self.sniff_binary = sniff_binary;
        self
    }

    /// Builder method to request context lines
    pub fn with_context(mut self, show_context: bool) -> Self {
        self.show_context = show_context;
        self
    }

    /// Builder method to set the number of scanning workers
    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }

    /// Builder method to toggle the progress indicator
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Builder method to replace the excluded directory names
    pub fn with_excluded_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
/// Returns an empty string for empty input.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim();
    if trimmed.is_empty() || trimmed == "." {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
