//! Error types for cerca.
//!
//! Only a few of these ever reach the user. Per-file failures are produced by
//! the file processor and swallowed by the search engine, so one unreadable
//! file never fails the whole scan. Selection and editor errors are reported
//! on the console and the run carries on.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur while searching, reporting or launching an editor
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Invalid search root: {0}")]
    InvalidRoot(PathBuf),
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),
    #[error("Failed to launch {editor}: {source}")]
    EditorLaunch {
        editor: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot(path.into())
    }

    pub fn invalid_selection(input: impl Into<String>) -> Self {
        Self::InvalidSelection(input.into())
    }

    pub fn editor_launch(editor: impl Into<String>, source: std::io::Error) -> Self {
        Self::EditorLaunch {
            editor: editor.into(),
            source,
        }
    }

    /// Maps an I/O error on `path` to the most specific variant
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }

    /// True when the editor executable itself could not be located
    pub fn is_missing_editor(&self) -> bool {
        matches!(
            self,
            Self::EditorLaunch { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
