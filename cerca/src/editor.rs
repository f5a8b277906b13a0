//! Fire-and-forget editor launching.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::debug;

use crate::errors::SearchError;
use crate::interactive::Prompt;

/// Editor used when neither `--editor` nor `EDITOR` is set
#[cfg(windows)]
pub const FALLBACK_EDITOR: &str = "notepad";
#[cfg(target_os = "macos")]
pub const FALLBACK_EDITOR: &str = "open";
#[cfg(not(any(windows, target_os = "macos")))]
pub const FALLBACK_EDITOR: &str = "xdg-open";

/// Picks the editor: explicit flag, then `env_editor`, then [`FALLBACK_EDITOR`].
/// Blank values are skipped.
pub fn resolve_editor(flag: Option<&str>, env_editor: Option<String>) -> String {
    flag.map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .or_else(|| {
            env_editor
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
        })
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}

/// [`resolve_editor`] reading the `EDITOR` environment variable
pub fn editor_from_env(flag: Option<&str>) -> String {
    resolve_editor(flag, std::env::var("EDITOR").ok())
}

/// Result of a launch batch
#[derive(Debug)]
pub struct LaunchReport {
    /// Number of editor processes started
    pub launched: usize,
    /// The failure that stopped the batch, if any
    pub error: Option<SearchError>,
}

/// What happened after asking to open the files
#[derive(Debug)]
pub enum LaunchOutcome {
    Cancelled,
    Launched(LaunchReport),
}

/// Starts `editor <path>` for each path without waiting on it.
/// Stops at the first process that fails to start.
pub fn launch_all(editor: &str, paths: &[PathBuf]) -> LaunchReport {
    let mut launched = 0;
    for path in paths {
        let spawned = Command::new(editor)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                debug!("Launched {} (pid {}) for {}", editor, child.id(), path.display());
                launched += 1;
            }
            Err(e) => {
                return LaunchReport {
                    launched,
                    error: Some(SearchError::editor_launch(editor, e)),
                };
            }
        }
    }
    LaunchReport {
        launched,
        error: None,
    }
}

/// Asks for confirmation, then opens the `limit` highest-ranked paths
/// (all of them when `limit` is 0).
pub fn confirm_and_launch<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    editor: &str,
    ranked: &[PathBuf],
    limit: usize,
) -> io::Result<LaunchOutcome> {
    let question = format!(
        "\nDo you want to open all files with {}? (Y/N) [Enter=Y]: ",
        editor
    );
    if !prompt.confirm(&question, true)? {
        writeln!(prompt.output(), "Operation cancelled")?;
        return Ok(LaunchOutcome::Cancelled);
    }

    let files = if limit > 0 && limit < ranked.len() {
        &ranked[..limit]
    } else {
        ranked
    };
    if limit > 0 {
        writeln!(prompt.output(), "\nOpening the first {} files...", limit)?;
    }

    let report = launch_all(editor, files);
    if let Some(err) = &report.error {
        if err.is_missing_editor() {
            writeln!(prompt.output(), "Error: {} not found in PATH", editor)?;
        } else {
            writeln!(prompt.output(), "Error: {}", err)?;
        }
    }
    Ok(LaunchOutcome::Launched(report))
}
