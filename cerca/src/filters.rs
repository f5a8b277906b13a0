//! Per-entry predicates used by the tree walker.
//!
//! Everything here is keyed on names and extensions except
//! [`is_binary_content`], which peeks at the first kilobyte of a file.
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::config::SearchConfig;

/// Number of leading bytes inspected by the content sniff
pub const SNIFF_LEN: usize = 1024;

/// Returns the lowercase extension of `path` with a leading dot,
/// or an empty string when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Checks if a directory name is in the excluded set
pub fn is_excluded_dir(name: &str, excluded: &BTreeSet<String>) -> bool {
    excluded.contains(name)
}

/// Checks if a file passes the extension allow-list
pub fn has_valid_extension(extension: &str, allowed: &Option<Vec<String>>) -> bool {
    match allowed {
        None => true,
        Some(exts) => exts.iter().any(|e| e == extension),
    }
}

/// Checks if an extension is on the binary deny-list
pub fn is_binary_extension(extension: &str, binary_extensions: &BTreeSet<String>) -> bool {
    !extension.is_empty() && binary_extensions.contains(extension)
}

/// Checks whether the first kilobyte of a file contains a NUL byte.
/// Files that cannot be opened or read are reported as binary.
pub fn is_binary_content(path: &Path) -> bool {
    let mut buf = [0u8; SNIFF_LEN];
    let read = File::open(path).and_then(|mut file| {
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(filled)
    });
    match read {
        Ok(n) => buf[..n].contains(&0),
        Err(_) => true,
    }
}

/// Determines if a file with the given extension should be scanned
pub fn should_include_file(extension: &str, config: &SearchConfig) -> bool {
    has_valid_extension(extension, &config.extensions)
        && !(config.exclude_binary && is_binary_extension(extension, &config.binary_extensions))
}
