use ignore::{DirEntry, WalkBuilder};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::SearchConfig;
use crate::errors::{unify_path, SearchError, SearchResult};
use crate::filters::{extension_of, is_excluded_dir, should_include_file};
use crate::results::ScanCandidate;

/// True for directories below the root whose name is excluded
fn is_pruned(entry: &DirEntry, excluded: &BTreeSet<String>) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| is_excluded_dir(name, excluded))
}

/// Regular files, plus symlinks that resolve to regular files
fn is_regular_file(entry: &DirEntry) -> bool {
    match entry.file_type() {
        Some(ft) if ft.is_file() => true,
        Some(ft) if ft.is_symlink() => entry.path().is_file(),
        _ => false,
    }
}

/// Enumerates the files under `config.root_path` that should be scanned.
///
/// Every directory is visited, hidden ones included, except those named in
/// `config.excluded_dirs`. Ignore files such as `.gitignore` are not honoured.
/// Entries that cannot be read are logged and skipped.
pub fn collect_candidates(config: &SearchConfig) -> SearchResult<Vec<ScanCandidate>> {
    if !config.root_path.is_dir() {
        return Err(SearchError::invalid_root(&config.root_path));
    }
    let root = unify_path(&config.root_path);
    let excluded = Arc::new(config.excluded_dirs.clone());

    let mut walker = WalkBuilder::new(&root);
    walker
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .filter_entry(move |entry| !is_pruned(entry, &excluded));

    let mut candidates = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !is_regular_file(&entry) {
            continue;
        }
        let extension = extension_of(entry.path());
        if should_include_file(&extension, config) {
            candidates.push(ScanCandidate {
                path: entry.into_path(),
                extension,
            });
        }
    }

    debug!(
        "Found {} files to process under {}",
        candidates.len(),
        root.display()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn names(candidates: &[ScanCandidate], root: &Path) -> Vec<String> {
        let root = unify_path(root);
        let mut names: Vec<String> = candidates
            .iter()
            .map(|c| {
                c.path
                    .strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_prunes_excluded_dirs() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("src/build")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join(".git/objects/blob"), "x").unwrap();
        fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join("src/build/out.txt"), "x").unwrap();
        fs::write(root.join("src/main.rs"), "x").unwrap();
        fs::write(root.join(".hidden/notes.md"), "x").unwrap();
        fs::write(root.join("build.rs"), "x").unwrap();

        let config = SearchConfig::new("x", root);
        let candidates = collect_candidates(&config).unwrap();
        assert_eq!(
            names(&candidates, root),
            vec![".hidden/notes.md", "build.rs", "src/main.rs"]
        );
        assert!(candidates.iter().all(|c| c.path.is_absolute()));
    }

    #[test]
    fn test_extension_filters() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.py"), "x").unwrap();
        fs::write(root.join("b.TXT"), "x").unwrap();
        fs::write(root.join("c.png"), "x").unwrap();
        fs::write(root.join("Makefile"), "x").unwrap();

        let config = SearchConfig::new("x", root);
        let candidates = collect_candidates(&config).unwrap();
        assert_eq!(names(&candidates, root), vec!["Makefile", "a.py", "b.TXT"]);

        let config = SearchConfig::new("x", root).with_exclude_binary(false);
        assert_eq!(collect_candidates(&config).unwrap().len(), 4);

        let config = SearchConfig::new("x", root).with_extensions(["txt", ".PY"]);
        let candidates = collect_candidates(&config).unwrap();
        assert_eq!(names(&candidates, root), vec!["a.py", "b.TXT"]);
        let b = candidates.iter().find(|c| c.extension == ".txt");
        assert!(b.is_some());
    }

    #[test]
    fn test_gitignore_is_not_honoured() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "ignored.txt\n").unwrap();
        fs::write(root.join("ignored.txt"), "x").unwrap();

        let config = SearchConfig::new("x", root);
        let candidates = collect_candidates(&config).unwrap();
        assert_eq!(names(&candidates, root), vec![".gitignore", "ignored.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real/f.txt"), "x").unwrap();
        symlink(root.join("real/f.txt"), root.join("link.txt")).unwrap();
        symlink(root.join("real"), root.join("dirlink")).unwrap();
        symlink(root.join("missing.txt"), root.join("broken.txt")).unwrap();

        let config = SearchConfig::new("x", root);
        let candidates = collect_candidates(&config).unwrap();
        assert_eq!(names(&candidates, root), vec!["link.txt", "real/f.txt"]);
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempdir().unwrap();
        let config = SearchConfig::new("x", dir.path().join("missing"));
        assert!(matches!(
            collect_candidates(&config),
            Err(SearchError::InvalidRoot(_))
        ));
    }
}
