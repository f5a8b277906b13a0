use anyhow::Result;
use cerca::{search, SearchConfig};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::Path;
use tempfile::tempdir;

fn config(root: &Path, pattern: &str) -> SearchConfig {
    SearchConfig::new(pattern, root).with_progress(false)
}

fn create_test_files(dir: &tempfile::TempDir, file_count: usize, lines_per_file: usize) -> Result<()> {
    for i in 0..file_count {
        let sub = dir.path().join(format!("pkg_{}", i % 4));
        fs::create_dir_all(&sub)?;
        let mut file = File::create(sub.join(format!("test_{}.txt", i)))?;
        for j in 0..lines_per_file {
            if (i + j) % 3 == 0 {
                writeln!(file, "Line {} in file {}: TODO implement this", j, i)?;
            } else {
                writeln!(file, "Another line {} in file {}: nothing special", j, i)?;
            }
        }
    }
    Ok(())
}

#[test]
fn test_only_matching_files_are_reported() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.py"), "foo = 1\nprint(foo)\n")?;
    fs::write(dir.path().join("b.txt"), "nothing to see\n")?;

    let results = search(&config(dir.path(), "foo"))?;
    assert_eq!(results.len(), 1);
    let entry = results.iter().next().unwrap();
    assert!(entry.path.ends_with("a.py"));
    assert!(entry.path.is_absolute());
    assert_eq!(entry.count, 2);
    assert_eq!(entry.extension, ".py");
    Ok(())
}

#[test]
fn test_ignore_case_counts_both_spellings() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("notes.md"), "todo: one\nTODO: two\n")?;

    let sensitive = search(&config(dir.path(), "TODO"))?;
    assert_eq!(sensitive.total_occurrences(), 1);

    let insensitive = search(&config(dir.path(), "TODO").with_ignore_case(true))?;
    assert_eq!(insensitive.total_occurrences(), 2);
    Ok(())
}

#[test]
fn test_counts_match_literal_occurrences() -> Result<()> {
    let dir = tempdir()?;
    let samples = [
        ("dots.txt", "a.b a.b axb a.b"),
        ("brackets.rs", "v[0] v[0]v[0] v0"),
        ("none.txt", "a b c"),
        ("repeat.txt", "a.ba.ba.b"),
    ];
    for (name, content) in samples {
        fs::write(dir.path().join(name), content)?;
    }

    for pattern in ["a.b", "v[0]"] {
        let results = search(&config(dir.path(), pattern))?;
        for (name, content) in samples {
            let expected = content.matches(pattern).count();
            let actual = results
                .get(&dir.path().canonicalize()?.join(name))
                .map_or(0, |r| r.count);
            assert_eq!(actual, expected, "pattern {:?} in {}", pattern, name);
        }
    }
    Ok(())
}

#[test]
fn test_worker_count_does_not_change_results() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, 40, 30)?;

    let single = search(&config(dir.path(), "TODO").with_workers(NonZeroUsize::new(1).unwrap()))?;
    let many = search(&config(dir.path(), "TODO").with_workers(NonZeroUsize::new(16).unwrap()))?;

    assert_eq!(single, many);
    let single_ranked: Vec<_> = single.ranked().into_iter().cloned().collect();
    let many_ranked: Vec<_> = many.ranked().into_iter().cloned().collect();
    assert_eq!(single_ranked, many_ranked);
    Ok(())
}

#[test]
fn test_ranking_is_non_increasing() -> Result<()> {
    let dir = tempdir()?;
    create_test_files(&dir, 25, 17)?;

    let results = search(&config(dir.path(), "TODO"))?;
    let counts: Vec<usize> = results.ranked().iter().map(|r| r.count).collect();
    assert!(!counts.is_empty());
    assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    assert!(counts.iter().all(|&c| c > 0));
    Ok(())
}

#[test]
fn test_context_lines() -> Result<()> {
    let dir = tempdir()?;
    let content = "alpha\nneedle one\nbeta\n   needle two needle three\nneedle four\n";
    fs::write(dir.path().join("ctx.txt"), content)?;

    let results = search(&config(dir.path(), "needle").with_context(true))?;
    let entry = results.iter().next().unwrap();
    assert_eq!(entry.count, 4);
    assert_eq!(entry.contexts.len(), 3);
    let lines: Vec<usize> = entry.contexts.iter().map(|c| c.line_number).collect();
    assert_eq!(lines, vec![2, 4, 4]);
    for ctx in &entry.contexts {
        let line = content.lines().nth(ctx.line_number - 1).unwrap();
        assert_eq!(ctx.snippet, line.trim());
    }
    Ok(())
}

#[test]
fn test_excluded_directories_and_binaries() -> Result<()> {
    let dir = tempdir()?;
    let root = dir.path();
    for sub in [".git", "node_modules", "__pycache__", "src"] {
        fs::create_dir_all(root.join(sub))?;
        fs::write(root.join(sub).join("file.txt"), "needle")?;
    }
    fs::write(root.join("image.png"), "needle")?;
    fs::write(root.join("blob.bin"), b"needle\x00")?;

    let results = search(&config(root, "needle"))?;
    let found: HashSet<String> = results
        .iter()
        .map(|r| {
            r.path
                .strip_prefix(root.canonicalize().unwrap())
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    let expected: HashSet<String> = ["src/file.txt", "blob.bin"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(found, expected);

    let with_binary = search(&config(root, "needle").with_exclude_binary(false))?;
    assert_eq!(with_binary.len(), 3);

    let sniffed = search(&config(root, "needle").with_sniff_binary(true))?;
    assert_eq!(sniffed.len(), 1);
    Ok(())
}

#[test]
fn test_extension_allow_list() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.py"), "needle")?;
    fs::write(dir.path().join("b.rs"), "needle")?;
    fs::write(dir.path().join("c.txt"), "needle")?;

    let results = search(&config(dir.path(), "needle").with_extensions([".py", "rs"]))?;
    let exts: HashSet<&str> = results.iter().map(|r| r.extension.as_str()).collect();
    assert_eq!(exts, HashSet::from([".py", ".rs"]));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_skipped() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir()?;
    let locked = dir.path().join("locked.txt");
    fs::write(&locked, "needle")?;
    fs::write(dir.path().join("open.txt"), "needle")?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

    // Privileged users can still open the file
    if File::open(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;
        return Ok(());
    }

    let results = search(&config(dir.path(), "needle"))?;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644))?;

    assert_eq!(results.len(), 1);
    let entry = results.iter().next().unwrap();
    assert!(entry.path.ends_with("open.txt"));
    assert_eq!(entry.count, 1);
    Ok(())
}
