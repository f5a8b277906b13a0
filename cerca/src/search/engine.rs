use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::sync::{mpsc, Arc};
use tracing::{debug, info};

use super::matcher::LiteralMatcher;
use super::processor::FileProcessor;
use super::walker::collect_candidates;
use crate::config::SearchConfig;
use crate::errors::SearchResult;
use crate::results::ResultSet;

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_bar().template("Analyzed {pos}/{len} files...") {
        progress.set_style(style);
    }
    progress
}

/// Searches every candidate file under `config.root_path` in parallel.
///
/// Files are scanned on a dedicated pool of `config.workers` threads and each
/// outcome is sent back over a channel, so the calling thread is the only one
/// that touches the result set. Files that cannot be read are skipped.
pub fn search(config: &SearchConfig) -> SearchResult<ResultSet> {
    info!(
        "Starting search for {:?} (ignore_case: {})",
        config.pattern, config.ignore_case
    );

    let matcher = LiteralMatcher::new(&config.pattern, config.ignore_case)?;
    let candidates = collect_candidates(config)?;
    let total = candidates.len();

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.workers.get())
        .thread_name(|i| format!("cerca-scan-{}", i))
        .build()?;

    let processor = Arc::new(FileProcessor::new(
        matcher,
        config.show_context,
        config.sniff_binary,
    ));
    let progress = progress_bar(total, config.show_progress);

    let (tx, rx) = mpsc::channel();
    let worker_processor = Arc::clone(&processor);
    pool.spawn(move || {
        candidates.into_par_iter().for_each_with(tx, |tx, candidate| {
            let outcome = worker_processor.process_file(&candidate);
            // The receiver lives until every sender is dropped
            let _ = tx.send((candidate.path, outcome));
        });
    });

    let mut results = ResultSet::new();
    for (path, outcome) in rx {
        progress.inc(1);
        match outcome {
            Ok(Some(result)) => results.insert(result),
            Ok(None) => {}
            Err(e) => debug!("Skipping {}: {}", path.display(), e),
        }
    }
    progress.finish_and_clear();

    processor.metrics().log_stats();
    info!(
        "Search complete. Found {} occurrences in {} of {} files",
        results.total_occurrences(),
        results.len(),
        total
    );

    Ok(results)
}
