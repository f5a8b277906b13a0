use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters shared by the scanning workers
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    files_scanned: Arc<AtomicU64>,
    files_matched: Arc<AtomicU64>,
    files_skipped: Arc<AtomicU64>,
    bytes_read: Arc<AtomicU64>,
    lossy_decodes: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self {
            files_scanned: Arc::new(AtomicU64::new(0)),
            files_matched: Arc::new(AtomicU64::new(0)),
            files_skipped: Arc::new(AtomicU64::new(0)),
            bytes_read: Arc::new(AtomicU64::new(0)),
            lossy_decodes: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a file that was read and searched
    pub fn record_scan(&self, bytes: u64, matched: bool) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes, Ordering::Relaxed);
        if matched {
            self.files_matched.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records a file dropped because of an error or the binary sniff
    pub fn record_skip(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file whose invalid UTF-8 was replaced
    pub fn record_lossy_decode(&self) {
        self.lossy_decodes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            lossy_decodes: self.lossy_decodes.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counters
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats: scanned {} files ({} bytes), {} matched, {} skipped, {} lossy decodes",
            stats.files_scanned,
            stats.bytes_read,
            stats.files_matched,
            stats.files_skipped,
            stats.lossy_decodes
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub files_matched: u64,
    pub files_skipped: u64,
    pub bytes_read: u64,
    pub lossy_decodes: u64,
}
