//! The scanning pipeline: walk the tree, then search each candidate file on a
//! worker pool.
//!
//! ```rust,ignore
//! let config = SearchConfig::new("TODO", ".").with_ignore_case(true);
//! let results = cerca::search(&config)?;
//! for entry in results.ranked() {
//!     println!("{} {}", entry.count, entry.path.display());
//! }
//! ```
pub mod engine;
pub mod matcher;
pub mod processor;
pub mod walker;

pub use engine::search;
pub use matcher::LiteralMatcher;
pub use processor::FileProcessor;
pub use walker::collect_candidates;
