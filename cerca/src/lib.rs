pub mod config;
pub mod editor;
pub mod errors;
pub mod filters;
pub mod interactive;
pub mod metrics;
pub mod report;
pub mod results;
pub mod search;

pub use config::SearchConfig;
pub use errors::{SearchError, SearchResult};
pub use results::{ContextLine, MatchResult, ResultSet, ScanCandidate};
pub use search::search;
