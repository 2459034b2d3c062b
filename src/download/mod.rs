//! Download orchestration and extraction backends

pub mod extractor;
pub mod format;
pub mod instagram;
pub mod orchestrator;

// Re-exports for convenience
pub use extractor::{ExtractOutput, MediaExtractor, MediaMetadata, YtDlpExtractor};
pub use format::{spec_for, FormatSpec, Mode};
pub use instagram::InstagramExtractor;
pub use orchestrator::{FetchResult, MediaFetcher};
