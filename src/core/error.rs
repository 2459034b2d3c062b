use thiserror::Error;

/// Centralized error types for the application
///
/// Every failure a request handler can see is converted to this enum.
/// Uses `thiserror` for automatic error conversion and display formatting.
/// Errors never propagate past the dispatch layer: each one is turned into
/// a user-facing message and the process keeps serving other requests.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input text fails the basic URL-shape check
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL matches no known platform domain
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Extraction engine could not retrieve metadata
    /// (private/removed/unsupported content, network failure)
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Extraction engine could not produce a file
    /// (same causes as extraction, or post-processing failure)
    #[error("Download error: {0}")]
    Download(String),

    /// Downloaded file exceeds the transmit size limit
    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// HTTP errors from the specialized Instagram path
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Counter record (de)serialization errors
    #[error("Stats record error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
