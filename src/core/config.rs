use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable, defaults to "downloads".
/// Supports tilde (~) expansion for home directory.
pub static DOWNLOAD_FOLDER: Lazy<String> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "downloads".to_string());
    shellexpand::tilde(&raw).into_owned()
});

/// Path to the persisted counter record
/// Read from STATS_FILE environment variable, defaults to "stats.json".
pub static STATS_FILE: Lazy<String> = Lazy::new(|| {
    let raw = env::var("STATS_FILE").unwrap_or_else(|_| "stats.json".to_string());
    shellexpand::tilde(&raw).into_owned()
});

/// Admin allow-list for the /stats command
/// Read from ADMIN_IDS environment variable as comma-separated user ids.
/// Malformed entries are skipped with a warning rather than aborting startup.
pub static ADMIN_IDS: Lazy<HashSet<u64>> = Lazy::new(|| {
    let raw = env::var("ADMIN_IDS").unwrap_or_default();
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                log::warn!("Ignoring malformed admin id in ADMIN_IDS: {:?}", s);
                None
            }
        })
        .collect()
});

/// Instagram GraphQL query document id. Embedded in the Instagram web app
/// and rotated by Meta every few weeks; override via INSTAGRAM_DOC_ID when
/// the default stops working.
pub static INSTAGRAM_DOC_ID: Lazy<String> =
    Lazy::new(|| env::var("INSTAGRAM_DOC_ID").unwrap_or_else(|_| "8845758582119845".to_string()));

/// Download configuration
pub mod download {
    use super::Duration;

    /// Timeout for yt-dlp commands (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 300; // 5 minutes

    /// Timeout for yt-dlp metadata probes (in seconds)
    pub const PROBE_TIMEOUT_SECS: u64 = 60;

    /// Target bitrate for audio transcoding
    pub const AUDIO_BITRATE_KBPS: u32 = 192;

    /// yt-dlp download command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }

    /// yt-dlp metadata probe timeout duration
    pub fn probe_timeout() -> Duration {
        Duration::from_secs(PROBE_TIMEOUT_SECS)
    }
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram API calls, generous because file
    /// uploads close to the 50 MB limit take a while on slow links
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Validation configuration
pub mod validation {
    /// Maximum URL length (RFC 7230 recommends 8000, but we use 2048 for safety)
    pub const MAX_URL_LENGTH: usize = 2048;

    /// Maximum file size for Telegram (50MB in bytes)
    /// Telegram Bot API allows up to 50MB for files
    pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024; // 50 MB
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_limit_is_50_mib() {
        assert_eq!(validation::MAX_FILE_SIZE_BYTES, 52_428_800);
    }

    #[test]
    fn test_download_timeouts() {
        assert!(download::ytdlp_timeout() > download::probe_timeout());
    }
}
