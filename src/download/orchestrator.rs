//! Media fetch orchestration: URL → platform → format → local file.
//!
//! `MediaFetcher` owns the extraction backends and drives a download from a
//! validated URL to a `FetchResult`. Instagram URLs take a specialized
//! extractor first and fall back to the generic engine exactly once.

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::utils::is_valid_url;
use crate::download::extractor::{MediaExtractor, MediaMetadata, YtDlpExtractor};
use crate::download::format::{spec_for, Mode};
use crate::download::instagram::InstagramExtractor;
use crate::platform::{self, Platform};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// A completed download: local file plus its metadata.
///
/// The file is exclusively owned by this value from creation until
/// [`FetchResult::cleanup`], which consumes it — no second component can
/// delete the file independently.
#[derive(Debug)]
pub struct FetchResult {
    pub file_path: PathBuf,
    pub metadata: MediaMetadata,
    pub size_bytes: u64,
}

impl FetchResult {
    /// Deletes the local file. Best effort: a failed removal is logged,
    /// not propagated, since the request has already been answered.
    pub fn cleanup(self) {
        if let Err(e) = fs_err::remove_file(&self.file_path) {
            log::warn!("Failed to clean up {}: {}", self.file_path.display(), e);
        }
    }
}

/// Orchestrates platform resolution, format selection, and extraction.
pub struct MediaFetcher {
    engine: Arc<dyn MediaExtractor>,
    instagram: Arc<dyn MediaExtractor>,
    download_dir: PathBuf,
}

impl MediaFetcher {
    /// Production fetcher: yt-dlp engine + specialized Instagram extractor,
    /// writing into the configured download folder.
    pub fn new() -> Self {
        Self::with_extractors(
            Arc::new(YtDlpExtractor::new()),
            Arc::new(InstagramExtractor::new()),
            PathBuf::from(config::DOWNLOAD_FOLDER.as_str()),
        )
    }

    /// Fetcher with explicit backends; used by tests to inject mocks.
    pub fn with_extractors(
        engine: Arc<dyn MediaExtractor>,
        instagram: Arc<dyn MediaExtractor>,
        download_dir: PathBuf,
    ) -> Self {
        Self {
            engine,
            instagram,
            download_dir,
        }
    }

    /// Fetches metadata for a URL without producing a file.
    ///
    /// Any engine failure surfaces as `AppError::Extraction` carrying the
    /// engine's message.
    pub async fn get_info(&self, url: &str) -> AppResult<MediaMetadata> {
        let url = parse_request_url(url)?;
        self.engine.probe(&url).await
    }

    /// Downloads the media at `url` in the requested mode and returns the
    /// resulting local file with metadata and actual on-disk size.
    pub async fn download(&self, url: &str, mode: Mode) -> AppResult<FetchResult> {
        if !mode.is_download() {
            return Err(AppError::Download(
                "Info-only requests produce no file; use get_info instead".to_string(),
            ));
        }

        let url = parse_request_url(url)?;
        let platform = platform::resolve(url.as_str());
        let spec = spec_for(platform, mode);
        let output_stem = self.download_dir.join(file_stem(platform, &url));

        let output = if platform == Platform::Instagram {
            // Best-effort recovery, attempted exactly once: any failure of
            // the specialized path falls through to the generic engine with
            // the same URL, and only the final cause reaches the caller.
            match self.instagram.extract(&url, &spec, &output_stem).await {
                Ok(output) => output,
                Err(e) => {
                    log::warn!(
                        "Specialized {} extractor failed for {}: {}; falling back to {}",
                        self.instagram.name(),
                        url,
                        e,
                        self.engine.name()
                    );
                    self.engine.extract(&url, &spec, &output_stem).await?
                }
            }
        } else {
            self.engine.extract(&url, &spec, &output_stem).await?
        };

        let size_bytes = fs_err::metadata(&output.file_path)?.len();
        log::info!(
            "Downloaded {} -> {} ({} bytes)",
            url,
            output.file_path.display(),
            size_bytes
        );

        Ok(FetchResult {
            file_path: output.file_path,
            metadata: output.metadata,
            size_bytes,
        })
    }
}

impl Default for MediaFetcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates the URL shape and parses it.
fn parse_request_url(url: &str) -> AppResult<Url> {
    if !is_valid_url(url) {
        return Err(AppError::InvalidUrl(url.to_string()));
    }
    Ok(Url::parse(url)?)
}

/// Short, collision-unlikely filename stem: platform slug plus a hash of
/// the URL. Two distinct URLs hashing identically is an accepted edge case.
fn file_stem(platform: Platform, url: &Url) -> String {
    let mut hasher = DefaultHasher::new();
    url.as_str().hash(&mut hasher);
    format!("{}_{:016x}", platform.slug(), hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_is_deterministic() {
        let url = Url::parse("https://youtu.be/abc123").unwrap();
        assert_eq!(
            file_stem(Platform::YouTube, &url),
            file_stem(Platform::YouTube, &url)
        );
    }

    #[test]
    fn test_file_stem_differs_per_url() {
        let a = Url::parse("https://youtu.be/abc123").unwrap();
        let b = Url::parse("https://youtu.be/def456").unwrap();
        assert_ne!(file_stem(Platform::YouTube, &a), file_stem(Platform::YouTube, &b));
    }

    #[test]
    fn test_file_stem_starts_with_platform_slug() {
        let url = Url::parse("https://vt.tiktok.com/xyz/").unwrap();
        assert!(file_stem(Platform::TikTok, &url).starts_with("tiktok_"));
    }

    #[test]
    fn test_parse_request_url_rejects_bad_shapes() {
        assert!(matches!(parse_request_url("not a url"), Err(AppError::InvalidUrl(_))));
        assert!(matches!(
            parse_request_url("ftp://example.com/f"),
            Err(AppError::InvalidUrl(_))
        ));
        assert!(parse_request_url("https://youtu.be/abc").is_ok());
    }
}
