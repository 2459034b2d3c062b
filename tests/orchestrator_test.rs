//! Fetch orchestration against mock extraction backends: routing,
//! Instagram fallback, and size accounting.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mediadown::core::error::{AppError, AppResult};
use mediadown::download::{ExtractOutput, FormatSpec, MediaExtractor, MediaFetcher, MediaMetadata, Mode};
use pretty_assertions::assert_eq;
use url::Url;

/// Mock backend that counts calls and either writes a fixed-size file or
/// fails with a fixed message.
struct MockExtractor {
    label: &'static str,
    calls: AtomicUsize,
    outcome: Outcome,
}

enum Outcome {
    File { size: usize },
    Fail(&'static str),
}

impl MockExtractor {
    fn succeeding(label: &'static str, size: usize) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
            outcome: Outcome::File { size },
        })
    }

    fn failing(label: &'static str, message: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            calls: AtomicUsize::new(0),
            outcome: Outcome::Fail(message),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &'static str {
        self.label
    }

    async fn probe(&self, _url: &Url) -> AppResult<MediaMetadata> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::File { .. } => Ok(MediaMetadata {
                title: format!("{} title", self.label),
                ..MediaMetadata::default()
            }),
            Outcome::Fail(message) => Err(AppError::Extraction(message.to_string())),
        }
    }

    async fn extract(&self, _url: &Url, spec: &FormatSpec, output_stem: &Path) -> AppResult<ExtractOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::File { size } => {
                let file_path = output_stem.with_extension(spec.extension);
                fs_err::write(&file_path, vec![0u8; size])?;
                Ok(ExtractOutput {
                    file_path,
                    metadata: MediaMetadata {
                        title: format!("{} title", self.label),
                        ..MediaMetadata::default()
                    },
                })
            }
            Outcome::Fail(message) => Err(AppError::Extraction(message.to_string())),
        }
    }
}

fn fetcher(
    engine: Arc<MockExtractor>,
    instagram: Arc<MockExtractor>,
    dir: &Path,
) -> MediaFetcher {
    MediaFetcher::with_extractors(engine, instagram, dir.to_path_buf())
}

#[tokio::test]
async fn non_instagram_urls_never_touch_the_specialized_backend() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine.clone(), instagram.clone(), dir.path());

    let result = fetcher
        .download("https://youtube.com/watch?v=abc", Mode::Video)
        .await
        .unwrap();

    assert_eq!(engine.calls(), 1);
    assert_eq!(instagram.calls(), 0);
    assert_eq!(result.metadata.title, "engine title");
    result.cleanup();
}

#[tokio::test]
async fn instagram_prefers_the_specialized_backend() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine.clone(), instagram.clone(), dir.path());

    let result = fetcher
        .download("https://instagram.com/p/abc123/", Mode::Video)
        .await
        .unwrap();

    assert_eq!(instagram.calls(), 1);
    assert_eq!(engine.calls(), 0);
    assert_eq!(result.metadata.title, "instagram title");
    result.cleanup();
}

#[tokio::test]
async fn instagram_failure_falls_back_to_the_engine_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::failing("instagram", "graphql denied");
    let fetcher = fetcher(engine.clone(), instagram.clone(), dir.path());

    let result = fetcher
        .download("https://instagram.com/reel/xyz/", Mode::Video)
        .await
        .unwrap();

    assert_eq!(instagram.calls(), 1);
    assert_eq!(engine.calls(), 1);
    assert_eq!(result.metadata.title, "engine title");
    result.cleanup();
}

#[tokio::test]
async fn double_failure_surfaces_the_final_cause() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::failing("engine", "engine says no");
    let instagram = MockExtractor::failing("instagram", "graphql denied");
    let fetcher = fetcher(engine.clone(), instagram.clone(), dir.path());

    let err = fetcher
        .download("https://instagram.com/p/abc/", Mode::Video)
        .await
        .unwrap_err();

    assert_eq!(instagram.calls(), 1);
    assert_eq!(engine.calls(), 1);
    assert!(err.to_string().contains("engine says no"));
}

#[tokio::test]
async fn size_is_read_from_the_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 12_345);
    let instagram = MockExtractor::succeeding("instagram", 1);
    let fetcher = fetcher(engine, instagram, dir.path());

    let result = fetcher
        .download("https://youtu.be/abc", Mode::Audio)
        .await
        .unwrap();

    assert_eq!(result.size_bytes, 12_345);
    assert!(result.file_path.extension().is_some_and(|ext| ext == "mp3"));
    result.cleanup();
}

#[tokio::test]
async fn info_only_mode_is_rejected_by_download() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine.clone(), instagram, dir.path());

    let err = fetcher
        .download("https://youtu.be/abc", Mode::InfoOnly)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Download(_)));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn cleanup_removes_the_downloaded_file() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine, instagram, dir.path());

    let result = fetcher
        .download("https://youtu.be/abc", Mode::Video)
        .await
        .unwrap();

    let path = result.file_path.clone();
    assert!(path.exists());
    result.cleanup();
    assert!(!path.exists());
}

#[tokio::test]
async fn get_info_failure_carries_the_engine_message() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::failing("engine", "Video unavailable");
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine, instagram, dir.path());

    let err = fetcher.get_info("https://youtu.be/gone").await.unwrap_err();
    assert!(err.to_string().contains("Video unavailable"));
}

#[tokio::test]
async fn get_info_uses_the_generic_engine() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockExtractor::succeeding("engine", 16);
    let instagram = MockExtractor::succeeding("instagram", 16);
    let fetcher = fetcher(engine.clone(), instagram.clone(), dir.path());

    let meta = fetcher.get_info("https://instagram.com/p/abc/").await.unwrap();

    assert_eq!(engine.calls(), 1);
    assert_eq!(instagram.calls(), 0);
    assert_eq!(meta.title, "engine title");
}
