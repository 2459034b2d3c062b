//! External extraction-engine abstraction and the yt-dlp implementation.
//!
//! The `MediaExtractor` trait is the pluggable seam around the actual
//! download capability: given a URL and a format specification it returns a
//! local media file plus descriptive metadata, or fails. Per-platform media
//! extraction itself stays inside the engine (yt-dlp + ffmpeg); this module
//! only shells out to it.

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::download::format::FormatSpec;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use url::Url;

/// Normalized metadata describing a media item.
///
/// Fields the engine omits fall back to `"Unknown"` / `0` / empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    pub title: String,
    pub uploader: String,
    pub duration_secs: u64,
    /// Approximate size in bytes as reported by the engine; 0 = unknown
    pub approx_size_bytes: u64,
    pub format_count: usize,
    pub description: String,
}

impl Default for MediaMetadata {
    fn default() -> Self {
        Self {
            title: "Unknown".to_string(),
            uploader: "Unknown".to_string(),
            duration_secs: 0,
            approx_size_bytes: 0,
            format_count: 0,
            description: String::new(),
        }
    }
}

/// Output of a successful extraction.
#[derive(Debug, Clone)]
pub struct ExtractOutput {
    /// Path of the materialized file on local disk
    pub file_path: PathBuf,
    pub metadata: MediaMetadata,
}

/// External capability that can report metadata for a URL and/or
/// materialize a local media file from it.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Short name for logging (e.g. "yt-dlp", "instagram")
    fn name(&self) -> &'static str;

    /// Fetch metadata without writing a file.
    async fn probe(&self, url: &Url) -> AppResult<MediaMetadata>;

    /// Download the media described by `spec` to `output_stem` plus the
    /// spec's extension. `output_stem` carries no extension; the extractor
    /// appends the one matching what it actually produced.
    async fn extract(&self, url: &Url, spec: &FormatSpec, output_stem: &Path) -> AppResult<ExtractOutput>;
}

/// Subset of yt-dlp's JSON output we care about.
#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    filesize_approx: Option<u64>,
    #[serde(default)]
    formats: Vec<serde_json::Value>,
    description: Option<String>,
    /// Output path as the engine saw it before post-processing
    #[serde(rename = "_filename", alias = "filename")]
    filename: Option<PathBuf>,
}

impl From<YtDlpInfo> for MediaMetadata {
    fn from(info: YtDlpInfo) -> Self {
        let defaults = MediaMetadata::default();
        Self {
            title: info.title.filter(|t| !t.trim().is_empty()).unwrap_or(defaults.title),
            uploader: info.uploader.filter(|u| !u.trim().is_empty()).unwrap_or(defaults.uploader),
            duration_secs: info.duration.map(|d| d.max(0.0) as u64).unwrap_or(0),
            approx_size_bytes: info.filesize_approx.unwrap_or(0),
            format_count: info.formats.len(),
            description: info.description.unwrap_or_default(),
        }
    }
}

/// Generic extraction engine backed by the yt-dlp binary.
pub struct YtDlpExtractor {
    bin: String,
}

impl YtDlpExtractor {
    pub fn new() -> Self {
        Self {
            bin: config::YTDL_BIN.clone(),
        }
    }
}

impl Default for YtDlpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the yt-dlp argument list for a download.
fn build_download_args(spec: &FormatSpec, template: &str, url: &Url) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "-f".to_string(),
        spec.selector.to_string(),
        "-o".to_string(),
        template.to_string(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        // Downloads AND prints the info JSON to stdout in one pass
        "--print-json".to_string(),
    ];

    if spec.audio_only {
        args.push("--extract-audio".to_string());
        args.push("--audio-format".to_string());
        args.push(spec.extension.to_string());
        if let Some(kbps) = spec.audio_bitrate_kbps {
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", kbps));
        }
    } else {
        // --merge-output-format only fires when separate streams are merged;
        // a pre-merged single format (e.g. a lone webm) needs the remux to
        // land in the same container
        args.push("--merge-output-format".to_string());
        args.push(spec.extension.to_string());
        args.push("--remux-video".to_string());
        args.push(spec.extension.to_string());
    }

    args.push(url.as_str().to_string());
    args
}

/// Picks the produced file: the expected normalized path when it exists,
/// otherwise the engine-reported filename. The engine reports the name it
/// wrote before post-processing, so the normalized path is checked first.
fn resolve_final_path(expected: PathBuf, reported: Option<&Path>) -> AppResult<PathBuf> {
    if fs_err::metadata(&expected).is_ok() {
        return Ok(expected);
    }
    if let Some(reported) = reported {
        if fs_err::metadata(reported).is_ok() {
            return Ok(reported.to_path_buf());
        }
    }
    Err(AppError::Download(format!(
        "Engine reported success but no file was produced at {}",
        expected.display()
    )))
}

/// Picks the most useful part of yt-dlp's stderr for the user-facing
/// message: the ERROR lines when present, the whole trimmed output
/// otherwise.
fn engine_error_text(stderr: &str) -> String {
    let errors: Vec<&str> = stderr.lines().filter(|line| line.starts_with("ERROR")).collect();
    if errors.is_empty() {
        stderr.trim().to_string()
    } else {
        errors.join("\n")
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &Url) -> AppResult<MediaMetadata> {
        log::debug!("Probing metadata for {}", url);

        let output = timeout(
            config::download::probe_timeout(),
            TokioCommand::new(&self.bin)
                .args(["--dump-json", "--no-playlist", "--no-warnings", url.as_str()])
                .output(),
        )
        .await
        .map_err(|_| AppError::Extraction("yt-dlp metadata probe timed out".to_string()))?
        .map_err(|e| AppError::Extraction(format!("Failed to execute {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("yt-dlp probe failed for {}: {}", url, stderr.trim());
            return Err(AppError::Extraction(engine_error_text(&stderr)));
        }

        let info: YtDlpInfo = serde_json::from_slice(&output.stdout)
            .map_err(|e| AppError::Extraction(format!("Failed to parse yt-dlp output: {}", e)))?;

        Ok(info.into())
    }

    async fn extract(&self, url: &Url, spec: &FormatSpec, output_stem: &Path) -> AppResult<ExtractOutput> {
        // yt-dlp fills %(ext)s with the intermediate container; the
        // post-processors below guarantee the final extension.
        let template = format!("{}.%(ext)s", output_stem.display());
        let final_path = output_stem.with_extension(spec.extension);
        let args = build_download_args(spec, &template, url);

        log::debug!("yt-dlp download command: {} {}", self.bin, args.join(" "));

        let output = timeout(
            config::download::ytdlp_timeout(),
            TokioCommand::new(&self.bin).args(&args).output(),
        )
        .await
        .map_err(|_| AppError::Download("yt-dlp download timed out".to_string()))?
        .map_err(|e| AppError::Download(format!("Failed to execute {}: {}", self.bin, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            log::warn!("yt-dlp download failed for {}: {}", url, stderr.trim());
            return Err(AppError::Download(engine_error_text(&stderr)));
        }

        // Metadata parse failure is not fatal once a file exists
        let info = serde_json::from_slice::<YtDlpInfo>(&output.stdout).ok();
        let reported = info.as_ref().and_then(|i| i.filename.as_deref());
        let file_path = resolve_final_path(final_path, reported)?;
        let metadata = info.map(MediaMetadata::from).unwrap_or_default();

        Ok(ExtractOutput { file_path, metadata })
    }
}
