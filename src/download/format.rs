//! Format specification: translates a `(platform, mode)` pair into the
//! declarative description of stream/quality/container handed to yt-dlp.

use crate::core::config;
use crate::platform::Platform;

/// The user's requested output kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Best available combined video+audio stream
    Video,
    /// Best audio track, transcoded to mp3
    Audio,
    /// Best video+audio capped at 1080p
    HdVideo,
    /// Metadata only, no file is produced
    InfoOnly,
}

impl Mode {
    /// Whether this mode produces a local file.
    pub fn is_download(self) -> bool {
        !matches!(self, Mode::InfoOnly)
    }
}

/// Declarative download format passed to the extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// yt-dlp `-f` selector
    pub selector: &'static str,
    /// Extension of the produced file ("mp3" or "mp4")
    pub extension: &'static str,
    /// Extract and transcode the audio track only
    pub audio_only: bool,
    /// Target audio bitrate in kbps (audio downloads only)
    pub audio_bitrate_kbps: Option<u32>,
}

impl FormatSpec {
    fn audio() -> Self {
        Self {
            selector: "bestaudio/best",
            extension: "mp3",
            audio_only: true,
            audio_bitrate_kbps: Some(config::download::AUDIO_BITRATE_KBPS),
        }
    }

    fn video(selector: &'static str) -> Self {
        Self {
            selector,
            extension: "mp4",
            audio_only: false,
            audio_bitrate_kbps: None,
        }
    }
}

/// Builds the format specification for a platform and mode.
///
/// `Mode::InfoOnly` has no format; callers must route it to the metadata
/// probe instead of a download.
pub fn spec_for(platform: Platform, mode: Mode) -> FormatSpec {
    debug_assert!(mode.is_download(), "InfoOnly has no download format");

    match mode {
        Mode::Audio => FormatSpec::audio(),
        // SoundCloud/Spotify carry no video stream worth selecting
        Mode::Video | Mode::HdVideo if platform.is_audio_only() => FormatSpec::audio(),
        Mode::HdVideo => FormatSpec::video("bestvideo[height<=1080]+bestaudio/best[height<=1080]"),
        Mode::Video | Mode::InfoOnly => FormatSpec::video("best"),
    }
}
