//! User-facing message texts (Telegram HTML parse mode).
//!
//! Everything dynamic (titles, uploader names, error causes) goes through
//! `escape_html` so engine output can never break the markup.

use crate::core::utils::{escape_html, format_duration, format_size, truncate_text};
use crate::download::{MediaMetadata, Mode};
use crate::platform::Platform;

pub const WELCOME: &str = "🎉 <b>Welcome to MediaDown Bot!</b>\n\n\
I download media from social platforms.\n\n\
<b>📱 Supported:</b> YouTube, Instagram, TikTok, Twitter/X, Facebook, Reddit, \
Pinterest, SoundCloud, Spotify\n\n\
<b>🚀 How to use:</b>\n\
1. Send me a media URL\n\
2. Pick video, audio, or HD\n\
3. Receive the file right here\n\n\
Type /help for more details.";

pub const HELP: &str = "<b>📖 Usage Guide</b>\n\n\
<b>🎯 Commands:</b>\n\
/start — main menu\n\
/help — this guide\n\
/about — about the bot\n\
/stats — bot statistics (admin only)\n\n\
<b>🔗 Supported URL formats:</b>\n\
• YouTube: youtube.com/watch?v=... or youtu.be/...\n\
• Instagram: instagram.com/p/... or instagram.com/reel/...\n\
• TikTok: tiktok.com/@user/video/... or vt.tiktok.com/...\n\
• Twitter: twitter.com/user/status/... or x.com/...\n\
• Facebook: facebook.com/watch?v=... or fb.watch/...\n\
• Reddit: reddit.com/r/.../comments/...\n\
• Pinterest: pinterest.com/pin/... or pin.it/...\n\n\
<b>⚠️ Limits:</b>\n\
• Maximum file size: 50 MB\n\
• Private content cannot be downloaded";

/// About text with the public counters filled in.
pub fn about(total_downloads: u64, total_users: u64) -> String {
    format!(
        "<b>ℹ️ About MediaDown Bot</b>\n\n\
         Downloads video and audio from 9 platforms,\n\
         powered by yt-dlp.\n\n\
         <b>📊 Statistics:</b>\n\
         📥 Total downloads: {}\n\
         👥 Users: {}",
        total_downloads, total_users
    )
}

/// Admin stats panel.
pub fn admin_stats(total_downloads: u64, total_users: u64) -> String {
    format!(
        "<b>📊 Bot Statistics</b>\n\n\
         👥 Total users: {}\n\
         📥 Total downloads: {}\n\
         📱 Platforms: {}",
        total_users,
        total_downloads,
        Platform::all().count()
    )
}

pub const NOT_ADMIN: &str = "⛔ You do not have access to this command.";

pub const INVALID_URL: &str = "❌ <b>Invalid URL!</b>\n\n\
Make sure you send a complete link.\n\
Example: https://youtube.com/watch?v=...";

pub const UNSUPPORTED_PLATFORM: &str = "❌ <b>Unsupported platform!</b>\n\n\
Supported: YouTube, Instagram, TikTok, Twitter/X, Facebook, Reddit, \
Pinterest, SoundCloud, Spotify";

pub const CANCELLED: &str = "❌ <b>Cancelled</b>\n\nSend a new URL to start a download.";

pub const GENERIC_FAILURE: &str = "❌ <b>Something went wrong!</b>\n\nPlease try again or contact the admin.";

/// Shown while the URL is being probed.
pub fn detecting(platform: Platform) -> String {
    format!(
        "{} <b>Detected a {} link...</b>\n⏳ Fetching media info...",
        platform.icon(),
        platform.title()
    )
}

/// Info card shown with the download options keyboard.
pub fn info_card(platform: Platform, meta: &MediaMetadata) -> String {
    let size = if meta.approx_size_bytes > 0 {
        format_size(meta.approx_size_bytes)
    } else {
        "Unknown".to_string()
    };
    format!(
        "<b>{} {} Media Detected</b>\n\n\
         📝 <b>Title:</b> {}\n\
         👤 <b>Uploader:</b> {}\n\
         ⏱ <b>Duration:</b> {}\n\
         📦 <b>Size:</b> {}\n\n\
         <b>Choose a download option:</b>",
        platform.icon(),
        platform.title(),
        escape_html(&truncate_text(&meta.title, 50)),
        escape_html(&meta.uploader),
        format_duration(meta.duration_secs),
        size
    )
}

/// Extended metadata card for the Info button.
pub fn extended_info_card(platform: Platform, meta: &MediaMetadata) -> String {
    let size = if meta.approx_size_bytes > 0 {
        format_size(meta.approx_size_bytes)
    } else {
        "Unknown".to_string()
    };
    let description = if meta.description.is_empty() {
        "No description".to_string()
    } else {
        escape_html(&truncate_text(&meta.description, 300))
    };
    format!(
        "<b>{} Media Information</b>\n\n\
         📝 <b>Title:</b>\n{}\n\n\
         👤 <b>Uploader:</b> {}\n\
         ⏱ <b>Duration:</b> {}\n\
         📦 <b>Approx. size:</b> {}\n\
         🎬 <b>Available formats:</b> {}\n\n\
         📝 <b>Description:</b>\n{}",
        platform.icon(),
        escape_html(&meta.title),
        escape_html(&meta.uploader),
        format_duration(meta.duration_secs),
        size,
        meta.format_count,
        description
    )
}

/// Shown while the download runs.
pub fn downloading(platform: Platform, mode: Mode) -> String {
    let kind = match mode {
        Mode::Video => "VIDEO",
        Mode::Audio => "AUDIO",
        Mode::HdVideo => "HD VIDEO",
        Mode::InfoOnly => "INFO",
    };
    format!(
        "⏳ <b>Downloading...</b>\n\n\
         📱 Platform: {}\n\
         📦 Type: {}\n\n\
         This can take a few minutes, please wait...",
        platform.title(),
        kind
    )
}

/// Shown between download completion and upload completion.
pub fn uploading(title: &str, size_bytes: u64) -> String {
    format!(
        "📤 <b>Uploading file...</b>\n\n📁 {}\n📦 {}",
        escape_html(&truncate_text(title, 30)),
        format_size(size_bytes)
    )
}

/// Size-exceeded response; the file was already deleted.
pub fn too_large(size_bytes: u64, limit_bytes: u64) -> String {
    format!(
        "❌ <b>File too large!</b>\n\n\
         Size: {}\n\
         Maximum: {}\n\n\
         Try the audio option or a lower quality.",
        format_size(size_bytes),
        format_size(limit_bytes)
    )
}

/// Caption attached to the delivered file.
pub fn caption(platform: Platform, meta: &MediaMetadata, size_bytes: u64) -> String {
    format!(
        "<b>✅ Download complete!</b>\n\n\
         📝 {}\n\
         👤 {}\n\
         📱 {}\n\
         📦 {}",
        escape_html(&truncate_text(&meta.title, 100)),
        escape_html(&meta.uploader),
        platform.title(),
        format_size(size_bytes)
    )
}

/// URL-format hint shown after picking a platform from the menu.
pub fn platform_hint(platform: Platform) -> String {
    format!(
        "<b>{} {}</b>\n\n\
         Send me a {} link to download.",
        platform.icon(),
        platform.title(),
        platform.title()
    )
}

pub const PLATFORM_MENU: &str = "<b>📱 Pick a platform:</b>\n\n\
Choose the platform you want to download from:";

/// Error response carrying the underlying cause text.
pub fn failure(cause: &str) -> String {
    format!(
        "❌ <b>Download failed!</b>\n\n<code>{}</code>\n\nTry again or contact support.",
        escape_html(cause)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meta() -> MediaMetadata {
        MediaMetadata {
            title: "A <Test> & Title".to_string(),
            uploader: "Channel".to_string(),
            duration_secs: 125,
            approx_size_bytes: 2 * 1024 * 1024,
            format_count: 4,
            description: "desc".to_string(),
        }
    }

    #[test]
    fn test_info_card_escapes_html() {
        let card = info_card(Platform::YouTube, &sample_meta());
        assert!(card.contains("&lt;Test&gt; &amp; Title"));
        assert!(card.contains("2:05"));
        assert!(card.contains("2.0 MB"));
    }

    #[test]
    fn test_info_card_unknown_size() {
        let mut meta = sample_meta();
        meta.approx_size_bytes = 0;
        assert!(info_card(Platform::YouTube, &meta).contains("Unknown"));
    }

    #[test]
    fn test_failure_escapes_cause() {
        let text = failure("ERROR: <private> video");
        assert!(text.contains("&lt;private&gt;"));
        assert!(!text.contains("<private>"));
    }

    #[test]
    fn test_about_carries_counters() {
        let text = about(12, 3);
        assert!(text.contains("12"));
        assert!(text.contains('3'));
    }
}
