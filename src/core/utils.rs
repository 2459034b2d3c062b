//! Small formatting and validation helpers shared by the handlers.

use crate::core::config;
use url::Url;

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 * 1024 {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration for display as m:ss or h:mm:ss
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}

/// Safely truncates a string to the given number of characters (not bytes).
/// Appends "..." when truncation happened.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let char_count = text.chars().count();
    if char_count <= max_len {
        return text.to_string();
    }

    let truncate_len = max_len.saturating_sub(3);
    let mut result = String::with_capacity(truncate_len + 3);
    for (idx, ch) in text.chars().enumerate() {
        if idx >= truncate_len {
            break;
        }
        result.push(ch);
    }
    result.push_str("...");
    result
}

/// Basic URL-shape check: parses as an absolute http(s) URL with a host
/// and stays under the length cap. Does not check reachability.
pub fn is_valid_url(text: &str) -> bool {
    if text.len() > config::validation::MAX_URL_LENGTH {
        return false;
    }
    match Url::parse(text) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Escapes the characters with special meaning in Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_format_duration_short_and_long() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3600), "1:00:00");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_truncate_text_boundaries() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly_ten", 11), "exactly_ten");
        assert_eq!(truncate_text("a very long title indeed", 10), "a very ...");
    }

    #[test]
    fn test_truncate_text_multibyte() {
        // Must count characters, not bytes
        let text = "видео про котиков и не только";
        let truncated = truncate_text(text, 10);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 10);
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://youtube.com/watch?v=abc"));
        assert!(is_valid_url("http://youtu.be/abc123"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("youtube.com/watch?v=abc"));
        assert!(!is_valid_url(&format!("https://example.com/{}", "a".repeat(3000))));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a <b> & c"), "a &lt;b&gt; &amp; c");
        assert_eq!(escape_html("plain"), "plain");
    }
}
