//! Platform resolution: maps a URL to a known social-media platform by
//! substring match against a fixed domain table.
//!
//! The table is declaration-ordered and `resolve` returns the first match,
//! so ties (which should not occur for real URLs) break deterministically.

use strum::Display;

/// A social-media platform the bot recognizes by domain.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    YouTube,
    Instagram,
    TikTok,
    Twitter,
    Facebook,
    Reddit,
    Pinterest,
    SoundCloud,
    Spotify,
    Unknown,
}

/// Known domain substrings per platform, in declaration order.
const DOMAIN_TABLE: &[(Platform, &[&str])] = &[
    (Platform::YouTube, &["youtube.com", "youtu.be"]),
    (Platform::Instagram, &["instagram.com", "instagr.am"]),
    (Platform::TikTok, &["tiktok.com", "vt.tiktok.com"]),
    (Platform::Twitter, &["twitter.com", "x.com", "t.co"]),
    (Platform::Facebook, &["facebook.com", "fb.watch", "fb.com"]),
    (Platform::Reddit, &["reddit.com", "redd.it"]),
    (Platform::Pinterest, &["pinterest.com", "pin.it"]),
    (Platform::SoundCloud, &["soundcloud.com"]),
    (Platform::Spotify, &["spotify.com", "open.spotify.com"]),
];

/// Resolves the platform for a URL by case-insensitive substring match.
/// Returns `Platform::Unknown` when no registered domain matches.
pub fn resolve(url: &str) -> Platform {
    let url_lower = url.to_lowercase();
    for (platform, domains) in DOMAIN_TABLE {
        if domains.iter().any(|domain| url_lower.contains(domain)) {
            return *platform;
        }
    }
    Platform::Unknown
}

impl Platform {
    /// All recognized platforms, in table order (excludes `Unknown`).
    pub fn all() -> impl Iterator<Item = Platform> {
        DOMAIN_TABLE.iter().map(|(p, _)| *p)
    }

    /// Whether the platform is one of the recognized ones.
    pub fn is_known(self) -> bool {
        self != Platform::Unknown
    }

    /// Platforms that only carry audio streams; video requests for these
    /// are downgraded to the audio format specification.
    pub fn is_audio_only(self) -> bool {
        matches!(self, Platform::SoundCloud | Platform::Spotify)
    }

    /// Emoji icon shown next to the platform name.
    pub fn icon(self) -> &'static str {
        match self {
            Platform::YouTube => "📺",
            Platform::Instagram => "📸",
            Platform::TikTok => "🎵",
            Platform::Twitter => "🐦",
            Platform::Facebook => "📘",
            Platform::Reddit => "🔴",
            Platform::Pinterest => "📌",
            Platform::SoundCloud => "☁️",
            Platform::Spotify => "🎧",
            Platform::Unknown => "🔗",
        }
    }

    /// Human-readable display name.
    pub fn title(self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::Instagram => "Instagram",
            Platform::TikTok => "TikTok",
            Platform::Twitter => "Twitter/X",
            Platform::Facebook => "Facebook",
            Platform::Reddit => "Reddit",
            Platform::Pinterest => "Pinterest",
            Platform::SoundCloud => "SoundCloud",
            Platform::Spotify => "Spotify",
            Platform::Unknown => "Unknown",
        }
    }

    /// Stable lowercase slug used in callback tokens (`platform_<slug>`)
    /// and generated filenames. Provided by the strum `Display` derive.
    pub fn slug(self) -> String {
        self.to_string()
    }

    /// Parses a slug back into a platform. Inverse of [`Platform::slug`]
    /// for every known platform; unknown slugs return `None`.
    pub fn from_slug(slug: &str) -> Option<Platform> {
        Self::all().find(|p| p.slug() == slug)
    }
}
