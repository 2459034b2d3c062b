//! Callback-token codec for inline keyboard buttons.
//!
//! Internally every button press is a tagged `CallbackAction`; the ad-hoc
//! `"<action>|<url>"` wire encoding only exists at this boundary, in
//! `parse` and `encode`. Handlers never look at raw callback strings.

use crate::download::Mode;
use crate::platform::Platform;

/// A structured button-press action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackAction {
    /// Start a download of `url` in the given mode
    Download { mode: Mode, url: String },
    /// Show the extended metadata card for `url`
    Info { url: String },
    /// Open the platform picker
    DownloadMenu,
    Help,
    About,
    /// Return to the main menu
    BackMain,
    /// Show URL-format hints for one platform
    Platform(Platform),
    Cancel,
    Close,
}

impl CallbackAction {
    /// Parses a wire token. Returns `None` for anything unrecognized,
    /// including download tokens with an empty URL part.
    pub fn parse(data: &str) -> Option<CallbackAction> {
        if let Some((action, url)) = data.split_once('|') {
            if url.is_empty() {
                return None;
            }
            let url = url.to_string();
            return match action {
                "dl_video" => Some(CallbackAction::Download { mode: Mode::Video, url }),
                "dl_audio" => Some(CallbackAction::Download { mode: Mode::Audio, url }),
                "dl_hd" => Some(CallbackAction::Download { mode: Mode::HdVideo, url }),
                "info" => Some(CallbackAction::Info { url }),
                _ => None,
            };
        }

        if let Some(slug) = data.strip_prefix("platform_") {
            return Platform::from_slug(slug).map(CallbackAction::Platform);
        }

        match data {
            "download_menu" => Some(CallbackAction::DownloadMenu),
            "help" => Some(CallbackAction::Help),
            "about" => Some(CallbackAction::About),
            "back_main" => Some(CallbackAction::BackMain),
            "cancel" => Some(CallbackAction::Cancel),
            "close" => Some(CallbackAction::Close),
            _ => None,
        }
    }

    /// Serializes to the wire encoding understood by `parse`.
    pub fn encode(&self) -> String {
        match self {
            CallbackAction::Download { mode, url } => {
                let action = match mode {
                    Mode::Video => "dl_video",
                    Mode::Audio => "dl_audio",
                    Mode::HdVideo => "dl_hd",
                    // An info-mode "download" button is just an info button
                    Mode::InfoOnly => "info",
                };
                format!("{}|{}", action, url)
            }
            CallbackAction::Info { url } => format!("info|{}", url),
            CallbackAction::DownloadMenu => "download_menu".to_string(),
            CallbackAction::Help => "help".to_string(),
            CallbackAction::About => "about".to_string(),
            CallbackAction::BackMain => "back_main".to_string(),
            CallbackAction::Platform(p) => format!("platform_{}", p.slug()),
            CallbackAction::Cancel => "cancel".to_string(),
            CallbackAction::Close => "close".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_download_tokens() {
        assert_eq!(
            CallbackAction::parse("dl_video|https://youtu.be/a"),
            Some(CallbackAction::Download {
                mode: Mode::Video,
                url: "https://youtu.be/a".to_string()
            })
        );
        assert_eq!(
            CallbackAction::parse("dl_audio|https://youtu.be/a"),
            Some(CallbackAction::Download {
                mode: Mode::Audio,
                url: "https://youtu.be/a".to_string()
            })
        );
        assert_eq!(
            CallbackAction::parse("dl_hd|https://youtu.be/a"),
            Some(CallbackAction::Download {
                mode: Mode::HdVideo,
                url: "https://youtu.be/a".to_string()
            })
        );
    }

    #[test]
    fn test_parse_keeps_pipes_inside_url() {
        // Only the first '|' separates action from payload
        let parsed = CallbackAction::parse("info|https://example.com/?a=1|2");
        assert_eq!(
            parsed,
            Some(CallbackAction::Info {
                url: "https://example.com/?a=1|2".to_string()
            })
        );
    }

    #[test]
    fn test_parse_control_tokens() {
        assert_eq!(CallbackAction::parse("download_menu"), Some(CallbackAction::DownloadMenu));
        assert_eq!(CallbackAction::parse("help"), Some(CallbackAction::Help));
        assert_eq!(CallbackAction::parse("about"), Some(CallbackAction::About));
        assert_eq!(CallbackAction::parse("back_main"), Some(CallbackAction::BackMain));
        assert_eq!(CallbackAction::parse("cancel"), Some(CallbackAction::Cancel));
        assert_eq!(CallbackAction::parse("close"), Some(CallbackAction::Close));
        assert_eq!(
            CallbackAction::parse("platform_youtube"),
            Some(CallbackAction::Platform(Platform::YouTube))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(CallbackAction::parse(""), None);
        assert_eq!(CallbackAction::parse("dl_video|"), None);
        assert_eq!(CallbackAction::parse("dl_torrent|https://x"), None);
        assert_eq!(CallbackAction::parse("platform_myspace"), None);
        assert_eq!(CallbackAction::parse("something_else"), None);
    }

    #[test]
    fn test_encode_parse_round_trip() {
        let actions = [
            CallbackAction::Download {
                mode: Mode::Video,
                url: "https://youtu.be/a".to_string(),
            },
            CallbackAction::Download {
                mode: Mode::Audio,
                url: "https://soundcloud.com/a/b".to_string(),
            },
            CallbackAction::Download {
                mode: Mode::HdVideo,
                url: "https://youtu.be/a".to_string(),
            },
            CallbackAction::Info {
                url: "https://youtu.be/a".to_string(),
            },
            CallbackAction::DownloadMenu,
            CallbackAction::Help,
            CallbackAction::About,
            CallbackAction::BackMain,
            CallbackAction::Platform(Platform::TikTok),
            CallbackAction::Cancel,
            CallbackAction::Close,
        ];
        for action in actions {
            assert_eq!(CallbackAction::parse(&action.encode()), Some(action));
        }
    }
}
