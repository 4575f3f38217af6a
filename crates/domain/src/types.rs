//! Spotify payload types used throughout the application

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A track currently playing for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    /// Public `open.spotify.com` URL of the track
    pub link: String,
}

impl Song {
    /// Markdown link `[name](link)` inserted into notes
    #[must_use]
    pub fn markdown_link(&self) -> String {
        format!("[{}]({})", self.name, self.link)
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.markdown_link())
    }
}

/// Profile image variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

/// The connected user's public profile (subset of `GET /me`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
    #[serde(default)]
    pub images: Vec<ProfileImage>,
}

impl SpotifyProfile {
    /// Display name, falling back to the account id
    #[must_use]
    pub fn name(&self) -> &str {
        self.display_name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.id)
    }

    /// First image URL, if the user has a profile picture
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|i| i.url.as_str())
    }

    /// Public profile page
    #[must_use]
    pub fn profile_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for types.
    use super::*;

    #[test]
    fn song_renders_markdown_link() {
        let song = Song {
            name: "Teardrop".to_string(),
            link: "https://open.spotify.com/track/67Hna13dNDkZvBpTXRIaOJ".to_string(),
        };

        assert_eq!(
            song.markdown_link(),
            "[Teardrop](https://open.spotify.com/track/67Hna13dNDkZvBpTXRIaOJ)"
        );
        assert_eq!(song.to_string(), song.markdown_link());
    }

    #[test]
    fn profile_parses_me_payload() {
        let profile: SpotifyProfile = serde_json::from_str(
            r#"{
                "id": "wizzler",
                "display_name": "Wizzler",
                "country": "SE",
                "external_urls": {"spotify": "https://open.spotify.com/user/wizzler"},
                "images": [{"url": "https://i.scdn.co/image/abc", "height": 300, "width": 300}]
            }"#,
        )
        .unwrap();

        assert_eq!(profile.name(), "Wizzler");
        assert_eq!(profile.image_url(), Some("https://i.scdn.co/image/abc"));
        assert_eq!(profile.profile_url(), Some("https://open.spotify.com/user/wizzler"));
    }

    #[test]
    fn profile_without_name_or_image() {
        let profile: SpotifyProfile =
            serde_json::from_str(r#"{"id": "u1", "display_name": null, "images": []}"#).unwrap();

        assert_eq!(profile.name(), "u1");
        assert_eq!(profile.image_url(), None);
    }
}
