// SPDX-License-Identifier: MPL-2.0
//! YouTube embed player backend.
//!
//! The iframe player itself lives in the host; this backend owns the id
//! extraction and embed URL, and mirrors the commands sent to the embed.

use crate::application::port::{PlayerBackend, PlayerEvent};
use crate::domain::video::{PlaybackRate, SourceKind, VideoSource};
use crate::error::PlayerError;
use regex::Regex;
use std::sync::LazyLock;

/// Matches `youtube.com/watch?...v=<id>` and `youtu.be/<id>`.
static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:youtube\.com/watch\?(?:[^#]*&)?v=|youtu\.be/)([A-Za-z0-9_-]+)")
        .expect("video id pattern is valid")
});

/// Extracts the video id from a YouTube watch or short link.
///
/// # Examples
///
/// ```
/// use race_ana::infrastructure::player::youtube::extract_video_id;
///
/// assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
/// assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=3").as_deref(), Some("dQw4w9WgXcQ"));
/// assert_eq!(extract_video_id("/videos/lap.mp4"), None);
/// ```
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    VIDEO_ID
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}

/// Embed URL with branding and native controls disabled.
#[must_use]
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}?modestbranding=1&controls=0&enablejsapi=1")
}

/// Backend for YouTube iframe embeds.
#[derive(Debug, Default)]
pub struct YoutubeBackend {
    video_id: Option<String>,
    position: f64,
    duration: f64,
    playing: bool,
    rate: PlaybackRate,
    events: Vec<PlayerEvent>,
}

impl YoutubeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the loaded video.
    #[must_use]
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Embed URL of the loaded video.
    #[must_use]
    pub fn embed(&self) -> Option<String> {
        self.video_id.as_deref().map(embed_url)
    }

    #[must_use]
    pub fn rate(&self) -> PlaybackRate {
        self.rate
    }
}

impl PlayerBackend for YoutubeBackend {
    fn kind(&self) -> SourceKind {
        SourceKind::Youtube
    }

    fn load(&mut self, source: &VideoSource) -> Result<(), PlayerError> {
        self.position = 0.0;
        self.duration = 0.0;
        self.playing = false;

        match extract_video_id(&source.url) {
            Some(id) => {
                tracing::debug!(video_id = %id, "youtube source loaded");
                self.video_id = Some(id);
                Ok(())
            }
            None => {
                self.video_id = None;
                let err = PlayerError::InvalidYoutubeUrl(source.url.clone());
                self.events.push(PlayerEvent::Error {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    fn play(&mut self) {
        if self.video_id.is_some() && !self.playing {
            self.playing = true;
            self.events.push(PlayerEvent::Play);
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.playing = false;
            self.events.push(PlayerEvent::Pause);
        }
    }

    fn seek_to(&mut self, seconds: f64) {
        self.position = seconds;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: PlaybackRate) {
        self.rate = rate;
    }

    fn poll_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=abc_-123&t=9").as_deref(),
            Some("abc_-123")
        );
        assert_eq!(
            extract_video_id("https://m.youtube.com/watch?v=XYZ").as_deref(),
            Some("XYZ")
        );
    }

    #[test]
    fn extracts_id_from_short_url() {
        assert_eq!(extract_video_id("youtu.be/short1").as_deref(), Some("short1"));
    }

    #[test]
    fn no_id_for_other_urls() {
        assert_eq!(extract_video_id("https://www.youtube.com/"), None);
        assert_eq!(extract_video_id("https://vimeo.com/123"), None);
    }

    #[test]
    fn load_builds_embed_url() {
        let mut backend = YoutubeBackend::new();
        backend
            .load(&VideoSource::youtube_id("abc"))
            .expect("load should succeed");
        assert_eq!(backend.video_id(), Some("abc"));
        assert!(backend.embed().unwrap().starts_with("https://www.youtube.com/embed/abc?"));
    }

    #[test]
    fn load_rejects_url_without_id() {
        let mut backend = YoutubeBackend::new();
        let source = VideoSource {
            kind: SourceKind::Youtube,
            url: "https://youtube.com/channel/x".into(),
            title: None,
        };
        assert!(matches!(
            backend.load(&source),
            Err(PlayerError::InvalidYoutubeUrl(_))
        ));
        assert_eq!(backend.poll_events().len(), 1);
    }
}
