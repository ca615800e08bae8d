// SPDX-License-Identifier: MPL-2.0
//! Video sources and the two comparison slots.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// File extensions accepted when picking a local video.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "ogv", "mov", "m4v", "mkv", "avi"];

/// One of the two video slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides, left first.
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Returns the other side.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Lowercase name, as used in URLs and CLI arguments.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            other => Err(format!("unknown side: {other}")),
        }
    }
}

/// Kind tag used to pick a player backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Local,
    Youtube,
}

impl SourceKind {
    /// Classifies free-form input: anything pointing at YouTube is an embed,
    /// everything else is treated as a local reference.
    #[must_use]
    pub fn classify(input: &str) -> Self {
        if input.contains("youtube.com") || input.contains("youtu.be") {
            SourceKind::Youtube
        } else {
            SourceKind::Local
        }
    }
}

/// The video loaded into one side.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSource {
    pub kind: SourceKind,
    pub url: String,
    pub title: Option<String>,
}

impl VideoSource {
    /// Builds a source from user input, returning `None` for blank input.
    #[must_use]
    pub fn from_input(input: &str, side: Side) -> Option<Self> {
        let url = input.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            kind: SourceKind::classify(url),
            url: url.to_string(),
            title: Some(default_title(side)),
        })
    }

    /// Builds a YouTube source for a bare video id.
    #[must_use]
    pub fn youtube_id(id: &str) -> Self {
        Self {
            kind: SourceKind::Youtube,
            url: format!("https://www.youtube.com/watch?v={id}"),
            title: None,
        }
    }

    /// Returns true if this source is backed by a local file.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.kind == SourceKind::Local
    }

    /// Display title, falling back to the URL.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.url)
    }
}

/// Default title for a side's video.
#[must_use]
pub fn default_title(side: Side) -> String {
    match side {
        Side::Left => "Video Left".to_string(),
        Side::Right => "Video Right".to_string(),
    }
}

/// Returns true if the file has one of the [`ACCEPTED_EXTENSIONS`].
#[must_use]
pub fn is_accepted_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_detects_youtube_forms() {
        assert_eq!(
            SourceKind::classify("https://www.youtube.com/watch?v=abc"),
            SourceKind::Youtube
        );
        assert_eq!(SourceKind::classify("https://youtu.be/abc"), SourceKind::Youtube);
        assert_eq!(SourceKind::classify("/videos/lap.mp4"), SourceKind::Local);
    }

    #[test]
    fn from_input_trims_and_rejects_blank() {
        assert!(VideoSource::from_input("   ", Side::Left).is_none());
        let source = VideoSource::from_input("  /tmp/lap.mp4 ", Side::Right).unwrap();
        assert_eq!(source.url, "/tmp/lap.mp4");
        assert_eq!(source.kind, SourceKind::Local);
        assert_eq!(source.title.as_deref(), Some("Video Right"));
    }

    #[test]
    fn side_parses_and_displays() {
        assert_eq!("LEFT".parse::<Side>().unwrap(), Side::Left);
        assert_eq!("r".parse::<Side>().unwrap(), Side::Right);
        assert!("middle".parse::<Side>().is_err());
        assert_eq!(Side::Left.to_string(), "left");
        assert_eq!(Side::Left.other(), Side::Right);
    }

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        assert!(is_accepted_video_file(Path::new("a/b/LAP.MP4")));
        assert!(is_accepted_video_file(Path::new("onboard.webm")));
        assert!(!is_accepted_video_file(Path::new("notes.txt")));
        assert!(!is_accepted_video_file(Path::new("noext")));
    }
}
