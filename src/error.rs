// SPDX-License-Identifier: MPL-2.0
use crate::domain::marker::MarkerError;
use crate::domain::video::ACCEPTED_EXTENSIONS;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Storage(String),
    Share(String),
    Player(PlayerError),
    Marker(MarkerError),
}

/// Specific error types for player loading and control issues.
/// Used to surface a precise reason next to the side's "failed" flag.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerError {
    /// Picked file is not a supported video container.
    UnsupportedFormat { file: String },

    /// URL does not contain a YouTube video id.
    InvalidYoutubeUrl(String),

    /// Local source can no longer be reached (revoked object URL or missing file).
    SourceUnavailable(String),

    /// The underlying player reported a load error.
    LoadFailed(String),

    /// A command was issued before any source was loaded.
    NotLoaded,
}

impl PlayerError {
    /// Returns true if the user has to pick the source again to recover.
    pub fn needs_reselect(&self) -> bool {
        matches!(
            self,
            PlayerError::SourceUnavailable(_) | PlayerError::UnsupportedFormat { .. }
        )
    }
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerError::UnsupportedFormat { file } => write!(
                f,
                "Unsupported video format: {} (accepted: {})",
                file,
                ACCEPTED_EXTENSIONS.join(", ")
            ),
            PlayerError::InvalidYoutubeUrl(url) => write!(f, "Not a YouTube video URL: {}", url),
            PlayerError::SourceUnavailable(url) => {
                write!(f, "Video source is no longer available: {}", url)
            }
            PlayerError::LoadFailed(msg) => write!(f, "Video failed to load: {}", msg),
            PlayerError::NotLoaded => write!(f, "No video loaded"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Storage(e) => write!(f, "Storage Error: {}", e),
            Error::Share(e) => write!(f, "Share Error: {}", e),
            Error::Player(e) => write!(f, "Player Error: {}", e),
            Error::Marker(e) => write!(f, "Marker Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<PlayerError> for Error {
    fn from(err: PlayerError) -> Self {
        Error::Player(err)
    }
}

impl From<MarkerError> for Error {
    fn from(err: MarkerError) -> Self {
        Error::Marker(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::Share(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
