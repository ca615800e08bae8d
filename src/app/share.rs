// SPDX-License-Identifier: MPL-2.0
//! Share links: current comparison state encoded as URL query parameters.
//!
//! | Parameter | Value |
//! |-----------|-------|
//! | `left`, `right` | YouTube video id |
//! | `leftLabels`, `rightLabels` | comma-separated `label-seconds` pairs |
//! | `leftStartTime`, `rightStartTime` | seconds |
//!
//! All times use two decimals. Local files cannot be shared, so only YouTube
//! sources produce a video parameter.

use crate::application::port::ClipboardSink;
use crate::domain::marker::{validate_label, validate_time, Marker, MarkerId};
use crate::domain::video::{Side, SourceKind, VideoSource};
use crate::infrastructure::player::youtube::extract_video_id;
use url::Url;

/// Query parameter names.
pub mod share_params {
    pub const LEFT: &str = "left";
    pub const RIGHT: &str = "right";
    pub const LEFT_LABELS: &str = "leftLabels";
    pub const RIGHT_LABELS: &str = "rightLabels";
    pub const LEFT_START_TIME: &str = "leftStartTime";
    pub const RIGHT_START_TIME: &str = "rightStartTime";
}

use share_params::*;

fn video_param(side: Side) -> &'static str {
    match side {
        Side::Left => LEFT,
        Side::Right => RIGHT,
    }
}

fn labels_param(side: Side) -> &'static str {
    match side {
        Side::Left => LEFT_LABELS,
        Side::Right => RIGHT_LABELS,
    }
}

fn start_time_param(side: Side) -> &'static str {
    match side {
        Side::Left => LEFT_START_TIME,
        Side::Right => RIGHT_START_TIME,
    }
}

/// Inclusion toggles of a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareOptions {
    pub include_markers: bool,
    pub include_time: bool,
}

impl Default for ShareOptions {
    fn default() -> Self {
        Self {
            include_markers: true,
            include_time: true,
        }
    }
}

/// State captured into a share link.
#[derive(Debug, Clone, Copy)]
pub struct ShareState<'a> {
    pub left_video: Option<&'a VideoSource>,
    pub right_video: Option<&'a VideoSource>,
    pub markers: &'a [Marker],
    pub left_time: f64,
    pub right_time: f64,
}

impl ShareState<'_> {
    fn video(&self, side: Side) -> Option<&VideoSource> {
        match side {
            Side::Left => self.left_video,
            Side::Right => self.right_video,
        }
    }

    fn time(&self, side: Side) -> f64 {
        match side {
            Side::Left => self.left_time,
            Side::Right => self.right_time,
        }
    }
}

/// `base` without query or fragment.
#[must_use]
pub fn bare_url(base: &Url) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// `label-seconds` pairs for `side`. Entries that could not be decoded back
/// (blank label, `,` in the label, negative or non-finite time) are left out.
fn encode_labels(markers: &[Marker], side: Side) -> String {
    markers
        .iter()
        .filter(|marker| validate_label(&marker.label).is_ok())
        .filter_map(|marker| {
            marker
                .time(side)
                .filter(|time| validate_time(*time).is_ok())
                .map(|time| format!("{}-{:.2}", marker.label, time))
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the share link for `state` on top of `base`.
///
/// Start times are written only for sides with a video and a position past
/// zero. Marker labels are written only when at least one marker exists.
#[must_use]
pub fn build_share_url(base: &Url, state: &ShareState<'_>, options: ShareOptions) -> Url {
    let mut url = bare_url(base);
    {
        let mut query = url.query_pairs_mut();

        for side in Side::BOTH {
            let id = state
                .video(side)
                .filter(|video| video.kind == SourceKind::Youtube)
                .and_then(|video| extract_video_id(&video.url));
            if let Some(id) = id {
                query.append_pair(video_param(side), &id);
            }
        }

        if options.include_markers && !state.markers.is_empty() {
            for side in Side::BOTH {
                let labels = encode_labels(state.markers, side);
                if !labels.is_empty() {
                    query.append_pair(labels_param(side), &labels);
                }
            }
        }

        if options.include_time {
            for side in Side::BOTH {
                let time = state.time(side);
                if state.video(side).is_some() && time > 0.0 {
                    query.append_pair(start_time_param(side), &format!("{time:.2}"));
                }
            }
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }
    url
}

/// State decoded from a share link's query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShareParams {
    pub left: Option<String>,
    pub right: Option<String>,
    pub left_labels: Vec<(String, f64)>,
    pub right_labels: Vec<(String, f64)>,
    pub left_start_time: Option<f64>,
    pub right_start_time: Option<f64>,
}

fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
}

fn parse_labels(raw: &str) -> Vec<(String, f64)> {
    raw.split(',')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let parsed = pair
                .rsplit_once('-')
                .and_then(|(label, secs)| Some((label, parse_seconds(secs)?)))
                .filter(|(label, _)| !label.is_empty());
            if parsed.is_none() {
                tracing::warn!(%pair, "skipping malformed marker label in share link");
            }
            parsed.map(|(label, secs)| (label.to_string(), secs))
        })
        .collect()
}

impl ShareParams {
    /// Decodes the share parameters of `url`. Unknown parameters are
    /// ignored; malformed values are skipped.
    #[must_use]
    pub fn parse(url: &Url) -> Self {
        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                LEFT if !value.is_empty() => params.left = Some(value.into_owned()),
                RIGHT if !value.is_empty() => params.right = Some(value.into_owned()),
                LEFT_LABELS => params.left_labels = parse_labels(&value),
                RIGHT_LABELS => params.right_labels = parse_labels(&value),
                LEFT_START_TIME => params.left_start_time = parse_seconds(&value),
                RIGHT_START_TIME => params.right_start_time = parse_seconds(&value),
                _ => {}
            }
        }
        params
    }

    /// True if the link carries no comparison state at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// YouTube source for `side`, if the link names one.
    #[must_use]
    pub fn video(&self, side: Side) -> Option<VideoSource> {
        let id = match side {
            Side::Left => self.left.as_deref(),
            Side::Right => self.right.as_deref(),
        };
        id.map(VideoSource::youtube_id)
    }

    #[must_use]
    pub fn start_time(&self, side: Side) -> Option<f64> {
        match side {
            Side::Left => self.left_start_time,
            Side::Right => self.right_start_time,
        }
    }

    #[must_use]
    pub fn has_markers(&self) -> bool {
        !self.left_labels.is_empty() || !self.right_labels.is_empty()
    }

    /// Markers rebuilt from both label lists, merged by label.
    ///
    /// Left labels keep their order; right-only labels follow. Ids are
    /// assigned from 1 in that order.
    #[must_use]
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers: Vec<Marker> = Vec::new();
        let sides = [
            (Side::Left, &self.left_labels),
            (Side::Right, &self.right_labels),
        ];
        for (side, labels) in sides {
            for (label, time) in labels {
                match markers.iter_mut().find(|m| &m.label == label) {
                    Some(marker) => marker.set_time(side, *time),
                    None => {
                        let mut marker = Marker {
                            id: MarkerId(markers.len() as u64 + 1),
                            label: label.clone(),
                            left_time: None,
                            right_time: None,
                        };
                        marker.set_time(side, *time);
                        markers.push(marker);
                    }
                }
            }
        }
        markers
    }
}

/// How a share link reached the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Copied by the named clipboard.
    Copied { via: &'static str },
    /// Every clipboard failed; the link has to be copied by hand.
    Manual(String),
}

/// Copies `link` through the first clipboard that accepts it.
pub fn copy_link(link: &str, sinks: &mut [&mut dyn ClipboardSink]) -> CopyOutcome {
    for sink in sinks.iter_mut() {
        match sink.write_text(link) {
            Ok(()) => {
                tracing::debug!(via = sink.name(), "share link copied");
                return CopyOutcome::Copied { via: sink.name() };
            }
            Err(err) => {
                tracing::warn!(via = sink.name(), error = %err, "clipboard copy failed");
            }
        }
    }
    CopyOutcome::Manual(link.to_string())
}
