// SPDX-License-Identifier: MPL-2.0
//! `m:ss` time text used when displaying and editing marker times.

/// Formats seconds as `m:ss`, flooring both parts.
///
/// # Examples
///
/// ```
/// use race_ana::domain::marker::format_time;
///
/// assert_eq!(format_time(0.0), "0:00");
/// assert_eq!(format_time(75.9), "1:15");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Formats an optional side time, using `-` for an unset side.
#[must_use]
pub fn format_optional_time(seconds: Option<f64>) -> String {
    seconds.map_or_else(|| "-".to_string(), format_time)
}

/// Parses `mm:ss` text into seconds.
///
/// Both parts must be non-negative numbers; the seconds part may carry a
/// fraction (`1:02.5`). Anything else returns `None`.
#[must_use]
pub fn parse_time_text(text: &str) -> Option<f64> {
    let (minutes, seconds) = text.trim().split_once(':')?;
    let minutes: f64 = minutes.trim().parse().ok()?;
    let seconds: f64 = seconds.trim().parse().ok()?;
    if !minutes.is_finite() || !seconds.is_finite() || minutes < 0.0 || seconds < 0.0 {
        return None;
    }
    Some(minutes * 60.0 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_seconds() {
        assert_eq!(format_time(5.0), "0:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn format_optional_uses_dash() {
        assert_eq!(format_optional_time(None), "-");
        assert_eq!(format_optional_time(Some(62.0)), "1:02");
    }

    #[test]
    fn parse_accepts_minutes_and_seconds() {
        assert_eq!(parse_time_text("1:15"), Some(75.0));
        assert_eq!(parse_time_text(" 0:07 "), Some(7.0));
        assert_eq!(parse_time_text("2:03.5"), Some(123.5));
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert_eq!(parse_time_text(""), None);
        assert_eq!(parse_time_text("75"), None);
        assert_eq!(parse_time_text("a:10"), None);
        assert_eq!(parse_time_text("1:-4"), None);
        assert_eq!(parse_time_text("1:2:3"), None);
    }
}
