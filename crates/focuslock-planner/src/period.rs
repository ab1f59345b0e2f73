//! Compact milestone periods such as `2023-10-13T14:00-16:00`.
//!
//! A period is a start token and an end token joined by `-`. Tokens are
//! timestamp text and are passed through untouched apart from one rule: a
//! start token without a date takes the date of the end token.

use serde::Serialize;

use crate::error::PeriodError;

/// Start and end timestamps of a milestone, as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: String,
    pub end: String,
}

/// Split a raw period into start and end.
///
/// The separator is the first `-` after any leading `YYYY-MM-DD` date, so
/// both `14:00-2023-10-13T16:00` and `2023-10-13T14:00-2023-10-13T16:00`
/// split where expected. The end token is never given a date it lacks.
///
/// A start without a date only borrows one when the end actually carries a
/// `YYYY-MM-DD` date. Two bare times (`14:00-16:00`) are returned as typed
/// rather than gluing the end time onto the start.
pub fn parse_period(raw: &str) -> Result<Period, PeriodError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(PeriodError::Empty);
    }

    let from = time_offset(raw);
    let sep = raw[from..]
        .find('-')
        .map(|i| from + i)
        .ok_or_else(|| PeriodError::MissingSeparator(raw.to_string()))?;

    let start = raw[..sep].trim();
    let end = raw[sep + 1..].trim();
    if start.is_empty() {
        return Err(PeriodError::EmptySide {
            side: "start",
            raw: raw.to_string(),
        });
    }
    if end.is_empty() {
        return Err(PeriodError::EmptySide {
            side: "end",
            raw: raw.to_string(),
        });
    }
    if end[time_offset(end)..].contains('-') {
        return Err(PeriodError::Ambiguous(raw.to_string()));
    }

    let start = match date_prefix(end) {
        Some(date) if !start.contains('T') => format!("{date}T{start}"),
        _ => start.to_string(),
    };

    Ok(Period {
        start,
        end: end.to_string(),
    })
}

/// The `YYYY-MM-DD` part of a token like `2023-10-13T16:00`.
fn date_prefix(token: &str) -> Option<&str> {
    let (date, _) = token.split_once('T')?;
    let looks_like_date =
        !date.is_empty() && date.chars().all(|c| c.is_ascii_digit() || c == '-');
    looks_like_date.then_some(date)
}

/// Byte offset where the time part of `token` begins.
fn time_offset(token: &str) -> usize {
    date_prefix(token).map_or(0, |date| date.len() + 1)
}
