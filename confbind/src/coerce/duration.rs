//! Duration parsing for an ISO 8601-like grammar.
//!
//! Input is read as a stream of tokens, each either a run of ASCII digits or
//! a single non-whitespace character; whitespace only separates tokens.
//! Numbers must be followed by a designator. `P` switches to period
//! designators and `T` back to time designators:
//!
//! | mode   | designators                                     |
//! |--------|-------------------------------------------------|
//! | period | `Y` 365 days, `M` 30 days, `W` 7 days, `D` 1 day |
//! | time   | `H`, `M` minutes, `S`, plus `Y` and `D`          |
//!
//! Parsing starts in time mode. Designators are case-insensitive and repeated
//! designators add up. [`format_duration`] writes the inverse form using
//! days, hours, minutes and seconds only.

use std::time::Duration;

use crate::error::ParseValueError;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;
const MONTH: u64 = 30 * DAY;
const YEAR: u64 = 365 * DAY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Period,
    Time,
}

impl Mode {
    const fn name(self) -> &'static str {
        match self {
            Self::Period => "period",
            Self::Time => "time",
        }
    }

    /// Seconds per unit of `designator`.
    fn unit(self, designator: &str) -> Option<u64> {
        match (self, designator.to_ascii_uppercase().as_str()) {
            (_, "Y") => Some(YEAR),
            (_, "D") => Some(DAY),
            (Self::Period, "M") => Some(MONTH),
            (Self::Period, "W") => Some(WEEK),
            (Self::Time, "H") => Some(HOUR),
            (Self::Time, "M") => Some(MINUTE),
            (Self::Time, "S") => Some(1),
            _ => None,
        }
    }
}

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.rest = self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        let first = self.rest.chars().next()?;
        let end = if first.is_ascii_digit() {
            self.rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(self.rest.len())
        } else {
            first.len_utf8()
        };
        let (token, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(token)
    }
}

/// Parses a duration such as `1h34m17s` or `P1Y2M3DT4H5M6S`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use confbind::parse_duration;
///
/// assert_eq!(parse_duration("1h34m17s").ok(), Some(Duration::from_secs(5657)));
/// assert!(parse_duration("5").is_err());
/// ```
///
/// # Errors
///
/// Returns a [`ParseValueError`] when a number lacks a designator, a
/// designator is unknown in the current mode, a token is neither a number
/// nor a mode switch where a number is expected, or the total overflows.
pub fn parse_duration(raw: &str) -> Result<Duration, ParseValueError> {
    let fail = |reason: String| ParseValueError::new("duration", raw, reason);
    let mut mode = Mode::Time;
    let mut pending: Option<u64> = None;
    let mut total: u64 = 0;

    for token in (Tokens { rest: raw }) {
        if let Some(count) = pending.take() {
            let unit = mode
                .unit(token)
                .ok_or_else(|| fail(format!("unknown {} designator {token:?}", mode.name())))?;
            total = count
                .checked_mul(unit)
                .and_then(|seconds| total.checked_add(seconds))
                .ok_or_else(|| fail("duration is too large".to_owned()))?;
            continue;
        }
        if token.eq_ignore_ascii_case("P") {
            mode = Mode::Period;
        } else if token.eq_ignore_ascii_case("T") {
            mode = Mode::Time;
        } else {
            let count = token
                .parse::<u64>()
                .map_err(|_| fail(format!("cannot parse numeric value from {token:?}")))?;
            pending = Some(count);
        }
    }

    if pending.is_some() {
        return Err(fail("missing designator".to_owned()));
    }
    Ok(Duration::from_secs(total))
}

/// Renders whole seconds as `2d 4h 5m 6s`, omitting zero components.
///
/// The output is accepted by [`parse_duration`]. Sub-second precision is
/// dropped, and a zero duration renders as `0s`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use confbind::{format_duration, parse_duration};
///
/// let elapsed = Duration::from_secs(90_061);
/// assert_eq!(format_duration(elapsed), "1d 1h 1m 1s");
/// assert_eq!(parse_duration(&format_duration(elapsed)).ok(), Some(elapsed));
/// ```
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    let mut rest = elapsed.as_secs();
    let mut parts = Vec::new();
    for (unit, designator) in [(DAY, 'd'), (HOUR, 'h'), (MINUTE, 'm'), (1, 's')] {
        let count = rest.div_euclid(unit);
        rest = rest.rem_euclid(unit);
        if count > 0 {
            parts.push(format!("{count}{designator}"));
        }
    }
    if parts.is_empty() {
        "0s".to_owned()
    } else {
        parts.join(" ")
    }
}
