//! Calendar timestamp parsing.
//!
//! The layout is selected by the length of the input once a single space
//! between date and time has been replaced by `T`:
//!
//! | length | layout                      | zone                 |
//! |--------|-----------------------------|----------------------|
//! | 10     | `2006-01-02`                | local, midnight      |
//! | 19     | `2006-01-02T15:04:05`       | local                |
//! | 20     | `2006-01-02T15:04:05Z`      | UTC                  |
//! | 24     | `2006-01-02T15:04:05-0700`  | explicit offset      |
//! | 25     | `2006-01-02T15:04:05-07:00` | explicit offset      |
//!
//! Local wall-clock times that fall into a daylight-saving gap are read with
//! the offset in force before the gap, which moves them forward by the gap.

use chrono::{
    DateTime, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone,
};

use crate::error::ParseValueError;

/// Parses a calendar timestamp in one of the supported layouts.
///
/// Offsets written in the input are preserved, so the result reports the
/// wall-clock time of its own zone.
///
/// # Examples
///
/// ```
/// use chrono::{Timelike, Utc};
/// use confbind::parse_datetime;
///
/// let stamp = parse_datetime("2020-02-17 07:06:21+0100").expect("valid timestamp");
/// assert_eq!(stamp.hour(), 7);
/// assert_eq!(stamp.with_timezone(&Utc).hour(), 6);
/// ```
///
/// # Errors
///
/// Returns a [`ParseValueError`] when the input length matches no layout or
/// the text does not fit the selected layout.
pub fn parse_datetime(raw: &str) -> Result<DateTime<FixedOffset>, ParseValueError> {
    let normalised = raw.replace(' ', "T");
    parse_layout(&normalised)
        .ok_or_else(|| ParseValueError::new("datetime", raw, "cannot parse datetime"))
}

/// Renders a timestamp in the 25-character layout, for example
/// `2020-02-17 07:06:21+01:00`.
///
/// The output is accepted by [`parse_datetime`]. Sub-second precision is
/// dropped.
#[must_use]
pub fn format_datetime(stamp: &DateTime<FixedOffset>) -> String {
    stamp.format("%Y-%m-%d %H:%M:%S%:z").to_string()
}

fn parse_layout(value: &str) -> Option<DateTime<FixedOffset>> {
    match value.len() {
        10 => {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
            in_local_zone(date.and_time(NaiveTime::MIN))
        }
        19 => in_local_zone(NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").ok()?),
        20 => NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%SZ")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset()),
        24 => DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z").ok(),
        25 => {
            // `+HH:MM` becomes `+HHMM`.
            if value.get(22..23)? != ":" {
                return None;
            }
            let compact = format!("{}{}", value.get(..22)?, value.get(23..)?);
            parse_layout(&compact)
        }
        _ => None,
    }
}

/// Resolves a wall-clock time in the local zone.
fn in_local_zone(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    resolve_in(&Local, naive)
}

/// Resolves a wall-clock time in `zone`.
///
/// Ambiguous times (a repeated hour) resolve to the earlier instant. Times
/// skipped by a transition take the offset in force a day earlier.
fn resolve_in<Tz: TimeZone>(zone: &Tz, naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(stamp) | LocalResult::Ambiguous(stamp, _) => Some(stamp.fixed_offset()),
        LocalResult::None => {
            let before = naive.checked_sub_signed(TimeDelta::days(1))?;
            let offset = zone.from_local_datetime(&before).earliest()?.offset().fix();
            let shifted = offset.from_local_datetime(&naive).single()?;
            Some(shifted.with_timezone(zone).fixed_offset())
        }
    }
}
