//! Date formatting for bookmark timestamps.
//!
//! Values follow ISO-8601 in either the extended (`2023-05-01T10:00:00Z`) or
//! basic (`20230501T100000Z`) form, including week dates (`2023-W18-1`).

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime, Weekday};
use regex::Regex;

static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?P<sep1>-?)(?P<month>\d{2})(?P<sep2>-?)(?P<day>\d{2})$")
        .expect("valid calendar date pattern")
});

static WEEK_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<year>\d{4})(?P<sep1>-?)W(?P<week>\d{2})(?:(?P<sep2>-?)(?P<day>\d))?$")
        .expect("valid week date pattern")
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<hour>\d{2})(?::?(?P<minute>\d{2})(?::?(?P<second>\d{2})(?:[.,]\d+)?)?)?(?:[Zz]|[+-](?P<off_hour>\d{2})(?::?(?P<off_minute>\d{2})(?::?(?P<off_second>\d{2})(?:[.,]\d+)?)?)?)?$",
    )
    .expect("valid time pattern")
});

/// Render an `added`/`modified` value for display.
///
/// ISO-8601 values are reduced to their calendar date. Anything else is
/// returned unchanged. Absent or empty values render nothing.
pub fn format_timestamp(value: Option<&str>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty())?;
    Some(match parse_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.to_string(),
    })
}

/// Calendar date of an ISO-8601 value, in the value's own offset.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let (date, time) = match value.find(['T', 't', ' ']) {
        Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
        None => (value, None),
    };

    let date = parse_calendar_date(date).or_else(|| parse_week_date(date))?;
    match time {
        Some(time) if !is_valid_time(time) => None,
        _ => Some(date),
    }
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let caps = CALENDAR_DATE.captures(value)?;
    if caps["sep1"] != caps["sep2"] {
        return None;
    }
    NaiveDate::from_ymd_opt(
        caps["year"].parse().ok()?,
        caps["month"].parse().ok()?,
        caps["day"].parse().ok()?,
    )
}

/// `YYYY-Www[-D]`; a missing weekday means Monday.
fn parse_week_date(value: &str) -> Option<NaiveDate> {
    let caps = WEEK_DATE.captures(value)?;
    let weekday = match caps.name("day") {
        Some(day) => {
            if caps["sep1"] != caps["sep2"] {
                return None;
            }
            iso_weekday(day.as_str().parse().ok()?)?
        }
        None => Weekday::Mon,
    };
    NaiveDate::from_isoywd_opt(caps["year"].parse().ok()?, caps["week"].parse().ok()?, weekday)
}

fn iso_weekday(day: u8) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Checks field ranges of a time with an optional UTC offset.
fn is_valid_time(value: &str) -> bool {
    let Some(caps) = TIME.captures(value) else {
        return false;
    };
    let field = |name: &str| -> u32 {
        caps.name(name)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    let time_ok = NaiveTime::from_hms_opt(field("hour"), field("minute"), field("second")).is_some();
    let offset_ok = field("off_hour") < 24 && field("off_minute") < 60 && field("off_second") < 60;
    time_ok && offset_ok
}
