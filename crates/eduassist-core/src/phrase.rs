//! Phrase interpreter for the scheduling flow.
//!
//! Best-effort extraction of dates, times and durations from what the user
//! typed. Each function is pure and falls back to a fixed default:
//! today, 10:00:00, and 60 minutes.

use chrono::{Days, NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Time used when no `H:MM am/pm` or `H am/pm` phrase is found.
pub const DEFAULT_TIME: (u32, u32) = (10, 0);

/// Meeting length used when no duration phrase is found.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

static TIME_WITH_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(am|pm)").expect("valid time regex"));
static TIME_HOUR_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2})\s*(am|pm)").expect("valid time regex"));
static DURATION_HOURS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*hour").expect("valid duration regex"));
static DURATION_MINUTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*minute").expect("valid duration regex"));

/// Resolves a date phrase relative to `today` (the current local date).
///
/// Only `tomorrow` (+1 day) and `next week` (+7 days) are recognised;
/// anything else is today.
pub fn resolve_date(text: &str, today: NaiveDate) -> NaiveDate {
    let lower = text.to_lowercase();
    let offset = if lower.contains("tomorrow") {
        1
    } else if lower.contains("next week") {
        7
    } else {
        0
    };
    today.checked_add_days(Days::new(offset)).unwrap_or(today)
}

/// Parses `H:MM am/pm` or `H am/pm`, defaulting to 10:00:00.
pub fn parse_time(text: &str) -> NaiveTime {
    let default = default_time();

    if let Some(caps) = TIME_WITH_MINUTES.captures(text) {
        let hours = caps[1].parse::<u32>().ok();
        let minutes = caps[2].parse::<u32>().ok();
        return match (hours, minutes) {
            (Some(h), Some(m)) => to_time(h, m, &caps[3]).unwrap_or(default),
            _ => default,
        };
    }

    if let Some(caps) = TIME_HOUR_ONLY.captures(text) {
        return caps[1]
            .parse::<u32>()
            .ok()
            .and_then(|h| to_time(h, 0, &caps[2]))
            .unwrap_or(default);
    }

    default
}

/// Parses `<n> hour(s)` or `<n> minute(s)` into minutes, defaulting to 60.
///
/// Numbers too large to represent fall back to the default.
pub fn parse_duration(text: Option<&str>) -> i64 {
    let Some(text) = text else {
        return DEFAULT_DURATION_MINUTES;
    };

    if let Some(caps) = DURATION_HOURS.captures(text) {
        return caps[1]
            .parse::<i64>()
            .ok()
            .and_then(|hours| hours.checked_mul(60))
            .unwrap_or(DEFAULT_DURATION_MINUTES);
    }

    DURATION_MINUTES
        .captures(text)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .unwrap_or(DEFAULT_DURATION_MINUTES)
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(DEFAULT_TIME.0, DEFAULT_TIME.1, 0).unwrap_or(NaiveTime::MIN)
}

fn to_time(hours: u32, minutes: u32, period: &str) -> Option<NaiveTime> {
    let is_pm = period.eq_ignore_ascii_case("pm");
    let hours = match (is_pm, hours) {
        (true, h) if h < 12 => h + 12,
        (false, 12) => 0,
        (_, h) => h,
    };
    NaiveTime::from_hms_opt(hours, minutes, 0)
}
