//! Calendar bucketing for the month/week/day views.
//!
//! Events are opaque backend JSON. An event lands on the day named by its
//! explicit local date (`local_date` or `date`, `YYYY-MM-DD`); without one,
//! the date portion of its ISO start timestamp is used.

use chrono::{Datelike, Days, NaiveDate};
use serde_json::Value;
use std::collections::BTreeMap;

const LOCAL_DATE_FIELDS: &[&str] = &["local_date", "date"];
const TIMESTAMP_FIELDS: &[&str] = &["start_datetime", "start_time", "due_date"];

/// Events grouped by local day.
pub type CalendarBuckets = BTreeMap<NaiveDate, Vec<Value>>;

/// The day an event belongs to, if it can be determined.
pub fn event_date(event: &Value) -> Option<NaiveDate> {
    LOCAL_DATE_FIELDS
        .iter()
        .find_map(|field| event.get(*field)?.as_str().and_then(parse_local_date))
        .or_else(|| {
            TIMESTAMP_FIELDS
                .iter()
                .find_map(|field| event.get(*field)?.as_str().and_then(iso_date_portion))
        })
}

/// Groups events by day. Events without a usable date are dropped.
pub fn bucket_events(events: &[Value]) -> CalendarBuckets {
    let mut buckets = CalendarBuckets::new();
    for event in events {
        match event_date(event) {
            Some(date) => buckets.entry(date).or_default().push(event.clone()),
            None => tracing::debug!("[Calendar] Skipping event without a date: {}", event),
        }
    }
    buckets
}

/// One cell of a calendar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub events: Vec<Value>,
}

/// Every day of the given month with its events.
pub fn month_days(year: i32, month: u32, buckets: &CalendarBuckets) -> Vec<CalendarDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    first
        .iter_days()
        .take_while(|date| date.month() == month)
        .map(|date| day_cell(date, buckets))
        .collect()
}

/// The Sunday-to-Saturday week containing `date`.
pub fn week_days(date: NaiveDate, buckets: &CalendarBuckets) -> Vec<CalendarDay> {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    let Some(sunday) = date.checked_sub_days(Days::new(offset)) else {
        return Vec::new();
    };
    sunday
        .iter_days()
        .take(7)
        .map(|day| day_cell(day, buckets))
        .collect()
}

fn day_cell(date: NaiveDate, buckets: &CalendarBuckets) -> CalendarDay {
    CalendarDay {
        date,
        events: buckets.get(&date).cloned().unwrap_or_default(),
    }
}

fn parse_local_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn iso_date_portion(raw: &str) -> Option<NaiveDate> {
    raw.get(..10).and_then(parse_local_date)
}
