// ABOUTME: Pure time/label feature derivation applied to diff batches before merge
// ABOUTME: Timestamp format detection, weekday and month-year labels, time-of-day bucketing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! Feature derivation primitives
//!
//! Every function here is a pure function of its input timestamp, so the
//! dashboard columns they produce are reproducible from the mirror alone.
//! Timestamp parsing does explicit format detection at the ingestion
//! boundary instead of assuming a fixed string layout; records that match
//! no known format are dropped from the diff batch by the sync engine.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};

/// Bucket label for hours up to and including 06:00
pub const EARLY_MORNING: &str = "early morning";
/// Bucket label for 06:01 through 12:00
pub const MORNING: &str = "morning";
/// Bucket label for 12:01 through 17:00
pub const EARLY_AFTERNOON: &str = "early afternoon";
/// Bucket label for 17:01 through 21:00
pub const EVENING: &str = "evening";
/// Bucket label for everything after 21:00
pub const LATE_NIGHT: &str = "late night";

/// Parse a raw air-time value into an offset-aware instant
///
/// Detects, in order:
/// 1. integer Unix epoch seconds (listing endpoints),
/// 2. RFC 3339 (newer API surfaces),
/// 3. the workout-export layout `YYYY-MM-DD HH:MM[:SS]`, with any trailing
///    timezone annotation ignored (the export appends ` (UTC)` or a
///    `-HH:MM` style suffix after the minute field).
///
/// Returns `None` when no format matches.
#[must_use]
pub fn parse_workout_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Epoch seconds: all digits and long enough to not be a bare year
    if trimmed.len() >= 9 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(epoch) = trimmed.parse::<i64>() {
            return DateTime::from_timestamp(epoch, 0).map(|dt| dt.fixed_offset());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }

    // Export layout with seconds, then without; anything past the parsed
    // prefix is a timezone annotation the original data carries
    if let Some(prefix) = trimmed.get(..19) {
        if let Ok(naive) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%d %H:%M:%S") {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    if let Some(prefix) = trimmed.get(..16) {
        if let Ok(naive) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%d %H:%M") {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    None
}

/// Normalized display form of an air time: `YYYY-MM-DD HH:MM`
#[must_use]
pub fn normalized_datetime(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// English weekday name for an air time
#[must_use]
pub fn day_of_week(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%A").to_string()
}

/// Month-year label, full month name plus two-digit year (`September-21`)
#[must_use]
pub fn month_year(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%B-%y").to_string()
}

/// Discretize a military-time value into one of five buckets
///
/// Boundaries are inclusive on the upper side: 0600 is still early
/// morning, 1200 still morning, 1700 still early afternoon, 2100 still
/// evening.
#[must_use]
pub const fn time_of_day(hhmm: u32) -> &'static str {
    if hhmm <= 600 {
        EARLY_MORNING
    } else if hhmm <= 1200 {
        MORNING
    } else if hhmm <= 1700 {
        EARLY_AFTERNOON
    } else if hhmm <= 2100 {
        EVENING
    } else {
        LATE_NIGHT
    }
}

/// Time-of-day bucket for an air time
#[must_use]
pub fn time_of_day_for(dt: &DateTime<FixedOffset>) -> &'static str {
    time_of_day(dt.hour() * 100 + dt.minute())
}

/// Strip the leading `NN min ` prefix from an export title
///
/// `30 min HIIT Ride` becomes `HIIT Ride`; titles without the prefix are
/// returned unchanged.
#[must_use]
pub fn workout_title(title: &str) -> &str {
    title
        .splitn(3, ' ')
        .nth(2)
        .filter(|rest| !rest.is_empty())
        .unwrap_or(title)
}
