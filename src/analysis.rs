// ABOUTME: Summary analytics over workout tables: streaks, superlatives, totals
// ABOUTME: Operates on string tables so the dashboard's own export columns work unchanged
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Workout Analytics
//!
//! These functions consume tables as rows of header-keyed strings (the
//! shape [`crate::storage::load_string_table`] produces), because the
//! dashboard charts both this library's mirrors and the platform's own
//! workout export, whose column set we do not control. Numeric coercion
//! is therefore explicit and failure-tolerant here rather than assumed at
//! parse time.

use std::collections::HashMap;

use chrono::NaiveDate;

/// Small positive stand-in for unparseable numeric values
///
/// Not zero: the superlative ratio divides by the duration field.
pub const IMPUTED_EPSILON: f64 = 0.0001;

/// Row shape shared by the analytics functions
pub type Row = HashMap<String, String>;

/// Longest run of exactly consecutive calendar days
///
/// `dates` must be ascending (not necessarily deduplicated). Returns the
/// count of dates in the longest maximal run where each date is exactly
/// one day after the previous; duplicates break a run. The first maximal
/// run wins ties, which is unobservable in the returned length.
#[must_use]
pub fn longest_streak(dates: &[NaiveDate]) -> usize {
    if dates.is_empty() {
        return 0;
    }
    let mut best = 1;
    let mut run = 1;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() == 1 {
            run += 1;
            if run > best {
                best = run;
            }
        } else {
            run = 1;
        }
    }
    best
}

/// Longest streak over a table column of normalized datetimes
///
/// Reads the `YYYY-MM-DD` prefix of each value, sorts ascending, and
/// delegates to [`longest_streak`]. Unparseable values are ignored.
#[must_use]
pub fn longest_streak_in(rows: &[Row], datetime_field: &str) -> usize {
    let mut dates: Vec<NaiveDate> = rows
        .iter()
        .filter_map(|row| row.get(datetime_field))
        .filter_map(|value| date_prefix(value))
        .collect();
    dates.sort_unstable();
    longest_streak(&dates)
}

/// Superlative selection: the target field of the record maximizing
/// output per unit duration
///
/// Both numeric fields are coerced with [`IMPUTED_EPSILON`] substituted
/// for unparseable values; the first record wins ratio ties. Returns
/// `None` only for an empty table or a missing target field on the
/// winning row.
#[must_use]
pub fn hardest_workout(
    rows: &[Row],
    output_field: &str,
    duration_field: &str,
    target_field: &str,
) -> Option<String> {
    let mut best_idx: Option<usize> = None;
    let mut best_ratio = f64::NEG_INFINITY;
    for (idx, row) in rows.iter().enumerate() {
        let output = coerce_numeric(row.get(output_field));
        let duration = coerce_numeric(row.get(duration_field));
        let ratio = output / duration;
        if best_idx.is_none() || ratio > best_ratio {
            best_ratio = ratio;
            best_idx = Some(idx);
        }
    }
    best_idx.and_then(|idx| rows[idx].get(target_field).cloned())
}

/// Total workout time in hours, rounded to two decimals
///
/// The export's duration column is minutes; missing or unparseable cells
/// (including the reserved `None` token) count as zero.
#[must_use]
pub fn total_workout_hours(rows: &[Row], minutes_field: &str) -> f64 {
    let minutes: i64 = rows
        .iter()
        .map(|row| {
            row.get(minutes_field)
                .and_then(|value| value.trim().parse::<i64>().ok())
                .unwrap_or(0)
        })
        .sum();
    ((minutes as f64 / 60.0) * 100.0).round() / 100.0
}

/// Total of a loosely-typed numeric column; unparseable cells count as zero
#[must_use]
pub fn column_total(rows: &[Row], field: &str) -> f64 {
    rows.iter()
        .map(|row| {
            row.get(field)
                .and_then(|value| value.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite())
                .unwrap_or(0.0)
        })
        .sum()
}

/// Most frequent non-empty value of a column, ties broken by first
/// appearance order
///
/// Used for the "favorite instructor" dashboard metric.
#[must_use]
pub fn most_frequent(rows: &[Row], field: &str) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for row in rows {
        let Some(value) = row.get(field) else {
            continue;
        };
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in first_seen {
        let count = counts.get(value).copied().unwrap_or(0);
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_owned())
}

fn coerce_numeric(value: Option<&String>) -> f64 {
    value
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(IMPUTED_EPSILON)
}

fn date_prefix(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn streak_with_gap() {
        let dates = [
            date(2022, 1, 1),
            date(2022, 1, 2),
            date(2022, 1, 3),
            date(2022, 1, 5),
        ];
        assert_eq!(longest_streak(&dates), 3);
    }

    #[test]
    fn streak_empty_and_single() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[date(2022, 1, 1)]), 1);
    }

    #[test]
    fn duplicate_day_breaks_run() {
        let dates = [
            date(2022, 1, 1),
            date(2022, 1, 2),
            date(2022, 1, 2),
            date(2022, 1, 3),
        ];
        assert_eq!(longest_streak(&dates), 2);
    }
}
