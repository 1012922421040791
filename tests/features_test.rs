// ABOUTME: Tests for feature derivation: bucket boundaries, labels, and timestamp detection
// ABOUTME: Validates the five-bucket partition's inclusive upper bounds from the contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use peloton_mirror::features::{
    day_of_week, month_year, normalized_datetime, parse_workout_timestamp, time_of_day,
    time_of_day_for, EARLY_AFTERNOON, EARLY_MORNING, EVENING, LATE_NIGHT, MORNING,
};

#[test]
fn bucket_boundaries_are_inclusive_on_the_upper_side() {
    assert_eq!(time_of_day(600), EARLY_MORNING);
    assert_eq!(time_of_day(601), MORNING);
    assert_eq!(time_of_day(1200), MORNING);
    assert_eq!(time_of_day(1201), EARLY_AFTERNOON);
    assert_eq!(time_of_day(1700), EARLY_AFTERNOON);
    assert_eq!(time_of_day(1701), EVENING);
    assert_eq!(time_of_day(2100), EVENING);
    assert_eq!(time_of_day(2101), LATE_NIGHT);
}

#[test]
fn bucket_extremes() {
    assert_eq!(time_of_day(0), EARLY_MORNING);
    assert_eq!(time_of_day(2359), LATE_NIGHT);
}

#[test]
fn buckets_partition_the_whole_day() {
    // Every minute of the day lands in exactly one of the five labels
    let labels = [EARLY_MORNING, MORNING, EARLY_AFTERNOON, EVENING, LATE_NIGHT];
    for hour in 0..24_u32 {
        for minute in 0..60_u32 {
            let bucket = time_of_day(hour * 100 + minute);
            assert!(labels.contains(&bucket));
        }
    }
}

#[test]
fn derived_labels_from_one_instant() {
    // 2021-09-25 06:00 UTC, a Saturday
    let dt = parse_workout_timestamp("2021-09-25 06:00").unwrap();
    assert_eq!(normalized_datetime(&dt), "2021-09-25 06:00");
    assert_eq!(day_of_week(&dt), "Saturday");
    assert_eq!(month_year(&dt), "September-21");
    assert_eq!(time_of_day_for(&dt), EARLY_MORNING);
}

#[test]
fn month_year_uses_two_digit_year() {
    let dt = parse_workout_timestamp("2022-01-03 10:30").unwrap();
    assert_eq!(month_year(&dt), "January-22");
}

#[test]
fn export_layout_trailing_annotation_is_ignored() {
    let with_tz = parse_workout_timestamp("2021-09-25 16:05 (GMT)").unwrap();
    let with_offset = parse_workout_timestamp("2021-09-25 16:05 -04:00").unwrap();
    assert_eq!(normalized_datetime(&with_tz), "2021-09-25 16:05");
    assert_eq!(normalized_datetime(&with_offset), "2021-09-25 16:05");
}

#[test]
fn epoch_and_rfc3339_forms_agree() {
    let from_epoch = parse_workout_timestamp("1632585900").unwrap();
    let from_rfc = parse_workout_timestamp("2021-09-25T16:05:00+00:00").unwrap();
    assert_eq!(from_epoch.timestamp(), from_rfc.timestamp());
}

#[test]
fn unparseable_values_yield_none() {
    assert!(parse_workout_timestamp("").is_none());
    assert!(parse_workout_timestamp("yesterday").is_none());
    assert!(parse_workout_timestamp("2021").is_none());
}
