// ABOUTME: Tests for CSV mirror persistence: bootstrap policy, corruption, token round-trip
// ABOUTME: Missing files are policy; files that exist but do not decode always surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::record;
use peloton_mirror::errors::MirrorError;
use peloton_mirror::features::parse_workout_timestamp;
use peloton_mirror::models::EnrichedWorkout;
use peloton_mirror::storage::{load_string_table, MirrorBootstrap, MirrorStore};

fn enriched(id: &str, epoch: i64) -> EnrichedWorkout {
    let air_time = parse_workout_timestamp(&epoch.to_string()).unwrap();
    EnrichedWorkout::from_record(record(id, epoch, None), &air_time, "Alex Mason".to_owned())
}

#[test]
fn missing_file_bootstraps_empty_by_policy() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");

    let rows = store
        .load_workouts(&path, MirrorBootstrap::EmptyIfMissing)
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn missing_file_is_an_error_when_required() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");

    let err = store
        .load_workouts(&path, MirrorBootstrap::Require)
        .unwrap_err();
    assert!(matches!(err, MirrorError::MirrorMissing { .. }));
}

#[test]
fn corrupt_file_surfaces_regardless_of_policy() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");
    std::fs::write(&path, "id,title\nonly-two-columns,x\n").unwrap();

    let err = store
        .load_workouts(&path, MirrorBootstrap::EmptyIfMissing)
        .unwrap_err();
    assert!(matches!(err, MirrorError::MirrorCorrupt { .. }));
}

#[test]
fn save_then_load_round_trips_rows() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");

    let rows = vec![enriched("b", 1_650_000_200), enriched("a", 1_650_000_100)];
    store.save_workouts(&path, &rows).unwrap();
    let loaded = store.load_workouts(&path, MirrorBootstrap::Require).unwrap();

    assert_eq!(loaded, rows);
}

#[test]
fn none_token_round_trips_as_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");

    let mut row = enriched("a", 1_650_000_100);
    row.calories = None;
    row.total_output = Some("312".to_owned());
    store.save_workouts(&path, &[row]).unwrap();

    // The reserved token is literally in the file...
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("None"));

    // ...and comes back as an absent value
    let loaded = store.load_workouts(&path, MirrorBootstrap::Require).unwrap();
    assert_eq!(loaded[0].calories, None);
    assert_eq!(loaded[0].total_output.as_deref(), Some("312"));
}

#[test]
fn rewrite_replaces_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let path = store.category_mirror_path("cycling");

    store.save_workouts(&path, &[enriched("a", 1_650_000_100)]).unwrap();
    store
        .save_workouts(
            &path,
            &[enriched("b", 1_650_000_200), enriched("a", 1_650_000_100)],
        )
        .unwrap();

    let loaded = store.load_workouts(&path, MirrorBootstrap::Require).unwrap();
    assert_eq!(loaded.len(), 2);
    // No temp file left behind after the rename
    assert!(!path.with_extension("csv.tmp").exists());
}

#[test]
fn string_table_reader_keys_rows_by_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");
    std::fs::write(
        &path,
        "Workout Timestamp,Calories Burned,Instructor Name\n2021-09-25 06:00 (GMT),400,Alex Mason\n",
    )
    .unwrap();

    let rows = load_string_table(&path).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].get("Calories Burned").map(String::as_str),
        Some("400")
    );
    assert_eq!(
        rows[0].get("Instructor Name").map(String::as_str),
        Some("Alex Mason")
    );
}

#[test]
fn instructor_cache_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());

    let roster = vec![
        common::instructor("inst-1", "Alex Mason"),
        common::instructor("inst-2", "Sam Reed"),
    ];
    store.save_instructors(&roster).unwrap();
    let loaded = store.load_instructors(MirrorBootstrap::Require).unwrap();

    assert_eq!(loaded, roster);
}
