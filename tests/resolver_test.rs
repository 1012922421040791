// ABOUTME: Tests for instructor name resolution and the explicit persisted cache
// ABOUTME: Walks the fallback chain: cache, remote fetch, detail discovery, title, type label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{instructor, record, MockProvider};
use peloton_mirror::models::WorkoutDetail;
use peloton_mirror::resolver::{InstructorCache, NameResolver};
use peloton_mirror::storage::{MirrorBootstrap, MirrorStore};

#[tokio::test]
async fn cache_hit_never_touches_the_remote() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![]).with_instructor(instructor("inst-1", "Alex Mason"));

    let mut cache = InstructorCache::new();
    cache.insert(instructor("inst-1", "Cached Name"));
    let mut resolver = NameResolver::new(&provider, &store, cache);

    let name = resolver.resolve(&record("w1", 1_650_000_100, Some("inst-1"))).await;

    assert_eq!(name, "Cached Name");
    assert_eq!(provider.instructor_calls(), 0);
}

#[tokio::test]
async fn cache_miss_fetches_once_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![]).with_instructor(instructor("inst-1", "Alex Mason"));

    let mut resolver = NameResolver::new(&provider, &store, InstructorCache::new());

    let first = resolver.resolve(&record("w1", 1_650_000_100, Some("inst-1"))).await;
    let second = resolver.resolve(&record("w2", 1_650_000_200, Some("inst-1"))).await;

    assert_eq!(first, "Alex Mason");
    assert_eq!(second, "Alex Mason");
    assert_eq!(provider.instructor_calls(), 1);

    // The cache file was written as part of the first resolution
    let persisted = store.load_instructors(MirrorBootstrap::Require).unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].name, "Alex Mason");
}

#[tokio::test]
async fn unknown_instructor_falls_back_to_title() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![]);

    let mut resolver = NameResolver::new(&provider, &store, InstructorCache::new());
    let name = resolver.resolve(&record("w1", 1_650_000_100, Some("ghost"))).await;

    assert_eq!(name, "30 min Ride w1");
}

#[tokio::test]
async fn missing_listing_instructor_is_discovered_via_workout_detail() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![])
        .with_instructor(instructor("inst-2", "Sam Reed"))
        .with_workout_detail(WorkoutDetail {
            id: "w1".to_owned(),
            name: Some("Morning Ride".to_owned()),
            workout_type: Some("class".to_owned()),
            instructor_id: Some("inst-2".to_owned()),
        });

    let mut resolver = NameResolver::new(&provider, &store, InstructorCache::new());
    let name = resolver.resolve(&record("w1", 1_650_000_100, None)).await;

    assert_eq!(name, "Sam Reed");
}

#[tokio::test]
async fn empty_title_falls_back_to_workout_type() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![]);

    let mut workout = record("w1", 1_650_000_100, None);
    workout.title = String::new();
    workout.workout_type = Some("freestyle".to_owned());

    let mut resolver = NameResolver::new(&provider, &store, InstructorCache::new());
    let name = resolver.resolve(&workout).await;

    assert_eq!(name, "freestyle");
}

#[tokio::test]
async fn no_usable_text_degrades_to_constant_label() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![]);

    let mut workout = record("w1", 1_650_000_100, None);
    workout.title = String::new();
    workout.workout_type = None;

    let mut resolver = NameResolver::new(&provider, &store, InstructorCache::new());
    let name = resolver.resolve(&workout).await;

    assert_eq!(name, "workout");
}

#[tokio::test]
async fn roster_refresh_adds_unseen_and_keeps_existing() {
    let dir = tempfile::tempdir().unwrap();
    let store = MirrorStore::new(dir.path());
    let provider = MockProvider::new(vec![])
        .with_instructor(instructor("inst-1", "Roster Name"))
        .with_instructor(instructor("inst-2", "Sam Reed"));

    let mut cache = InstructorCache::new();
    cache.insert(instructor("inst-1", "Original Name"));
    let mut resolver = NameResolver::new(&provider, &store, cache);

    let cached = resolver.refresh_roster().await.unwrap();

    assert_eq!(cached, 2);
    // Names are immutable once cached
    assert_eq!(resolver.cache().get("inst-1").unwrap().name, "Original Name");
    assert_eq!(resolver.cache().get("inst-2").unwrap().name, "Sam Reed");
}
