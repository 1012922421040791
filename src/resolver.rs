// ABOUTME: Instructor name resolution backed by an explicit persisted cache
// ABOUTME: Cache miss falls back through remote lookup, workout title, then workout-type label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Instructor Name Resolver
//!
//! The cache is an explicit, inspectable object owned by the caller, not a
//! memoization side effect: lookups, inserts, and invalidation are visible
//! API calls, and the fallback policy is an explicit decision tree rather
//! than whichever exception happens to propagate.
//!
//! Resolution never fails a batch. Every level degrades to the best
//! available label: cached name, remotely fetched name, the workout's own
//! title, the workout-type label, and finally a constant.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::errors::MirrorResult;
use crate::models::{InstructorRecord, WorkoutDetail, WorkoutRecord};
use crate::providers::CatalogProvider;
use crate::storage::{MirrorBootstrap, MirrorStore};

/// Label of last resort when a workout has no usable text at all
const FALLBACK_LABEL: &str = "workout";

/// Persisted map from instructor identifier to roster record
///
/// Grows monotonically; entries are never evicted and a name is immutable
/// once cached. The only invalidation is the explicit [`Self::clear`].
#[derive(Debug, Default, Clone)]
pub struct InstructorCache {
    entries: BTreeMap<String, InstructorRecord>,
}

impl InstructorCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from previously persisted records
    #[must_use]
    pub fn from_records(records: Vec<InstructorRecord>) -> Self {
        let mut cache = Self::new();
        for record in records {
            cache.insert(record);
        }
        cache
    }

    /// Load the cache from a store's instructor table
    ///
    /// # Errors
    ///
    /// Propagates the storage error classes; `EmptyIfMissing` makes a
    /// first run start from an empty cache.
    pub fn load(store: &MirrorStore, bootstrap: MirrorBootstrap) -> MirrorResult<Self> {
        Ok(Self::from_records(store.load_instructors(bootstrap)?))
    }

    /// Look up an instructor by identifier
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&InstructorRecord> {
        self.entries.get(id)
    }

    /// Insert a record; an already-cached identifier keeps its first record
    pub fn insert(&mut self, record: InstructorRecord) {
        self.entries.entry(record.id.clone()).or_insert(record);
    }

    /// Merge a fetched roster into the cache, keeping existing entries
    pub fn absorb_roster(&mut self, roster: Vec<InstructorRecord>) {
        for record in roster {
            self.insert(record);
        }
    }

    /// Drop every entry (explicit full invalidation)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached instructors
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached records, ordered by identifier for stable persistence
    #[must_use]
    pub fn records(&self) -> Vec<InstructorRecord> {
        self.entries.values().cloned().collect()
    }

    /// Persist the cache to a store's instructor table
    ///
    /// # Errors
    ///
    /// `MirrorIo` when the rewrite fails.
    pub fn persist(&self, store: &MirrorStore) -> MirrorResult<()> {
        store.save_instructors(&self.records())
    }
}

/// Resolves instructor display names for workout records
///
/// Owns the cache for the duration of a sync pass and appends newly
/// fetched instructors to it, persisting after each append so a later
/// crash loses no lookups.
pub struct NameResolver<'a, P: CatalogProvider> {
    provider: &'a P,
    store: &'a MirrorStore,
    cache: InstructorCache,
}

impl<'a, P: CatalogProvider> NameResolver<'a, P> {
    /// Create a resolver over a provider and a loaded cache
    #[must_use]
    pub fn new(provider: &'a P, store: &'a MirrorStore, cache: InstructorCache) -> Self {
        Self {
            provider,
            store,
            cache,
        }
    }

    /// Inspect the cache
    #[must_use]
    pub fn cache(&self) -> &InstructorCache {
        &self.cache
    }

    /// Take the cache back from the resolver
    #[must_use]
    pub fn into_cache(self) -> InstructorCache {
        self.cache
    }

    /// Refresh the cache from the full instructor roster
    ///
    /// Existing entries keep their records (names are immutable once
    /// cached); only unseen instructors are added. Returns the number of
    /// cached instructors after the merge.
    ///
    /// # Errors
    ///
    /// Propagates the roster fetch failure and `MirrorIo` from the
    /// persist.
    pub async fn refresh_roster(&mut self) -> MirrorResult<usize> {
        let roster = self.provider.list_instructors().await?;
        debug!(fetched = roster.len(), "instructor roster fetched");
        self.cache.absorb_roster(roster);
        self.cache.persist(self.store)?;
        Ok(self.cache.len())
    }

    /// Resolve the display name for one workout record
    ///
    /// Decision tree, each step non-fatal:
    /// 1. instructor id from the record, or discovered through the workout
    ///    detail view when the listing carried none;
    /// 2. cache hit on that id;
    /// 3. remote instructor fetch (found: cached, persisted, returned);
    /// 4. the workout's own title;
    /// 5. the workout-type label;
    /// 6. a constant label.
    pub async fn resolve(&mut self, workout: &WorkoutRecord) -> String {
        let mut detail: Option<WorkoutDetail> = None;

        let instructor_id = if workout.instructor_id.is_some() {
            workout.instructor_id.clone()
        } else {
            detail = self.lookup_detail(&workout.id).await;
            detail.as_ref().and_then(|d| d.instructor_id.clone())
        };

        if let Some(id) = instructor_id {
            if let Some(cached) = self.cache.get(&id) {
                return cached.name.clone();
            }
            if let Some(name) = self.fetch_and_cache(&id).await {
                return name;
            }
        }

        // No instructor found anywhere: title, then type label
        let title = non_empty(&workout.title)
            .map(ToOwned::to_owned)
            .or_else(|| {
                detail
                    .as_ref()
                    .and_then(|d| d.name.as_deref().and_then(non_empty).map(ToOwned::to_owned))
            });
        if let Some(title) = title {
            return title;
        }

        workout
            .workout_type
            .as_deref()
            .and_then(non_empty)
            .map(ToOwned::to_owned)
            .or_else(|| {
                detail.and_then(|d| {
                    d.workout_type
                        .as_deref()
                        .and_then(non_empty)
                        .map(ToOwned::to_owned)
                })
            })
            .unwrap_or_else(|| FALLBACK_LABEL.to_owned())
    }

    async fn lookup_detail(&self, workout_id: &str) -> Option<WorkoutDetail> {
        match self.provider.get_workout(workout_id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(workout_id, error = %e, "workout detail lookup failed, falling back");
                None
            }
        }
    }

    async fn fetch_and_cache(&mut self, instructor_id: &str) -> Option<String> {
        match self.provider.get_instructor(instructor_id).await {
            Ok(Some(record)) => {
                let name = record.name.clone();
                self.cache.insert(record);
                if let Err(e) = self.cache.persist(self.store) {
                    warn!(error = %e, "instructor cache persist failed, continuing in memory");
                }
                debug!(instructor_id, name = %name, "instructor cached");
                Some(name)
            }
            Ok(None) => {
                debug!(instructor_id, "instructor unknown to platform");
                None
            }
            Err(e) => {
                warn!(instructor_id, error = %e, "instructor lookup failed, falling back");
                None
            }
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
