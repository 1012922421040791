// ABOUTME: Incremental catalog sync engine: newest-first page walk with stop-at-first-known-id
// ABOUTME: Merges enriched diff batches into CSV mirrors without ever removing a stored row
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Catalog Sync Engine
//!
//! One sync pass loads the local mirror, walks the remote listing newest
//! first, and stops all iteration the moment it sees an identifier the
//! mirror already holds: everything past that point is assumed mirrored.
//! Only the unseen prefix (the diff batch) is enriched and merged.
//!
//! The merge is one-way and append-only with respect to identifiers: a
//! row already in the mirror is never removed or replaced, new rows are
//! added, and the result is re-sorted descending by air time.
//!
//! A page that fails to fetch or decode contributes nothing and the walk
//! continues with the next page; scanning the full page budget without
//! finding a known identifier just means everything seen was new.
//!
//! Known limitation: the short-circuit assumes the remote listing is
//! strictly newest-first and never reordered. If the upstream catalog
//! reorders or backfills older entries, those entries are silently
//! missed.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::errors::MirrorResult;
use crate::features;
use crate::models::{ClassPage, EnrichedWorkout, WorkoutRecord};
use crate::providers::CatalogProvider;
use crate::resolver::NameResolver;
use crate::storage::{MirrorBootstrap, MirrorStore};

/// Options controlling a sync pass
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Maximum listing pages scanned per pass (None scans every page)
    pub max_pages: Option<usize>,
    /// Policy for a mirror file that does not exist yet
    pub bootstrap: MirrorBootstrap,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            bootstrap: MirrorBootstrap::EmptyIfMissing,
        }
    }
}

/// Outcome summary of one sync pass over one listing
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// Listing that was synced (category slug or user id)
    pub listing: String,
    /// Pages actually fetched
    pub pages_scanned: usize,
    /// New records merged into the mirror
    pub new_records: usize,
    /// Diff records dropped for unparseable air times
    pub dropped_records: usize,
    /// Whether the walk stopped at an already-mirrored identifier
    pub stopped_at_known: bool,
    /// Mirror row count after the merge
    pub mirror_rows: usize,
}

/// Which remote listing a pass walks
enum Listing<'a> {
    Category(&'a str),
    User(&'a str),
}

impl Listing<'_> {
    fn label(&self) -> &str {
        match self {
            Listing::Category(slug) => slug,
            Listing::User(user_id) => user_id,
        }
    }
}

/// The incremental sync engine
///
/// Holds a provider and a store by reference; one engine can run many
/// passes. Repeated passes against an unchanged remote are idempotent
/// (empty diff, byte-identical rewrite). Two concurrent passes over the
/// same mirror file are unsafe; the usage model is a single scheduled or
/// manual invocation.
pub struct SyncEngine<'a, P: CatalogProvider> {
    provider: &'a P,
    store: &'a MirrorStore,
    options: SyncOptions,
}

impl<'a, P: CatalogProvider> SyncEngine<'a, P> {
    /// Create an engine over a provider and store
    #[must_use]
    pub fn new(provider: &'a P, store: &'a MirrorStore, options: SyncOptions) -> Self {
        Self {
            provider,
            store,
            options,
        }
    }

    /// Sync one browse category's archived-class mirror
    ///
    /// # Errors
    ///
    /// Only the mirror-file error classes propagate; fetch failures
    /// degrade to skipped pages.
    pub async fn sync_category(
        &self,
        slug: &str,
        resolver: &mut NameResolver<'_, P>,
    ) -> MirrorResult<SyncReport> {
        self.sync_listing(Listing::Category(slug), resolver).await
    }

    /// Sync every browse category the platform lists
    ///
    /// # Errors
    ///
    /// Propagates the category discovery failure and mirror-file errors.
    pub async fn sync_all_categories(
        &self,
        resolver: &mut NameResolver<'_, P>,
    ) -> MirrorResult<Vec<SyncReport>> {
        let categories = self.provider.list_categories().await?;
        info!(count = categories.len(), "discovered browse categories");
        let mut reports = Vec::with_capacity(categories.len());
        for category in &categories {
            reports.push(self.sync_category(&category.slug, resolver).await?);
        }
        Ok(reports)
    }

    /// Sync one user's public workout history mirror
    ///
    /// # Errors
    ///
    /// Same classes as [`Self::sync_category`].
    pub async fn sync_user_workouts(
        &self,
        user_id: &str,
        resolver: &mut NameResolver<'_, P>,
    ) -> MirrorResult<SyncReport> {
        self.sync_listing(Listing::User(user_id), resolver).await
    }

    async fn sync_listing(
        &self,
        listing: Listing<'_>,
        resolver: &mut NameResolver<'_, P>,
    ) -> MirrorResult<SyncReport> {
        let path = match &listing {
            Listing::Category(slug) => self.store.category_mirror_path(slug),
            Listing::User(user_id) => self.store.user_mirror_path(user_id),
        };
        let label = listing.label().to_owned();

        let mirror = self.store.load_workouts(&path, self.options.bootstrap)?;
        let known: HashSet<String> = mirror.iter().map(|row| row.id.clone()).collect();

        let (diff, pages_scanned, stopped_at_known) = self.collect_diff(&listing, &known).await?;

        let (enriched, dropped_records) = enrich_batch(diff, resolver).await;
        let new_records = enriched.len();

        let mut merged = mirror;
        if enriched.is_empty() {
            info!(listing = %label, "no new records, mirror unchanged");
        } else {
            merged.extend(enriched);
            let mut seen = HashSet::new();
            merged.retain(|row| seen.insert(row.id.clone()));
            merged.sort_by(|a, b| b.air_time_epoch.cmp(&a.air_time_epoch));
            info!(
                listing = %label,
                new_records,
                total = merged.len(),
                "merged diff batch into mirror"
            );
        }

        self.store.save_workouts(&path, &merged)?;

        Ok(SyncReport {
            listing: label,
            pages_scanned,
            new_records,
            dropped_records,
            stopped_at_known,
            mirror_rows: merged.len(),
        })
    }

    /// Walk the listing newest-first and return the unseen prefix
    async fn collect_diff(
        &self,
        listing: &Listing<'_>,
        known: &HashSet<String>,
    ) -> MirrorResult<(Vec<WorkoutRecord>, usize, bool)> {
        let mut diff = Vec::new();
        let mut pages_scanned = 0;
        let mut stopped_at_known = false;

        // Page 0 also carries the listing's total page count; the listing
        // reports the highest page index, hence the +1
        let mut first = self.fetch_page(listing, 0).await?;
        let total_pages = first.as_ref().map_or(1, |page| page.page_count + 1);
        let budget = self
            .options
            .max_pages
            .map_or(total_pages, |max| max.min(total_pages));

        'pages: for page_num in 0..budget {
            let page = if page_num == 0 {
                first.take()
            } else {
                self.fetch_page(listing, page_num).await?
            };
            let Some(page) = page else {
                continue;
            };
            pages_scanned += 1;

            for record in page.records {
                if known.contains(&record.id) {
                    // Newest-first listing: everything from here on is
                    // already mirrored
                    stopped_at_known = true;
                    break 'pages;
                }
                diff.push(record);
            }
        }

        Ok((diff, pages_scanned, stopped_at_known))
    }

    /// Fetch one page, degrading recoverable failures to "no page"
    async fn fetch_page(
        &self,
        listing: &Listing<'_>,
        page: usize,
    ) -> MirrorResult<Option<ClassPage>> {
        let result = match listing {
            Listing::Category(slug) => self.provider.class_page(slug, page).await,
            Listing::User(user_id) => self.provider.user_workout_page(user_id, page).await,
        };
        match result {
            Ok(page) => Ok(Some(page)),
            Err(e) if e.is_recoverable() => {
                warn!(listing = %listing.label(), page, error = %e, "page skipped");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

}

/// Enrich a diff batch, dropping records whose air time does not parse
async fn enrich_batch<P: CatalogProvider>(
    diff: Vec<WorkoutRecord>,
    resolver: &mut NameResolver<'_, P>,
) -> (Vec<EnrichedWorkout>, usize) {
    let mut enriched = Vec::with_capacity(diff.len());
    let mut dropped = 0;
    for record in diff {
        match features::parse_workout_timestamp(&record.original_air_time) {
            Some(air_time) => {
                let instructor_name = resolver.resolve(&record).await;
                enriched.push(EnrichedWorkout::from_record(
                    record,
                    &air_time,
                    instructor_name,
                ));
            }
            None => {
                dropped += 1;
                warn!(
                    id = %record.id,
                    raw = %record.original_air_time,
                    "unparseable air time, dropping record from diff batch"
                );
            }
        }
    }
    (enriched, dropped)
}
