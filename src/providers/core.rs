// ABOUTME: Core catalog provider trait for unified remote catalog access
// ABOUTME: Defines the remote-fetch seam the sync engine and resolver depend on
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Catalog Provider Seam
//!
//! The sync engine and name resolver never talk to the network directly;
//! they depend on this trait. The production implementation is
//! [`crate::providers::PelotonProvider`]; tests substitute an in-memory
//! provider.
//!
//! Single-entity lookups return `Ok(None)` for an identifier the platform
//! does not know, so "absent" is a typed outcome rather than an error the
//! caller has to pattern-match out of a transport failure.

use async_trait::async_trait;

use crate::errors::MirrorResult;
use crate::models::{
    CategoryRecord, ClassPage, DeviceTypeMapping, InstructorRecord, WorkoutDetail,
};

/// Remote catalog access used by the sync engine and resolver
///
/// All fetches are sequential and blocking from the caller's point of
/// view; implementations must not fan out page requests.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// List the browse categories of the archived-class catalog
    async fn list_categories(&self) -> MirrorResult<Vec<CategoryRecord>>;

    /// Fetch one page of a category's archived classes, newest first
    ///
    /// The returned page carries the listing's total page count so the
    /// caller can bound its walk.
    async fn class_page(&self, slug: &str, page: usize) -> MirrorResult<ClassPage>;

    /// Fetch one page of a user's public workout history, newest first
    async fn user_workout_page(&self, user_id: &str, page: usize) -> MirrorResult<ClassPage>;

    /// Fetch a single workout's detail view; `Ok(None)` when unknown
    async fn get_workout(&self, id: &str) -> MirrorResult<Option<WorkoutDetail>>;

    /// Fetch a single instructor; `Ok(None)` when unknown
    async fn get_instructor(&self, id: &str) -> MirrorResult<Option<InstructorRecord>>;

    /// Fetch the instructor roster
    async fn list_instructors(&self) -> MirrorResult<Vec<InstructorRecord>>;

    /// Fetch device-type display-name mappings from ride metadata
    async fn device_type_mappings(&self) -> MirrorResult<Vec<DeviceTypeMapping>>;
}
