// ABOUTME: Main library entry point for the Peloton catalog mirror
// ABOUTME: Incremental catalog sync, instructor name resolution, feature derivation, and workout analytics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

#![deny(unsafe_code)]

//! # Peloton Mirror
//!
//! An embeddable library that maintains local CSV mirrors of the Peloton
//! public catalog (archived classes per category, the instructor roster, a
//! user's public workout history) and derives the columns a dashboard
//! consumer charts from.
//!
//! ## Features
//!
//! - **Incremental sync**: newest-first pagination that stops at the first
//!   already-mirrored identifier instead of re-downloading everything
//! - **Explicit instructor cache**: persisted, inspectable, with a typed
//!   fallback chain when a lookup fails
//! - **Feature derivation**: day-of-week, time-of-day bucket, month-year
//!   label, normalized timestamps
//! - **Workout analytics**: longest streak, hardest workout, totals
//!
//! ## Architecture
//!
//! - **Providers**: the remote catalog seam (`CatalogProvider` trait plus
//!   the reqwest-backed `PelotonProvider`)
//! - **Storage**: CSV persistence of mirror tables and the instructor cache
//! - **Sync**: the diff/merge engine
//! - **Features / Analysis**: pure derivation and summary functions
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use peloton_mirror::config::MirrorConfig;
//! use peloton_mirror::errors::MirrorResult;
//!
//! fn main() -> MirrorResult<()> {
//!     let config = MirrorConfig::from_env();
//!     println!("mirroring into {}", config.data_dir.display());
//!     Ok(())
//! }
//! ```

/// Summary analytics over workout tables (streaks, superlatives, totals)
pub mod analysis;

/// Environment-driven configuration
pub mod config;

/// Unified error handling for sync, resolution, and storage
pub mod errors;

/// Pure time/label feature derivation
pub mod features;

/// Logging configuration and structured logging setup
pub mod logging;

/// Shared domain models and the mirror row contract
pub mod models;

/// Remote catalog providers
pub mod providers;

/// Instructor name resolution with an explicit persisted cache
pub mod resolver;

/// CSV persistence for mirror tables and the instructor cache
pub mod storage;

/// The incremental catalog sync engine
pub mod sync;

/// Shared utility functions
pub mod utils;

pub use errors::{MirrorError, MirrorResult};
pub use providers::{CatalogProvider, PelotonProvider};
pub use resolver::{InstructorCache, NameResolver};
pub use storage::{MirrorBootstrap, MirrorStore};
pub use sync::{SyncEngine, SyncOptions, SyncReport};
