// ABOUTME: CSV persistence for mirror tables and the instructor cache
// ABOUTME: Distinguishes missing from corrupt base files; rewrites go through a temp file + rename
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Mirror Storage
//!
//! Flat tabular files with CSV semantics: a header row of column names,
//! one record per row, and the reserved `None` token for missing loose
//! metrics. The sync engine reads a mirror once at the start of a pass and
//! writes it once at the end; there is no advisory locking, so two
//! concurrent invocations against the same files are unsafe (single-process
//! usage model).
//!
//! A missing base file is a policy decision ([`MirrorBootstrap`]); a file
//! that exists but does not decode always surfaces as `MirrorCorrupt`.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::{MirrorError, MirrorResult};
use crate::models::{EnrichedWorkout, InstructorRecord};

/// Policy for a mirror file that does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorBootstrap {
    /// Treat a missing file as an empty baseline (first run)
    EmptyIfMissing,
    /// Fail: the caller expects the file to exist
    Require,
}

/// Paths and persistence for one data directory of mirror tables
#[derive(Debug, Clone)]
pub struct MirrorStore {
    data_dir: PathBuf,
}

impl MirrorStore {
    /// Create a store rooted at `data_dir` (created lazily on first write)
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The store's root directory
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Mirror file for one browse category
    #[must_use]
    pub fn category_mirror_path(&self, slug: &str) -> PathBuf {
        self.data_dir.join(format!("{slug}.csv"))
    }

    /// Mirror file for one user's workout history
    #[must_use]
    pub fn user_mirror_path(&self, user_id: &str) -> PathBuf {
        self.data_dir.join(format!("user_{user_id}.csv"))
    }

    /// The instructor cache file
    #[must_use]
    pub fn instructor_cache_path(&self) -> PathBuf {
        self.data_dir.join("instructors.csv")
    }

    /// Load a workout mirror table
    ///
    /// # Errors
    ///
    /// `MirrorMissing` under the `Require` policy, `MirrorIo` for
    /// unreadable files, `MirrorCorrupt` for undecodable content.
    pub fn load_workouts(
        &self,
        path: &Path,
        bootstrap: MirrorBootstrap,
    ) -> MirrorResult<Vec<EnrichedWorkout>> {
        load_rows(path, bootstrap)
    }

    /// Persist a workout mirror table, replacing the previous version
    ///
    /// # Errors
    ///
    /// `MirrorIo` when the rewrite fails.
    pub fn save_workouts(&self, path: &Path, rows: &[EnrichedWorkout]) -> MirrorResult<()> {
        save_rows(path, rows)
    }

    /// Load the instructor cache table
    ///
    /// # Errors
    ///
    /// Same classes as [`Self::load_workouts`].
    pub fn load_instructors(
        &self,
        bootstrap: MirrorBootstrap,
    ) -> MirrorResult<Vec<InstructorRecord>> {
        load_rows(&self.instructor_cache_path(), bootstrap)
    }

    /// Persist the instructor cache table
    ///
    /// # Errors
    ///
    /// `MirrorIo` when the rewrite fails.
    pub fn save_instructors(&self, rows: &[InstructorRecord]) -> MirrorResult<()> {
        save_rows(&self.instructor_cache_path(), rows)
    }
}

/// Read any CSV table into string maps keyed by header name
///
/// Used for dashboard-side ingestion of the platform's workout export,
/// whose column set this library does not control.
///
/// # Errors
///
/// `MirrorIo` when the file cannot be opened, `MirrorCorrupt` when a row
/// does not decode.
pub fn load_string_table(path: &Path) -> MirrorResult<Vec<HashMap<String, String>>> {
    let file = fs::File::open(path).map_err(|e| MirrorError::MirrorIo {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: HashMap<String, String> = result.map_err(|e| MirrorError::MirrorCorrupt {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn load_rows<T: DeserializeOwned>(path: &Path, bootstrap: MirrorBootstrap) -> MirrorResult<Vec<T>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return match bootstrap {
                MirrorBootstrap::EmptyIfMissing => {
                    debug!(path = %path.display(), "mirror file absent, bootstrapping empty");
                    Ok(Vec::new())
                }
                MirrorBootstrap::Require => Err(MirrorError::MirrorMissing {
                    path: path.to_path_buf(),
                }),
            };
        }
        Err(e) => {
            return Err(MirrorError::MirrorIo {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: T = result.map_err(|e| MirrorError::MirrorCorrupt {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn save_rows<T: Serialize>(path: &Path, rows: &[T]) -> MirrorResult<()> {
    let io_err = |e: std::io::Error| MirrorError::MirrorIo {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    // Write the replacement next to the target, then rename over it, so a
    // crash mid-write never leaves a half-written mirror behind
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)
            .map_err(|e| io_err(std::io::Error::other(e)))?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| io_err(std::io::Error::other(e)))?;
        }
        writer.flush().map_err(io_err)?;
    }
    fs::rename(&tmp, path).map_err(io_err)?;
    debug!(path = %path.display(), rows = rows.len(), "mirror persisted");
    Ok(())
}
