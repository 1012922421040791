// ABOUTME: Unified error handling for catalog sync, name resolution, and mirror storage
// ABOUTME: Distinguishes recoverable fetch failures from the user-visible mirror-file class
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//! # Unified Error Handling
//!
//! Most failures in this crate are recoverable by policy: a page that fails
//! to fetch or parse contributes nothing and the sync continues, an
//! instructor lookup that fails degrades to a label. Those paths log and
//! move on. The one class that must surface to the caller is the local
//! mirror base file: the engine cannot safely guess whether an unreadable
//! mirror means "first run" or "I/O problem", so `MirrorIo` and
//! `MirrorCorrupt` propagate.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate
pub type MirrorResult<T> = Result<T, MirrorError>;

/// Errors produced by sync, resolution, and storage operations
#[derive(Debug, Error)]
pub enum MirrorError {
    /// HTTP transport failure (connect, timeout, body read)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The platform answered with a non-success status
    #[error("api error: {status} on {endpoint}: {message}")]
    Api {
        /// HTTP status code returned by the platform
        status: u16,
        /// Endpoint path that produced the error
        endpoint: String,
        /// Response body, truncated for logging
        message: String,
    },

    /// A response body was missing an expected field or had the wrong shape
    #[error("malformed response from {endpoint}: {detail}")]
    MalformedResponse {
        /// Endpoint path that produced the body
        endpoint: String,
        /// What was missing or mistyped
        detail: String,
    },

    /// A mirror or cache file could not be read or written
    #[error("mirror file i/o failure at {path}: {source}")]
    MirrorIo {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A mirror or cache file exists but its content does not decode
    #[error("mirror file at {path} is corrupt: {detail}")]
    MirrorCorrupt {
        /// File that failed to decode
        path: PathBuf,
        /// Decode failure description
        detail: String,
    },

    /// A mirror file was required but does not exist
    #[error("mirror file at {path} does not exist and bootstrap policy forbids an empty baseline")]
    MirrorMissing {
        /// File that was required
        path: PathBuf,
    },

    /// Session login has not been performed or was rejected
    #[error("not authenticated: {reason}")]
    NotAuthenticated {
        /// Why the session is unusable
        reason: String,
    },

    /// Configuration is unusable (bad base URL, bad paths)
    #[error("configuration error: {detail}")]
    Config {
        /// What is wrong with the configuration
        detail: String,
    },
}

impl MirrorError {
    /// Create an API error, truncating the body for log hygiene
    #[must_use]
    pub fn api(status: u16, endpoint: impl Into<String>, body: &str) -> Self {
        const MAX_BODY: usize = 500;
        let message = if body.len() > MAX_BODY {
            // get() keeps the cut on a char boundary
            body.get(..MAX_BODY)
                .map_or_else(|| body.to_owned(), |cut| format!("{cut}..."))
        } else {
            body.to_owned()
        };
        Self::Api {
            status,
            endpoint: endpoint.into(),
            message,
        }
    }

    /// Create a malformed-response error
    #[must_use]
    pub fn malformed(endpoint: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint: endpoint.into(),
            detail: detail.into(),
        }
    }

    /// Whether the error is recoverable at the sync level
    ///
    /// Recoverable errors make a page or lookup contribute nothing; the
    /// walk continues. Mirror-file errors are not recoverable.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Api { .. } | Self::MalformedResponse { .. } => true,
            Self::MirrorIo { .. }
            | Self::MirrorCorrupt { .. }
            | Self::MirrorMissing { .. }
            | Self::NotAuthenticated { .. }
            | Self::Config { .. } => false,
        }
    }
}
