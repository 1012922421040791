// ABOUTME: Environment-driven configuration for mirror paths, API endpoints, and sync budgets
// ABOUTME: Environment-only approach; every value has a usable default except credentials
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

use std::env;
use std::path::PathBuf;

use crate::errors::{MirrorError, MirrorResult};

/// Default API base URL for the platform
pub const DEFAULT_API_BASE: &str = "https://api.onepeloton.com";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Mirror configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Base URL for platform API calls
    pub api_base_url: String,
    /// Directory holding mirror CSV files and the instructor cache
    pub data_dir: PathBuf,
    /// Maximum listing pages scanned per sync pass (None scans all pages)
    pub max_pages: Option<usize>,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// HTTP connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_owned(),
            data_dir: PathBuf::from("./data"),
            max_pages: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl MirrorConfig {
    /// Load configuration from environment variables, falling back to defaults
    ///
    /// Recognized variables: `PELOTON_API_BASE`, `MIRROR_DATA_DIR`,
    /// `MIRROR_MAX_PAGES`, `MIRROR_TIMEOUT_SECS`, `MIRROR_CONNECT_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("PELOTON_API_BASE").unwrap_or(defaults.api_base_url),
            data_dir: env::var("MIRROR_DATA_DIR")
                .map_or(defaults.data_dir, PathBuf::from),
            max_pages: env::var("MIRROR_MAX_PAGES")
                .ok()
                .and_then(|v| v.parse().ok()),
            timeout_secs: env::var("MIRROR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            connect_timeout_secs: env::var("MIRROR_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connect_timeout_secs),
        }
    }
}

/// Session credentials for the platform's login endpoint
#[derive(Debug, Clone)]
pub struct PelotonCredentials {
    /// Username or account email
    pub username_or_email: String,
    /// Account password
    pub password: String,
}

impl PelotonCredentials {
    /// Load credentials from `PELOTON_USERNAME` / `PELOTON_PASSWORD`
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` when either variable is unset, since no
    /// catalog endpoint works without a session.
    pub fn from_env() -> MirrorResult<Self> {
        let username_or_email =
            env::var("PELOTON_USERNAME").map_err(|_| MirrorError::NotAuthenticated {
                reason: "PELOTON_USERNAME is not set".to_owned(),
            })?;
        let password = env::var("PELOTON_PASSWORD").map_err(|_| MirrorError::NotAuthenticated {
            reason: "PELOTON_PASSWORD is not set".to_owned(),
        })?;
        Ok(Self {
            username_or_email,
            password,
        })
    }
}
