// ABOUTME: HTTP client construction with pooling and timeout configuration
// ABOUTME: Session clients keep a cookie store because the platform authenticates by cookie
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Create a cookie-holding client for an authenticated platform session
///
/// The platform's login endpoint sets a session cookie that every catalog
/// request must carry, so session clients are per-login rather than a
/// process-wide singleton. Connection pooling still applies within one
/// session, which covers the whole page walk of a sync pass.
#[must_use]
pub fn session_client(timeout_secs: u64, connect_timeout_secs: u64) -> Client {
    ClientBuilder::new()
        .cookie_store(true)
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .unwrap_or_else(|_| Client::new())
}
