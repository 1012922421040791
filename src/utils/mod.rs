// ABOUTME: Shared utility functions used across the mirror library
// ABOUTME: HTTP client construction with pooling and timeout configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

/// Shared HTTP client utilities
pub mod http_client;
