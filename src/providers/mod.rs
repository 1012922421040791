// ABOUTME: Remote catalog provider implementations and the shared provider trait
// ABOUTME: The sync engine and resolver depend only on the CatalogProvider seam
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

/// Core provider trait
pub mod core;
/// Peloton API provider implementation
pub mod peloton;

pub use core::CatalogProvider;
pub use peloton::{PelotonApiConfig, PelotonProvider};
