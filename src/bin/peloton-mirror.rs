// ABOUTME: Command-line front end for the catalog mirror: sync, roster refresh
// ABOUTME: Thin orchestration only; credentials and tuning come from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

//!
//! Usage:
//! ```bash
//! # Mirror every browse category's archived classes
//! PELOTON_USERNAME=me PELOTON_PASSWORD=secret peloton-mirror sync-categories
//!
//! # Mirror one category into a custom directory
//! peloton-mirror --data-dir ./mirrors sync-category --slug cycling
//!
//! # Mirror a user's public workout history
//! peloton-mirror sync-user --user-id 0a1b2c3d
//!
//! # Refresh the instructor cache from the roster
//! peloton-mirror fetch-instructors
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use peloton_mirror::config::{MirrorConfig, PelotonCredentials};
use peloton_mirror::logging;
use peloton_mirror::providers::{CatalogProvider, PelotonApiConfig, PelotonProvider};
use peloton_mirror::resolver::{InstructorCache, NameResolver};
use peloton_mirror::storage::{MirrorBootstrap, MirrorStore};
use peloton_mirror::sync::{SyncEngine, SyncOptions, SyncReport};

#[derive(Parser)]
#[command(
    name = "peloton-mirror",
    about = "Incremental local mirror of the Peloton public catalog",
    long_about = "Keeps per-category class mirrors, user workout mirrors, and the \
                  instructor cache up to date without re-downloading already-mirrored data."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data directory override (default from MIRROR_DATA_DIR or ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Maximum listing pages scanned per sync pass
    #[arg(long, global = true)]
    max_pages: Option<usize>,

    /// Fail instead of bootstrapping empty when a mirror file is missing
    #[arg(long, global = true)]
    require_existing: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Mirror every browse category's archived classes
    SyncCategories,

    /// Mirror one browse category's archived classes
    SyncCategory {
        /// Category slug (e.g. cycling)
        #[arg(long)]
        slug: String,
    },

    /// Mirror a user's public workout history
    SyncUser {
        /// Platform user identifier
        #[arg(long)]
        user_id: String,
    },

    /// Refresh the instructor cache from the full roster
    FetchInstructors,

    /// Print device-type display-name mappings from ride metadata
    ListDeviceTypes,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_from_env()?;
    let cli = Cli::parse();

    let mut config = MirrorConfig::from_env();
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if cli.max_pages.is_some() {
        config.max_pages = cli.max_pages;
    }

    let credentials = PelotonCredentials::from_env()?;
    let provider = PelotonProvider::login(PelotonApiConfig::from(&config), &credentials).await?;

    let store = MirrorStore::new(config.data_dir.clone());
    let cache = InstructorCache::load(&store, MirrorBootstrap::EmptyIfMissing)?;
    let mut resolver = NameResolver::new(&provider, &store, cache);

    let options = SyncOptions {
        max_pages: config.max_pages,
        bootstrap: if cli.require_existing {
            MirrorBootstrap::Require
        } else {
            MirrorBootstrap::EmptyIfMissing
        },
    };
    let engine = SyncEngine::new(&provider, &store, options);

    match cli.command {
        Command::SyncCategories => {
            let reports = engine.sync_all_categories(&mut resolver).await?;
            for report in &reports {
                log_report(report);
            }
        }
        Command::SyncCategory { slug } => {
            let report = engine.sync_category(&slug, &mut resolver).await?;
            log_report(&report);
        }
        Command::SyncUser { user_id } => {
            let report = engine.sync_user_workouts(&user_id, &mut resolver).await?;
            log_report(&report);
        }
        Command::FetchInstructors => {
            let cached = resolver.refresh_roster().await?;
            info!(cached, "instructor cache refreshed");
        }
        Command::ListDeviceTypes => {
            let mappings = provider.device_type_mappings().await?;
            for mapping in &mappings {
                println!("{}\t{}", mapping.device_type, mapping.display_name);
            }
        }
    }

    Ok(())
}

fn log_report(report: &SyncReport) {
    info!(
        listing = %report.listing,
        pages = report.pages_scanned,
        new = report.new_records,
        dropped = report.dropped_records,
        stopped_at_known = report.stopped_at_known,
        rows = report.mirror_rows,
        "sync pass complete"
    );
}
