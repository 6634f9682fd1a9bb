//! Crawler module for catalog fetching and pipeline orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry, backoff, and pacing
//! - Bounded-concurrency stage execution
//! - The three-stage page/novel/chapter pipeline

mod fetcher;
mod pipeline;
mod stage;

pub use fetcher::{build_http_client, fetch_with_retry, paced_delay, FetchedPage};
pub use pipeline::Pipeline;
pub use stage::StageRunner;

use crate::config::Config;
use crate::store::Snapshot;
use crate::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl and returns the assembled snapshot
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client and an empty entity store
/// 2. Fetch all listing pages and resolve authors
/// 3. Fetch novel details, creating novels, categories, and chapters
/// 4. Fetch chapter bodies under the process-wide chapter bound
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `cancel` - Token that stops new work when fired
///
/// # Returns
///
/// * `Ok(Snapshot)` - Everything gathered before completion or cancellation
/// * `Err(HarvestError)` - Pipeline construction failed
pub async fn crawl(config: Config, cancel: CancellationToken) -> Result<Snapshot> {
    let pipeline = Arc::new(Pipeline::new(config)?);
    Ok(pipeline.run(&cancel).await)
}
