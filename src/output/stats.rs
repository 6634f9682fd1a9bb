//! End-of-run summary output

use crate::store::Snapshot;
use std::time::Duration;

/// Prints the per-collection counts and elapsed time to stdout
///
/// # Arguments
///
/// * `snapshot` - The final store snapshot
/// * `elapsed` - Wall-clock duration of the run
pub fn print_summary(snapshot: &Snapshot, elapsed: Duration) {
    println!("Scraping completed in {:.2} seconds", elapsed.as_secs_f64());
    println!("  - Novels: {}", snapshot.novels.len());
    println!("  - Authors: {}", snapshot.authors.len());
    println!("  - Categories: {}", snapshot.categories.len());
    println!("  - Chapters: {}", snapshot.chapters.len());
    println!("  - Chapter contents: {}", snapshot.chapter_contents.len());
}
