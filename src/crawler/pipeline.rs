//! Pipeline orchestration
//!
//! The pipeline composes three bounded stages:
//! 1. Page stage: fetch listing pages, extract novel stubs, resolve authors
//! 2. Novel stage: fetch detail pages, create novels, categories, chapters
//! 3. Chapter stage: fetch chapter bodies, nested inside each novel worker
//!
//! Every stage drops failed items instead of aborting; whatever survived ends
//! up in the final store snapshot. The chapter stage is nested per novel but
//! gated by one process-wide semaphore, so total chapter-fetch concurrency
//! stays at `workers.chapters` no matter how many novels run in parallel.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, fetch_with_retry, paced_delay};
use crate::crawler::stage::StageRunner;
use crate::extract::{parse_chapter_body, parse_listing, parse_novel_detail, NovelStub};
use crate::store::{ChapterContent, EntityStore, NewChapter, NewNovel, Snapshot};
use crate::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Per-request timeouts, fixed per call site
const PAGE_TIMEOUT: Duration = Duration::from_secs(10);
const DETAIL_TIMEOUT: Duration = Duration::from_secs(15);
const CHAPTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Randomized pacing windows in milliseconds, per fetch kind
const PAGE_PACING_MS: (u64, u64) = (100, 500);
const NOVEL_PACING_MS: (u64, u64) = (300, 700);
const CHAPTER_PACING_MS: (u64, u64) = (200, 500);

/// A novel stub with its author already resolved in the store
#[derive(Debug, Clone)]
struct NovelLead {
    stub: NovelStub,
    author_id: i64,
}

/// A created chapter awaiting its body fetch
#[derive(Debug, Clone)]
struct ChapterJob {
    chapter_id: i64,
    title: String,
    url: String,
    novel: Arc<String>,
}

/// The three-stage crawl orchestrator
pub struct Pipeline {
    config: Arc<Config>,
    client: Client,
    store: Arc<EntityStore>,
    /// Process-wide chapter-fetch bound, shared by every per-novel stage
    chapter_slots: Arc<Semaphore>,
}

impl Pipeline {
    /// Creates a pipeline with a fresh, empty store
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(HarvestError)` - HTTP client construction failed
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client(&config.site)?;
        let chapter_slots = Arc::new(Semaphore::new(config.workers.chapters));

        Ok(Self {
            config: Arc::new(config),
            client,
            store: Arc::new(EntityStore::new()),
            chapter_slots,
        })
    }

    /// The shared entity store backing this pipeline
    pub fn store(&self) -> &Arc<EntityStore> {
        &self.store
    }

    /// Runs the full crawl and returns the final store snapshot
    ///
    /// Item failures never abort the run; cancellation stops new work and
    /// abandons in-flight requests, and the partial snapshot is still
    /// returned.
    pub async fn run(self: &Arc<Self>, cancel: &CancellationToken) -> Snapshot {
        let limits = &self.config.limits;
        tracing::info!("Starting to scrape {} listing pages", limits.max_pages);

        // Stage 1: listing pages -> novel leads
        let pages: Vec<u32> = (1..=limits.max_pages).collect();
        let page_stage = StageRunner::new("page", self.config.workers.pages);
        let page_results = {
            let this = Arc::clone(self);
            let token = cancel.clone();
            page_stage
                .run(pages, cancel, move |page| {
                    let this = Arc::clone(&this);
                    let token = token.clone();
                    async move { this.process_page(page, &token).await }
                })
                .await
        };

        let mut leads: Vec<NovelLead> = page_results.into_iter().flatten().collect();
        tracing::info!(
            "Found {} novels across {} pages",
            leads.len(),
            limits.max_pages
        );

        // Load control: only a fixed sample goes through detail fetching
        leads.truncate(limits.novel_sample_size);
        let total = leads.len();
        tracing::info!("Fetching details for {} novels", total);

        // Stage 2 (with stage 3 nested per novel)
        let items: Vec<(usize, NovelLead)> = leads
            .into_iter()
            .enumerate()
            .map(|(i, lead)| (i + 1, lead))
            .collect();
        let novel_stage = StageRunner::new("novel", self.config.workers.novels);
        {
            let this = Arc::clone(self);
            let token = cancel.clone();
            novel_stage
                .run(items, cancel, move |(index, lead)| {
                    let this = Arc::clone(&this);
                    let token = token.clone();
                    async move { this.process_novel(index, total, lead, token).await }
                })
                .await;
        }

        let counts = self.store.counts();
        tracing::info!(
            "Crawl finished: {} authors, {} categories, {} novels, {} chapters, {} chapter bodies",
            counts.authors,
            counts.categories,
            counts.novels,
            counts.chapters,
            counts.chapter_contents
        );

        self.store.snapshot()
    }

    /// Fetches one listing page and returns its resolved novel leads
    async fn process_page(&self, page: u32, cancel: &CancellationToken) -> Option<Vec<NovelLead>> {
        let url = format!("{}{}/", self.config.site.base_url, page);
        let context = format!("Error fetching page {}", page);

        let fetched = fetch_with_retry(
            &self.client,
            &url,
            PAGE_TIMEOUT,
            &self.config.retry,
            cancel,
            &context,
        )
        .await?;

        if !fetched.is_ok() {
            tracing::warn!("Failed to fetch page {}: status code {}", page, fetched.status);
            return None;
        }

        let base = Url::parse(&url).ok()?;
        let stubs = parse_listing(&fetched.body, &base);

        let leads: Vec<NovelLead> = stubs
            .into_iter()
            .map(|stub| {
                let author_id = self.store.get_or_create_author(&stub.author_name);
                NovelLead { stub, author_id }
            })
            .collect();

        tracing::info!("Page {} done, {} books found", page, leads.len());

        paced_delay(PAGE_PACING_MS.0, PAGE_PACING_MS.1).await;
        Some(leads)
    }

    /// Fetches one novel's detail page, creates its records, and runs the
    /// nested chapter stage
    async fn process_novel(
        self: Arc<Self>,
        index: usize,
        total: usize,
        lead: NovelLead,
        cancel: CancellationToken,
    ) -> Option<()> {
        let title = lead.stub.title.clone();
        tracing::info!("Fetching details for {} ({}/{})", title, index, total);

        paced_delay(NOVEL_PACING_MS.0, NOVEL_PACING_MS.1).await;

        let context = format!("Error fetching details for novel {}", title);
        let fetched = fetch_with_retry(
            &self.client,
            &lead.stub.url,
            DETAIL_TIMEOUT,
            &self.config.retry,
            &cancel,
            &context,
        )
        .await?;

        if !fetched.is_ok() {
            tracing::warn!(
                "Failed to fetch details for {}: status code {}",
                title,
                fetched.status
            );
            return None;
        }

        let base = Url::parse(&lead.stub.url).ok()?;
        let detail = parse_novel_detail(&fetched.body, &base);

        let category_ids: Vec<i64> = detail
            .categories
            .iter()
            .map(|name| self.store.get_or_create_category(name))
            .collect();

        let novel_id = self.store.create_novel(NewNovel {
            name: lead.stub.title,
            description: detail.description,
            views: 0,
            likes: 0,
            ratings: detail.rating,
            status: detail.status,
            image: lead.stub.image,
            author_id: lead.author_id,
            category_id: category_ids.first().copied(),
        });

        // Chapter records are created serially here, so sort_order reflects
        // page position regardless of fetch completion order below
        let novel_name = Arc::new(title);
        let jobs: Vec<ChapterJob> = detail
            .chapters
            .into_iter()
            .take(self.config.limits.max_chapters_per_novel)
            .enumerate()
            .map(|(i, link)| {
                let chapter_id = self.store.create_chapter(NewChapter {
                    name: link.title.clone(),
                    sort_order: (i + 1) as f64,
                    novel_id,
                });
                ChapterJob {
                    chapter_id,
                    title: link.title,
                    url: link.url,
                    novel: Arc::clone(&novel_name),
                }
            })
            .collect();

        let planned = jobs.len();

        // Stage 3, gated by the process-wide chapter semaphore
        let chapter_stage = StageRunner::shared("chapter", Arc::clone(&self.chapter_slots));
        let fetched_count = {
            let this = Arc::clone(&self);
            let token = cancel.clone();
            chapter_stage
                .run(jobs, &cancel, move |job| {
                    let this = Arc::clone(&this);
                    let token = token.clone();
                    async move { this.process_chapter(job, &token).await }
                })
                .await
                .len()
        };

        tracing::info!(
            "Completed novel {} with {}/{} chapters",
            novel_name,
            fetched_count,
            planned
        );
        Some(())
    }

    /// Fetches one chapter body and appends it to the store
    async fn process_chapter(&self, job: ChapterJob, cancel: &CancellationToken) -> Option<()> {
        paced_delay(CHAPTER_PACING_MS.0, CHAPTER_PACING_MS.1).await;

        let context = format!("Error fetching chapter {}", job.title);
        let fetched = fetch_with_retry(
            &self.client,
            &job.url,
            CHAPTER_TIMEOUT,
            &self.config.retry,
            cancel,
            &context,
        )
        .await?;

        if !fetched.is_ok() {
            tracing::warn!(
                "Failed to fetch chapter {}: status code {}",
                job.title,
                fetched.status
            );
            return None;
        }

        let body = parse_chapter_body(&fetched.body);
        let content = truncate_utf8(body, self.config.limits.content_cap_bytes);

        self.store.add_chapter_content(ChapterContent {
            chapter_id: job.chapter_id,
            content,
        });

        tracing::debug!("Fetched chapter {} for {}", job.title, job.novel);
        Some(())
    }
}

/// Truncates a string to at most `cap` bytes on a character boundary
pub(crate) fn truncate_utf8(mut s: String, cap: usize) -> String {
    if s.len() <= cap {
        return s;
    }
    let mut end = cap;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
    s
}
