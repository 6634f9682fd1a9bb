use serde::Deserialize;

/// Main configuration structure for Truyen-Harvest
///
/// Every section has defaults matching the reference crawl of
/// truyenfull.vision, so the binary can run without a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub limits: LimitsConfig,
    pub workers: WorkerConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            limits: LimitsConfig::default(),
            workers: WorkerConfig::default(),
            retry: RetryConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Listing URL template; page N is fetched from `{base-url}{N}/`
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://truyenfull.vision/danh-sach/truyen-hot/trang-".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// Crawl size limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Number of listing pages to crawl
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Maximum number of novels taken from the listing results for
    /// detail fetching (load control, not correctness)
    #[serde(rename = "novel-sample-size")]
    pub novel_sample_size: usize,

    /// Maximum chapters kept per novel
    #[serde(rename = "max-chapters-per-novel")]
    pub max_chapters_per_novel: usize,

    /// Chapter body size cap in bytes
    #[serde(rename = "content-cap-bytes")]
    pub content_cap_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_pages: 1,
            novel_sample_size: 30,
            max_chapters_per_novel: 5,
            content_cap_bytes: 50_000,
        }
    }
}

/// Per-stage worker pool sizes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Concurrent listing-page fetches
    pub pages: usize,

    /// Concurrent novel-detail fetches
    pub novels: usize,

    /// Concurrent chapter fetches, process-wide across all novels
    pub chapters: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            pages: 10,
            novels: 1,
            chapters: 5,
        }
    }
}

/// Retry policy for transient fetch failures
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of fetch attempts per URL
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base backoff delay in milliseconds; attempt i waits
    /// `base * 2^i` plus up to one second of jitter
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the JSON record sets are written into
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "scraped_data".to_string(),
        }
    }
}
