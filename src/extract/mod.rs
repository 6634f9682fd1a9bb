//! HTML extraction adapter
//!
//! Pure, synchronous functions that turn fetched catalog markup into
//! structured records. No I/O happens here; the pipeline owns fetching and
//! storage. Missing fields substitute defined defaults (empty string, zero,
//! "Unknown") rather than failing the item.

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A novel discovered on a listing page
#[derive(Debug, Clone)]
pub struct NovelStub {
    /// Novel title from the listing entry
    pub title: String,

    /// Absolute URL of the detail page
    pub url: String,

    /// Author name as listed; "Unknown" when absent
    pub author_name: String,

    /// Cover image URL; empty when absent
    pub image: String,
}

/// Structured fields extracted from a novel detail page
#[derive(Debug, Clone)]
pub struct NovelDetail {
    pub description: String,
    pub categories: Vec<String>,
    pub rating: f64,
    pub status: String,
    pub chapters: Vec<ChapterLink>,
}

/// A chapter reference from a detail page's chapter list
#[derive(Debug, Clone)]
pub struct ChapterLink {
    pub title: String,
    pub url: String,
}

/// Collects and trims the text content of an element
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of the first element matching `selector`, if any
fn select_text(root: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    root.select(&sel)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Parses a listing page into novel stubs
///
/// Each catalog entry is a `div.row[itemscope]` block carrying the title,
/// detail link, author name, and lazy-loaded cover image. Entries without a
/// detail link are skipped; a missing author becomes "Unknown" and a missing
/// image becomes an empty string.
///
/// # Arguments
///
/// * `html` - The listing page markup
/// * `base_url` - The page URL, for resolving relative detail links
pub fn parse_listing(html: &str, base_url: &Url) -> Vec<NovelStub> {
    let document = Html::parse_document(html);
    let mut stubs = Vec::new();

    let item_sel = match Selector::parse("div.row[itemscope]") {
        Ok(sel) => sel,
        Err(_) => return stubs,
    };
    let title_sel = Selector::parse("h3.truyen-title").ok();
    let link_sel = Selector::parse("h3.truyen-title a[href]").ok();
    let author_sel = Selector::parse("span.author").ok();
    let image_sel = Selector::parse("div.lazyimg").ok();

    for item in document.select(&item_sel) {
        let title = title_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .map(element_text)
            .unwrap_or_default();

        let url = match link_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| base_url.join(href).ok())
        {
            Some(resolved) => resolved.to_string(),
            None => continue,
        };

        let author_name = author_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .map(|span| element_text(span).replace("✎ ", ""))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let image = image_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .and_then(|div| div.value().attr("data-image"))
            .unwrap_or("")
            .to_string();

        stubs.push(NovelStub {
            title,
            url,
            author_name,
            image,
        });
    }

    stubs
}

/// Parses a novel detail page
///
/// Extracts the description, genre list, rating, completion status, and the
/// chapter list with links resolved to absolute URLs. Every field degrades to
/// its default when the corresponding markup is absent.
///
/// # Arguments
///
/// * `html` - The detail page markup
/// * `base_url` - The detail page URL, for resolving relative chapter links
pub fn parse_novel_detail(html: &str, base_url: &Url) -> NovelDetail {
    let document = Html::parse_document(html);

    let description = select_text(&document, "div.desc-text").unwrap_or_default();

    let mut categories = Vec::new();
    if let Ok(sel) = Selector::parse(r#"a[itemprop="genre"]"#) {
        for tag in document.select(&sel) {
            let name = element_text(tag);
            if !name.is_empty() {
                categories.push(name);
            }
        }
    }

    let rating = select_text(&document, r#"span[itemprop="ratingValue"]"#)
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    let status =
        select_text(&document, "span.text-success").unwrap_or_else(|| "Unknown".to_string());

    let mut chapters = Vec::new();
    if let Ok(sel) = Selector::parse("div#list-chapter ul.list-chapter a[href]") {
        for link in document.select(&sel) {
            let title = element_text(link);
            if let Some(url) = link
                .value()
                .attr("href")
                .and_then(|href| base_url.join(href).ok())
            {
                chapters.push(ChapterLink {
                    title,
                    url: url.to_string(),
                });
            }
        }
    }

    NovelDetail {
        description,
        categories,
        rating,
        status,
        chapters,
    }
}

/// Extracts the chapter body text from a chapter page
///
/// Returns "Content not available" when the body container is missing.
pub fn parse_chapter_body(html: &str) -> String {
    let document = Html::parse_document(html);
    select_text(&document, "div#chapter-c").unwrap_or_else(|| "Content not available".to_string())
}
