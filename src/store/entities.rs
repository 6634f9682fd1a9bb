use serde::{Deserialize, Serialize};

/// An author record, deduplicated by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    /// Soft-delete marker, always `None` in this flow
    pub deleted_at: Option<String>,
}

/// A category (genre) record, deduplicated by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub icon: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// A novel record; novel names are intentionally NOT deduplicated, so
/// repeated titles across listing pages become distinct records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Novel {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub views: i64,
    pub likes: i64,
    pub ratings: f64,
    pub status: String,
    pub image: String,
    pub author_id: i64,
    /// First category on the detail page, if any
    pub category_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Fields for a new novel, before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewNovel {
    pub name: String,
    pub description: String,
    pub views: i64,
    pub likes: i64,
    pub ratings: f64,
    pub status: String,
    pub image: String,
    pub author_id: i64,
    pub category_id: Option<i64>,
}

/// A chapter record; ids are globally unique across all novels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chapter {
    pub id: i64,
    pub name: String,
    /// 1-based position within the novel's chapter list at scrape time.
    /// Float-typed so a chapter can later be inserted between two others.
    pub sort_order: f64,
    pub novel_id: i64,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

/// Fields for a new chapter, before the store assigns an id
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub name: String,
    pub sort_order: f64,
    pub novel_id: i64,
}

/// A fetched chapter body, appended without uniqueness checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterContent {
    pub chapter_id: i64,
    pub content: String,
}
