//! Thread-safe, deduplicating repository for scraped entities
//!
//! The store is the only shared mutable state in the pipeline. Every
//! mutation goes through its narrow API:
//! - get-or-create for authors and categories (deduplicated by name)
//! - append-only creation for novels, chapters, and chapter contents
//!
//! Each entity kind's counter + rows + lookup table lives behind its own
//! mutex, so the get-or-create check-and-insert is a single critical
//! section and callers for different entity kinds never contend. Ids are
//! 1-based, monotonically increasing, and never reused within a run.

mod entities;

pub use entities::{Author, Category, Chapter, ChapterContent, NewChapter, NewNovel, Novel};

use std::collections::HashMap;
use std::sync::Mutex;

/// A named, deduplicated table: rows plus a name -> id index
#[derive(Debug)]
struct NamedTable<T> {
    rows: Vec<T>,
    index: HashMap<String, i64>,
}

impl<T> Default for NamedTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

/// Thread-safe store for all scraped entities
#[derive(Debug, Default)]
pub struct EntityStore {
    authors: Mutex<NamedTable<Author>>,
    categories: Mutex<NamedTable<Category>>,
    novels: Mutex<Vec<Novel>>,
    chapters: Mutex<Vec<Chapter>>,
    // Separate guard from chapters: content appends never nest inside
    // chapter creation, so the two can proceed independently
    contents: Mutex<Vec<ChapterContent>>,
}

/// Immutable copy of every collection, handed to persistence at end of run
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub authors: Vec<Author>,
    pub categories: Vec<Category>,
    pub novels: Vec<Novel>,
    pub chapters: Vec<Chapter>,
    pub chapter_contents: Vec<ChapterContent>,
}

/// Per-collection record counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreCounts {
    pub authors: usize,
    pub categories: usize,
    pub novels: usize,
    pub chapters: usize,
    pub chapter_contents: usize,
}

/// Current timestamp in the persisted `YYYY-MM-DD HH:MM:SS` format
fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl EntityStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for an author name, creating the record on first sight
    ///
    /// The lookup and insert happen under one lock, so concurrent callers
    /// for the same new name observe exactly one created record and all
    /// receive the same id.
    pub fn get_or_create_author(&self, name: &str) -> i64 {
        let mut table = self.authors.lock().unwrap();
        if let Some(&id) = table.index.get(name) {
            return id;
        }

        let id = table.rows.len() as i64 + 1;
        let now = timestamp();
        table.rows.push(Author {
            id,
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
        });
        table.index.insert(name.to_string(), id);
        id
    }

    /// Returns the id for a category name, creating the record on first sight
    ///
    /// Same contract as [`get_or_create_author`](Self::get_or_create_author),
    /// with its own id sequence.
    pub fn get_or_create_category(&self, name: &str) -> i64 {
        let mut table = self.categories.lock().unwrap();
        if let Some(&id) = table.index.get(name) {
            return id;
        }

        let id = table.rows.len() as i64 + 1;
        let now = timestamp();
        table.rows.push(Category {
            id,
            name: name.to_string(),
            icon: String::new(),
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
        });
        table.index.insert(name.to_string(), id);
        id
    }

    /// Creates a novel record and returns its id
    ///
    /// Always appends: repeated names get distinct ids.
    pub fn create_novel(&self, novel: NewNovel) -> i64 {
        let mut rows = self.novels.lock().unwrap();
        let id = rows.len() as i64 + 1;
        let now = timestamp();
        rows.push(Novel {
            id,
            name: novel.name,
            description: novel.description,
            views: novel.views,
            likes: novel.likes,
            ratings: novel.ratings,
            status: novel.status,
            image: novel.image,
            author_id: novel.author_id,
            category_id: novel.category_id,
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
        });
        id
    }

    /// Creates a chapter record and returns its id
    ///
    /// Chapter ids share one global sequence across all novels.
    pub fn create_chapter(&self, chapter: NewChapter) -> i64 {
        let mut rows = self.chapters.lock().unwrap();
        let id = rows.len() as i64 + 1;
        let now = timestamp();
        rows.push(Chapter {
            id,
            name: chapter.name,
            sort_order: chapter.sort_order,
            novel_id: chapter.novel_id,
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
        });
        id
    }

    /// Appends a chapter body; no uniqueness check per chapter_id
    pub fn add_chapter_content(&self, content: ChapterContent) {
        self.contents.lock().unwrap().push(content);
    }

    /// Clones every collection into an internally consistent snapshot
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            authors: self.authors.lock().unwrap().rows.clone(),
            categories: self.categories.lock().unwrap().rows.clone(),
            novels: self.novels.lock().unwrap().clone(),
            chapters: self.chapters.lock().unwrap().clone(),
            chapter_contents: self.contents.lock().unwrap().clone(),
        }
    }

    /// Returns per-collection record counts
    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            authors: self.authors.lock().unwrap().rows.len(),
            categories: self.categories.lock().unwrap().rows.len(),
            novels: self.novels.lock().unwrap().len(),
            chapters: self.chapters.lock().unwrap().len(),
            chapter_contents: self.contents.lock().unwrap().len(),
        }
    }
}
