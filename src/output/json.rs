use crate::store::Snapshot;
use crate::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes one record set as a pretty-printed JSON array
fn write_records<T: Serialize>(dir: &Path, filename: &str, records: &[T]) -> Result<()> {
    let path = dir.join(filename);
    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, records)?;
    // Flush explicitly: an error surfaced here would vanish in Drop,
    // leaving a truncated file behind an Ok return
    writer.flush()?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}

/// Persists a store snapshot as five JSON files in `dir`
///
/// Creates the directory if needed, then writes `authors.json`,
/// `categories.json`, `novels.json`, `chapters.json`, and
/// `chapter_contents.json`.
///
/// # Arguments
///
/// * `snapshot` - The final store snapshot
/// * `dir` - Output directory
///
/// # Returns
///
/// * `Ok(())` - All five files written
/// * `Err(HarvestError)` - Directory creation or a file write failed
pub fn write_snapshot(snapshot: &Snapshot, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    write_records(dir, "authors.json", &snapshot.authors)?;
    write_records(dir, "categories.json", &snapshot.categories)?;
    write_records(dir, "novels.json", &snapshot.novels)?;
    write_records(dir, "chapters.json", &snapshot.chapters)?;
    write_records(dir, "chapter_contents.json", &snapshot.chapter_contents)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EntityStore, NewChapter, NewNovel};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let store = EntityStore::new();
        let author = store.get_or_create_author("Alice");
        let category = store.get_or_create_category("Action");
        let novel = store.create_novel(NewNovel {
            name: "T1".to_string(),
            description: "A story.".to_string(),
            views: 0,
            likes: 0,
            ratings: 4.5,
            status: "Full".to_string(),
            image: String::new(),
            author_id: author,
            category_id: Some(category),
        });
        store.create_chapter(NewChapter {
            name: "Chapter 1".to_string(),
            sort_order: 1.0,
            novel_id: novel,
        });
        store.snapshot()
    }

    #[test]
    fn test_write_snapshot_creates_all_files() {
        let dir = TempDir::new().unwrap();
        write_snapshot(&sample_snapshot(), dir.path()).unwrap();

        for filename in [
            "authors.json",
            "categories.json",
            "novels.json",
            "chapters.json",
            "chapter_contents.json",
        ] {
            assert!(dir.path().join(filename).exists(), "missing {}", filename);
        }
    }

    #[test]
    fn test_written_files_parse_back() {
        let dir = TempDir::new().unwrap();
        write_snapshot(&sample_snapshot(), dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("novels.json")).unwrap();
        let novels: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(novels.len(), 1);
        assert_eq!(novels[0]["name"], "T1");
        assert_eq!(novels[0]["author_id"], 1);
        assert_eq!(novels[0]["deleted_at"], serde_json::Value::Null);
    }

    #[test]
    fn test_large_record_set_is_fully_flushed() {
        let store = EntityStore::new();
        let author = store.get_or_create_author("Alice");
        let novel = store.create_novel(NewNovel {
            name: "T1".to_string(),
            description: String::new(),
            views: 0,
            likes: 0,
            ratings: 0.0,
            status: "Unknown".to_string(),
            image: String::new(),
            author_id: author,
            category_id: None,
        });
        // Well past the default writer buffer, so the tail of the file
        // only exists on disk if the final flush happened
        for i in 0..100 {
            let chapter = store.create_chapter(NewChapter {
                name: format!("Chapter {}", i + 1),
                sort_order: (i + 1) as f64,
                novel_id: novel,
            });
            store.add_chapter_content(crate::store::ChapterContent {
                chapter_id: chapter,
                content: "x".repeat(500),
            });
        }

        let dir = TempDir::new().unwrap();
        write_snapshot(&store.snapshot(), dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("chapter_contents.json")).unwrap();
        let contents: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(contents.len(), 100);
        assert_eq!(contents[99]["chapter_id"], 100);
    }

    #[test]
    fn test_write_snapshot_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("out").join("run1");
        write_snapshot(&sample_snapshot(), &nested).unwrap();
        assert!(nested.join("authors.json").exists());
    }
}
