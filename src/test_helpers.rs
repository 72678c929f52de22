//! Shared test utilities for the mdseries test suite.
//!
//! Provides fixture setup, small tree builders, and lookup helpers that
//! panic with the available keys on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let outcome = scan(tmp.path(), &ScanConfig::default()).unwrap();
//!
//! let doc = find_document(&outcome.documents, "csharp/01_OOP_Basics.md");
//! assert_eq!(doc.title, "OOP Basics");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Document, SeriesIndex};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Build a document in memory, the way the scanner would record it.
pub fn doc(path: &str, links: &[&str]) -> Document {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let stem = file_name.rsplit_once('.').map(|(s, _)| s).unwrap_or(file_name);
    let (_, variant) = crate::naming::split_variant(stem, "_CN");
    let series = path
        .rsplit_once('/')
        .map(|(dir, _)| dir.rsplit('/').next().unwrap_or(dir))
        .unwrap_or("");
    Document {
        path: path.to_string(),
        title: stem.to_string(),
        series: series.to_string(),
        language_variant: variant,
        number: crate::naming::parse_entry_name(stem).number,
        outbound_links: links.iter().map(|l| l.to_string()).collect(),
    }
}

// =========================================================================
// Lookups — panics with a clear message on miss
// =========================================================================

/// Find a document by root-relative path. Panics if not found.
pub fn find_document<'a>(documents: &'a [Document], path: &str) -> &'a Document {
    documents
        .iter()
        .find(|d| d.path == path)
        .unwrap_or_else(|| {
            let paths: Vec<&str> = documents.iter().map(|d| d.path.as_str()).collect();
            panic!("document '{path}' not found. Available: {paths:?}")
        })
}

/// Find a series by name. Panics if not found.
pub fn find_series<'a>(index: &'a [SeriesIndex], name: &str) -> &'a SeriesIndex {
    index.iter().find(|s| s.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = index.iter().map(|s| s.name.as_str()).collect();
        panic!("series '{name}' not found. Available: {names:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All series names in index order.
pub fn series_names(index: &[SeriesIndex]) -> Vec<&str> {
    index.iter().map(|s| s.name.as_str()).collect()
}

/// File names of a series' documents in index order.
pub fn series_file_names(series: &SeriesIndex) -> Vec<&str> {
    series.documents.iter().map(|d| d.file_name()).collect()
}
