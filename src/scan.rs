//! Filesystem scanning.
//!
//! Stage 1 of the pipeline. Walks the content tree and turns every file with
//! a recognized extension into a [`Document`].
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── mdseries.toml                # Scan configuration (optional)
//! ├── README.md                    # Root series
//! ├── csharp/                      # Series "csharp"
//! │   ├── 01_OOP_Basics.md         # Base variant, number 1
//! │   ├── 01_OOP_Basics_CN.md      # Translated variant of the above
//! │   └── 02_Threading.md
//! └── design-patterns/             # Series "design-patterns"
//!     └── 01_Adapter.md
//! ```
//!
//! A document's series is its immediate parent directory name, so nested
//! directories form their own series rather than merging into the parent.
//!
//! ## Failure Isolation
//!
//! Only a missing or unreadable content root aborts the scan. A file that
//! cannot be read or is not UTF-8 becomes a [`SkippedFile`] and the walk
//! continues; the report lists it alongside everything that did scan.
//!
//! ## Parallel Reading
//!
//! Files are read on a dedicated [rayon](https://docs.rs/rayon) pool sized by
//! [`config::effective_threads`]. The walk itself is sequential and sorted,
//! and results are sorted by path again after collection, so the document
//! order never depends on which reader finished first.

use crate::config::{self, ScanConfig};
use crate::links;
use crate::naming;
use crate::types::{Document, SkippedFile};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Content root does not exist or is not a directory: {0}")]
    RootDirectory(PathBuf),
    #[error("Content root cannot be read: {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to start file readers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a single file was skipped. Never aborts the scan.
#[derive(Error, Debug)]
pub enum UnreadableFileError {
    #[error("cannot read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("not valid UTF-8 text")]
    NotUtf8,
    #[error("cannot walk entry: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Everything the scan produced: documents sorted by path, plus skipped files.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub documents: Vec<Document>,
    pub skipped: Vec<SkippedFile>,
}

/// A file selected by the walk, before it is read.
struct Candidate {
    abs: PathBuf,
    rel: String,
}

pub fn scan(root: &Path, config: &ScanConfig) -> Result<ScanOutcome, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootDirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let (candidates, mut skipped) = collect_candidates(root, config);
    tracing::debug!(files = candidates.len(), "walk complete");

    let threads = config::effective_threads(&config.processing);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;

    let results: Vec<Result<Document, SkippedFile>> = pool.install(|| {
        candidates
            .par_iter()
            .map(|candidate| {
                read_document(candidate, &config.variant_suffix).map_err(|err| SkippedFile {
                    path: candidate.rel.clone(),
                    reason: err.to_string(),
                })
            })
            .collect()
    });

    let mut documents = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(document) => documents.push(document),
            Err(skip) => skipped.push(skip),
        }
    }

    for skip in &skipped {
        tracing::warn!(path = %skip.path, reason = %skip.reason, "skipped file");
    }

    documents.sort_by(|a, b| a.path.cmp(&b.path));
    skipped.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ScanOutcome { documents, skipped })
}

/// Walk the tree in sorted order and pick out document files.
///
/// Walk errors below the root are recorded as skipped entries.
fn collect_candidates(root: &Path, config: &ScanConfig) -> (Vec<Candidate>, Vec<SkippedFile>) {
    let mut candidates = Vec::new();
    let mut skipped = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e, config));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| relative_path(root, p))
                    .unwrap_or_default();
                skipped.push(SkippedFile {
                    path,
                    reason: UnreadableFileError::from(err).to_string(),
                });
                continue;
            }
        };
        // `Path::is_file` follows symlinks; the entry's own file type does not.
        if !entry.path().is_file() || !has_document_extension(entry.path(), config) {
            continue;
        }
        candidates.push(Candidate {
            rel: relative_path(root, entry.path()),
            abs: entry.into_path(),
        });
    }

    (candidates, skipped)
}

fn is_ignored(entry: &DirEntry, config: &ScanConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || config.ignore.iter().any(|i| i.as_str() == name)
}

fn has_document_extension(path: &Path, config: &ScanConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| config.is_document_extension(e))
}

/// Root-relative path with `/` separators on every platform.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.iter()
        .map(|c| c.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn read_document(
    candidate: &Candidate,
    variant_suffix: &str,
) -> Result<Document, UnreadableFileError> {
    let bytes = fs::read(&candidate.abs)?;
    let text = String::from_utf8(bytes).map_err(|_| UnreadableFileError::NotUtf8)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let path = Path::new(&candidate.rel);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let series = path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let (_, language_variant) = naming::split_variant(&stem, variant_suffix);
    let number = naming::parse_entry_name(&stem).number;
    let title = extract_title(text).unwrap_or_else(|| stem.clone());
    let outbound_links = links::extract_links(text);

    tracing::debug!(path = %candidate.rel, links = outbound_links.len(), "scanned");

    Ok(Document {
        path: candidate.rel.clone(),
        title,
        series,
        language_variant,
        number,
        outbound_links,
    })
}

/// Text of the first top-level `# heading`, trimmed.
///
/// Lines inside fenced code blocks are not headings, so a shell comment in a
/// sample script never becomes an article title.
fn extract_title(text: &str) -> Option<String> {
    // Open fence as (marker char, run length). Only a run of the same char at
    // least as long, with nothing after it, closes the fence.
    let mut fence: Option<(char, usize)> = None;
    for line in text.lines() {
        let trimmed = line.trim_start();
        match fence {
            Some((marker, len)) => {
                let run = fence_run(trimmed, marker);
                if run >= len && trimmed[run..].trim().is_empty() {
                    fence = None;
                }
                continue;
            }
            None => {
                if let Some(marker) = ['`', '~'].into_iter().find(|&c| fence_run(trimmed, c) >= 3) {
                    fence = Some((marker, fence_run(trimmed, marker)));
                    continue;
                }
            }
        }
        if let Some(heading) = line.strip_prefix("# ") {
            let heading = heading.trim();
            if !heading.is_empty() {
                return Some(heading.to_string());
            }
        }
    }
    None
}

/// Length of the leading run of `marker` in `line`.
fn fence_run(line: &str, marker: char) -> usize {
    line.chars().take_while(|&c| c == marker).count()
}
