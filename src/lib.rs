//! # mdseries
//!
//! Index and link-check a bilingual tree of Markdown articles organized into
//! series. Your filesystem is the data source: directories become series,
//! articles are ordered by numeric prefix, and a suffix on the file stem
//! (`_CN` by default) marks the translated variant of an article.
//!
//! # Architecture: Linear Pipeline
//!
//! ```text
//! 1. Scan      content/   →  Documents        (filesystem → structured data)
//! 2. Validate  Documents  →  Links, pairings  (resolve links, pair variants)
//! 3. Index     Documents  →  SeriesIndex      (ordered table of contents)
//! 4. Report    findings   →  text / JSON / Markdown
//! ```
//!
//! Only the scan touches the filesystem. Every later stage is a pure function
//! of the scanned documents, which keeps them testable without a content
//! tree and makes reruns over an unchanged tree produce identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1 — walks the content root, reads documents in parallel, records skipped files |
//! | [`links`] | Markdown link extraction and relative path resolution |
//! | [`validate`] | Stage 2 — broken links, variant pairing, orphan detection |
//! | [`index`] | Stage 3 — groups documents into ordered series |
//! | [`report`] | Stage 4 — report assembly, text/JSON rendering, Markdown table of contents |
//! | [`pipeline`] | Runs the stages in order, tracks the run's stage |
//! | [`config`] | `mdseries.toml` loading, validation, merging, CLI overrides |
//! | [`naming`] | `NN_name` prefix and variant-suffix parsing, ordering keys |
//! | [`types`] | Shared types: `Document`, `Link`, `VariantPairing`, `SeriesIndex` |
//!
//! # Design Decisions
//!
//! ## Generated Index Instead of a Hand-Kept README
//!
//! The table of contents is computed from the tree on every run, so it
//! cannot drift from the files. `mdseries index` prints it as Markdown, one
//! language at a time.
//!
//! ## Variant Marker Is Configuration
//!
//! The translated-variant suffix is read from config or `--variant-suffix`
//! and passed down explicitly. No module hardcodes `_CN`.
//!
//! ## Findings Are Data, Not Errors
//!
//! Broken links, unpaired translations and orphans are collected into the
//! [`report::Report`]. Only a missing content root stops a run; a single
//! unreadable file is recorded and skipped so it never hides other findings.

pub mod config;
pub mod index;
pub mod links;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod scan;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
