//! Report assembly and rendering.
//!
//! Stage 4 of the pipeline. Collects the findings of the earlier stages into
//! a [`Report`] and renders it as text, JSON, or a Markdown table of contents.
//!
//! # Text Format
//!
//! Information-first, like a content inventory: every section leads with a
//! count, entries lead with their identity, and paths follow as indented
//! context lines.
//!
//! ```text
//! Documents
//!     10 scanned, 1 skipped
//!     Skipped: csharp/99_Bad.md (not valid UTF-8 text)
//!
//! Broken links (1)
//!     csharp/02_Threading.md → 03_Async.md#await
//!         Resolved: csharp/03_Async.md
//!
//! Unpaired variants (1)
//!     design-patterns/02_Singleton_CN.md (cn, missing design-patterns/02_Singleton.md)
//!
//! Series
//! (root)
//!     001 Interview Notes
//!         Source: README.md
//! csharp
//!     001 OOP Basics
//!         Source: csharp/01_OOP_Basics.md
//! ```
//!
//! Every `format_*` function is pure and returns lines or a string; the
//! `print_*` wrappers write to stdout. Nothing in a report depends on time or
//! scheduling, so two runs over the same tree render byte-identical output.

use crate::scan::ScanOutcome;
use crate::types::{
    Document, LanguageVariant, Link, LinkStatus, PairingStatus, SeriesIndex, SkippedFile,
    VariantPairing,
};
use serde::Serialize;

/// How the run ended, and the process exit code for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// No broken links. Warnings may still be present.
    Clean,
    /// At least one broken link.
    BrokenLinks,
    /// The pipeline could not run (root missing, invalid config).
    Fatal,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Clean => 0,
            ExitStatus::BrokenLinks => 1,
            ExitStatus::Fatal => 2,
        }
    }
}

/// Everything a run found, ready to render.
#[derive(Debug, Serialize)]
pub struct Report {
    pub documents_scanned: usize,
    pub skipped: Vec<SkippedFile>,
    pub links_checked: usize,
    pub broken_links: Vec<Link>,
    pub paired_variants: usize,
    pub unpaired_variants: Vec<VariantPairing>,
    /// `None` when orphan reporting is switched off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphans: Option<Vec<String>>,
    pub series: Vec<SeriesEntry>,
}

/// One series in the report: name and ordered entries.
#[derive(Debug, Serialize)]
pub struct SeriesEntry {
    pub name: String,
    pub documents: Vec<IndexEntry>,
}

#[derive(Debug, Serialize)]
pub struct IndexEntry {
    pub path: String,
    pub title: String,
    pub variant: LanguageVariant,
}

impl Report {
    /// Assemble a report from the outputs of the scan, validate, and index stages.
    pub fn new(
        outcome: &ScanOutcome,
        links: &[Link],
        pairings: &[VariantPairing],
        orphans: Option<Vec<&Document>>,
        index: &[SeriesIndex],
    ) -> Self {
        Self {
            documents_scanned: outcome.documents.len(),
            skipped: outcome.skipped.clone(),
            links_checked: links.len(),
            broken_links: links
                .iter()
                .filter(|l| l.status == LinkStatus::Broken)
                .cloned()
                .collect(),
            paired_variants: pairings
                .iter()
                .filter(|p| p.status == PairingStatus::Paired)
                .count(),
            unpaired_variants: pairings
                .iter()
                .filter(|p| p.status == PairingStatus::Unpaired)
                .cloned()
                .collect(),
            orphans: orphans.map(|docs| docs.iter().map(|d| d.path.clone()).collect()),
            series: index
                .iter()
                .map(|s| SeriesEntry {
                    name: s.name.clone(),
                    documents: s
                        .documents
                        .iter()
                        .map(|d| IndexEntry {
                            path: d.path.clone(),
                            title: d.title.clone(),
                            variant: d.language_variant,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Broken links fail the run; unpaired variants and orphans never do.
    pub fn exit_status(&self) -> ExitStatus {
        if self.broken_links.is_empty() {
            ExitStatus::Clean
        } else {
            ExitStatus::BrokenLinks
        }
    }
}

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn series_display_name(name: &str) -> &str {
    if name.is_empty() { "(root)" } else { name }
}

/// Title line of an index entry; translated entries carry a variant tag.
fn entry_line(index: usize, entry: &IndexEntry) -> String {
    match entry.variant {
        LanguageVariant::Base => format!("{} {}", format_index(index), entry.title),
        variant => format!("{} {} [{}]", format_index(index), entry.title, variant.label()),
    }
}

// ============================================================================
// Text report
// ============================================================================

pub fn format_report(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Documents".to_string());
    lines.push(format!(
        "    {} scanned, {} skipped",
        report.documents_scanned,
        report.skipped.len()
    ));
    for skip in &report.skipped {
        lines.push(format!("    Skipped: {} ({})", skip.path, skip.reason));
    }

    lines.push(String::new());
    lines.push(format!("Broken links ({})", report.broken_links.len()));
    for link in &report.broken_links {
        lines.push(format!("    {} \u{2192} {}", link.source_path, link.raw_target));
        if link.resolved_path != link.raw_target {
            lines.push(format!("        Resolved: {}", link.resolved_path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Unpaired variants ({})",
        report.unpaired_variants.len()
    ));
    for pairing in &report.unpaired_variants {
        lines.push(format!(
            "    {} ({}, missing {})",
            pairing.path,
            pairing.variant.label(),
            pairing.counterpart
        ));
    }

    if let Some(orphans) = &report.orphans {
        lines.push(String::new());
        lines.push(format!("Orphans ({})", orphans.len()));
        for path in orphans {
            lines.push(format!("    {}", path));
        }
    }

    lines.push(String::new());
    lines.push("Series".to_string());
    for series in &report.series {
        lines.push(series_display_name(&series.name).to_string());
        for (i, entry) in series.documents.iter().enumerate() {
            lines.push(format!("    {}", entry_line(i + 1, entry)));
            lines.push(format!("        Source: {}", entry.path));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Checked {} links in {} documents: {} broken, {} unpaired, {} paired",
        report.links_checked,
        report.documents_scanned,
        report.broken_links.len(),
        report.unpaired_variants.len(),
        report.paired_variants
    ));

    lines
}

/// Print the text report to stdout.
pub fn print_report(report: &Report) {
    for line in format_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Markdown table of contents
// ============================================================================

/// Render the index for one language as a Markdown table of contents.
///
/// Root-level documents are listed first without a heading; every other
/// series gets a `##` section. Series with no document in `variant` are
/// left out.
pub fn format_markdown_index(index: &[SeriesIndex], variant: LanguageVariant) -> String {
    let mut sections: Vec<String> = Vec::new();

    for series in index {
        let items: Vec<String> = series
            .for_variant(variant)
            .map(|d| format!("- [{}]({})", escape_label(&d.title), link_destination(&d.path)))
            .collect();
        if items.is_empty() {
            continue;
        }
        let mut section = String::new();
        if !series.name.is_empty() {
            section.push_str(&format!("## {}\n\n", series.name));
        }
        section.push_str(&items.join("\n"));
        section.push('\n');
        sections.push(section);
    }

    sections.join("\n")
}

/// Print the Markdown index to stdout.
pub fn print_markdown_index(index: &[SeriesIndex], variant: LanguageVariant) {
    print!("{}", format_markdown_index(index, variant));
}

fn escape_label(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.chars() {
        if matches!(c, '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Paths with spaces or parentheses need the `<...>` destination form.
fn link_destination(path: &str) -> String {
    if path.contains([' ', '(', ')']) {
        format!("<{}>", path)
    } else {
        path.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
