//! Shared types passed between pipeline stages.
//!
//! All of these serialize into the JSON report, so field names are part of
//! the tool's machine-readable output.

use serde::Serialize;

/// Language variant of an article, inferred from the filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageVariant {
    Base,
    Cn,
}

impl LanguageVariant {
    pub fn label(self) -> &'static str {
        match self {
            LanguageVariant::Base => "base",
            LanguageVariant::Cn => "cn",
        }
    }

    /// The variant an article in this language pairs with.
    pub fn other(self) -> Self {
        match self {
            LanguageVariant::Base => LanguageVariant::Cn,
            LanguageVariant::Cn => LanguageVariant::Base,
        }
    }
}

/// One Markdown file in the content tree.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Root-relative path with `/` separators. Unique across a scan.
    pub path: String,
    /// First `# heading` in the file, or the file stem as fallback
    pub title: String,
    /// Immediate parent directory name; empty for files in the root
    pub series: String,
    pub language_variant: LanguageVariant,
    /// Numeric filename prefix, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    /// Raw link targets in reading order, external URLs excluded
    #[serde(skip)]
    pub outbound_links: Vec<String>,
}

impl Document {
    /// File name component of `path`.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory part of `path`, empty for root-level files.
    pub fn dir(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkStatus {
    Resolved,
    Broken,
}

/// A reference from one document to a path in the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub source_path: String,
    /// Target exactly as written in the document
    pub raw_target: String,
    /// Root-relative target after anchor stripping and `..` resolution
    pub resolved_path: String,
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PairingStatus {
    Paired,
    Unpaired,
}

/// Whether a document has its other-language counterpart next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantPairing {
    pub path: String,
    pub variant: LanguageVariant,
    /// Path the counterpart has (or would have) in the same directory
    pub counterpart: String,
    pub status: PairingStatus,
}

/// A file that was found but could not be decoded as text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// One series with its documents in table-of-contents order.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesIndex {
    /// Series (directory) name; empty for the content root
    pub name: String,
    pub documents: Vec<Document>,
}

impl SeriesIndex {
    /// Name for display: the root series has no directory name.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "(root)"
        } else {
            &self.name
        }
    }

    /// Documents of a single language, keeping index order.
    pub fn for_variant(&self, variant: LanguageVariant) -> impl Iterator<Item = &Document> {
        self.documents
            .iter()
            .filter(move |d| d.language_variant == variant)
    }
}
