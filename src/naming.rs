//! Centralized filename parsing for the `NN_Name` convention.
//!
//! Articles and series directories share one naming pattern: an optional
//! numeric prefix (`NN_` or `NN-`) followed by a name, and for articles an
//! optional language variant marker right before the extension:
//!
//! ```text
//! 01_Adapter_Pattern.md       number=1, base variant
//! 01_Adapter_Pattern_CN.md    number=1, translated variant (marker "_CN")
//! Glossary.md                 unnumbered, sorts after numbered entries
//! ```
//!
//! The variant marker is not hardcoded here; callers pass the configured
//! marker so the convention can change without touching the parser.

use crate::types::LanguageVariant;
use std::cmp::Ordering;

/// Result of parsing an entry name like `02_Design_Patterns`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `2` from `02_Design_Patterns`)
    pub number: Option<u32>,
    /// Raw name part after the prefix separator. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
    /// Display title: name with `_` and `-` converted to spaces.
    pub display_title: String,
}

/// Parse an entry name following the `NN_name` convention.
///
/// - `"02_Design_Patterns"` → number=Some(2), name="Design_Patterns", display_title="Design Patterns"
/// - `"010-intro"` → number=Some(10), name="intro"
/// - `"07"` → number=Some(7), name=""
/// - `"2fa_notes"` → number=None (digits must be followed by a separator)
/// - `"Glossary"` → number=None, name="Glossary"
pub fn parse_entry_name(name: &str) -> ParsedName {
    let digits = name.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let (prefix, rest) = name.split_at(digits);
        let raw = match rest.as_bytes().first() {
            None => Some(""),
            Some(b'_' | b'-') => Some(&rest[1..]),
            Some(_) => None,
        };
        if let (Some(raw), Ok(num)) = (raw, prefix.parse::<u32>()) {
            return ParsedName {
                number: Some(num),
                name: raw.to_string(),
                display_title: display_title(raw),
            };
        }
    }
    ParsedName {
        number: None,
        name: name.to_string(),
        display_title: display_title(name),
    }
}

fn display_title(raw: &str) -> String {
    raw.replace(['_', '-'], " ").trim().to_string()
}

/// Split a file stem into its base stem and language variant.
///
/// A stem is the translated variant iff it ends with `marker` and has
/// something in front of it: `"_CN"` alone is a base document named `_CN`.
pub fn split_variant<'a>(stem: &'a str, marker: &str) -> (&'a str, LanguageVariant) {
    match stem.strip_suffix(marker) {
        Some(base) if !marker.is_empty() && !base.is_empty() => (base, LanguageVariant::Cn),
        _ => (stem, LanguageVariant::Base),
    }
}

/// Sort key for entries ordered by numeric prefix.
///
/// Numbered entries come first in ascending numeric order, unnumbered
/// entries after them; ties are broken by the full name, lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    number: Option<u32>,
    name: String,
}

impl OrderKey {
    pub fn new(name: &str) -> Self {
        Self {
            number: parse_entry_name(name).number,
            name: name.to_string(),
        }
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_number = match (self.number, other.number) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_number.then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
