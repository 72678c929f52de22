//! Link extraction and relative path resolution.
//!
//! Links are found with `pulldown-cmark` rather than by scanning for
//! `[label](target)` text, so bracket pairs inside code blocks and code spans
//! (common in articles that embed sample code) are never mistaken for links.
//!
//! Resolution works on root-relative `/`-separated strings, not on
//! filesystem paths: the result is compared against document paths recorded
//! at scan time and never touches the disk.
//!
//! ```text
//! source: patterns/01_Adapter.md
//! [Bridge](02_Bridge.md)              → patterns/02_Bridge.md
//! [SQL](../databases/01_Joins.md#inner) → databases/01_Joins.md
//! [top](#overview)                    → patterns/01_Adapter.md (self)
//! [site](https://example.com)         → not extracted
//! ```

use pulldown_cmark::{Event, LinkType, Parser, Tag};

/// Extract link destinations from Markdown text, in reading order.
///
/// Inline and reference-style links are returned; autolinks, email links and
/// images are not. Targets with a URL scheme are dropped.
pub fn extract_links(text: &str) -> Vec<String> {
    Parser::new(text)
        .filter_map(|event| match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) if is_document_link(link_type) => Some(dest_url.into_string()),
            _ => None,
        })
        .filter(|target| !is_external(target))
        .collect()
}

fn is_document_link(link_type: LinkType) -> bool {
    matches!(
        link_type,
        LinkType::Inline | LinkType::Reference | LinkType::Collapsed | LinkType::Shortcut
    )
}

/// True for targets that point outside the content tree.
///
/// That is anything with a URI scheme (`https:`, `mailto:`, `ftp:`) or a
/// protocol-relative `//host/...` target.
pub fn is_external(target: &str) -> bool {
    target.starts_with("//") || has_uri_scheme(target)
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`, then `:`.
fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Resolve a link target written in `source_path` to a root-relative path.
///
/// The anchor (`#...`) and query (`?...`) are stripped first. An empty
/// remainder means the link points at the source document itself. A leading
/// `/` is relative to the content root. `..` segments that climb above the
/// root are kept, which guarantees the result matches no document.
pub fn resolve_target(source_path: &str, target: &str) -> String {
    let path_part = strip_fragment(target.trim());
    if path_part.is_empty() {
        return source_path.to_string();
    }
    let decoded = percent_decode(path_part);

    let mut segments: Vec<&str> = Vec::new();
    if !decoded.starts_with('/')
        && let Some((dir, _)) = source_path.rsplit_once('/')
    {
        segments.extend(dir.split('/'));
    }
    let mut escaped = 0usize;
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    escaped += 1;
                }
            }
            other => segments.push(other),
        }
    }

    let mut resolved = vec![".."; escaped];
    resolved.extend(segments);
    resolved.join("/")
}

fn strip_fragment(target: &str) -> &str {
    let end = target.find(['#', '?']).unwrap_or(target.len());
    &target[..end]
}

/// Decode `%XX` escapes; input that does not decode to UTF-8 is returned as is.
fn percent_decode(input: &str) -> String {
    if !input.contains('%') {
        return input.to_string();
    }
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = input.get(i + 1..i + 3)
            && hex.bytes().all(|b| b.is_ascii_hexdigit())
            && let Ok(byte) = u8::from_str_radix(hex, 16)
        {
            out.push(byte);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| input.to_string())
}
