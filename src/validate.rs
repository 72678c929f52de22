//! Cross-reference validation.
//!
//! Stage 2 of the pipeline. Works entirely on scanned [`Document`]s; nothing
//! here touches the filesystem, so a link is Resolved only if the scan
//! recorded a document at exactly that path. A link to an existing file that
//! was skipped (unreadable) or is not a document (an image, a `.cs` file) is
//! therefore Broken.
//!
//! Three kinds of findings come out of this stage:
//!
//! | Finding | Severity | Affects exit code |
//! |---------|----------|-------------------|
//! | Broken link | error | yes |
//! | Unpaired variant | warning | no |
//! | Orphan document | info | no |

use crate::links;
use crate::naming;
use crate::types::{Document, LanguageVariant, Link, LinkStatus, PairingStatus, VariantPairing};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Resolve every outbound link of every document and mark its status.
///
/// Links come out grouped by source document, in reading order within each.
pub fn validate_links(documents: &[Document]) -> Vec<Link> {
    let known: HashSet<&str> = documents.iter().map(|d| d.path.as_str()).collect();
    let known = &known;

    documents
        .iter()
        .flat_map(|doc| {
            doc.outbound_links.iter().map(move |raw| {
                let resolved_path = links::resolve_target(&doc.path, raw);
                let status = if known.contains(resolved_path.as_str()) {
                    LinkStatus::Resolved
                } else {
                    LinkStatus::Broken
                };
                Link {
                    source_path: doc.path.clone(),
                    raw_target: raw.clone(),
                    resolved_path,
                    status,
                }
            })
        })
        .collect()
}

/// Check each document for its other-language counterpart in the same directory.
///
/// `01_Topic.md` pairs with `01_Topic<marker>.md` and vice versa. Documents
/// are matched on directory and base stem, so the extension may differ
/// (`01_Topic.MD` pairs with `01_Topic_CN.markdown`). When several files
/// qualify, the first by path is the counterpart. A missing counterpart is
/// Unpaired, which is a normal state for untranslated articles.
pub fn pair_variants(documents: &[Document], marker: &str) -> Vec<VariantPairing> {
    let mut by_stem: HashMap<PairingKey<'_>, &str> = HashMap::new();
    for doc in documents {
        by_stem
            .entry(pairing_key(doc, marker, doc.language_variant))
            .or_insert(doc.path.as_str());
    }

    documents
        .iter()
        .map(|doc| {
            let wanted = pairing_key(doc, marker, doc.language_variant.other());
            let (counterpart, status) = match by_stem.get(&wanted) {
                Some(path) => (path.to_string(), PairingStatus::Paired),
                None => (counterpart_path(doc, marker), PairingStatus::Unpaired),
            };
            VariantPairing {
                path: doc.path.clone(),
                variant: doc.language_variant,
                counterpart,
                status,
            }
        })
        .collect()
}

/// Directory, base stem, and variant.
type PairingKey<'a> = (&'a str, &'a str, LanguageVariant);

fn pairing_key<'a>(doc: &'a Document, marker: &str, variant: LanguageVariant) -> PairingKey<'a> {
    let file_name = doc.file_name();
    let stem = file_name.rsplit_once('.').map_or(file_name, |(stem, _)| stem);
    let (base, _) = naming::split_variant(stem, marker);
    (doc.dir(), base, variant)
}

/// Path the other-language version of `doc` would have with the same extension.
fn counterpart_path(doc: &Document, marker: &str) -> String {
    let file_name = doc.file_name();
    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (file_name, None),
    };
    let partner_stem = match doc.language_variant {
        LanguageVariant::Base => format!("{stem}{marker}"),
        LanguageVariant::Cn => naming::split_variant(stem, marker).0.to_string(),
    };
    let partner_name = match ext {
        Some(ext) => format!("{partner_stem}.{ext}"),
        None => partner_stem,
    };
    match doc.dir() {
        "" => partner_name,
        dir => format!("{dir}/{partner_name}"),
    }
}

/// Documents that no *other* document links to.
///
/// Self-links (`[top](#intro)`) do not count as inbound. Returned in path order.
pub fn find_orphans<'a>(documents: &'a [Document], links: &[Link]) -> Vec<&'a Document> {
    let linked: BTreeSet<&str> = links
        .iter()
        .filter(|l| l.status == LinkStatus::Resolved && l.resolved_path != l.source_path)
        .map(|l| l.resolved_path.as_str())
        .collect();

    documents
        .iter()
        .filter(|d| !linked.contains(d.path.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::doc;

    fn broken(links: &[Link]) -> Vec<(&str, &str)> {
        links
            .iter()
            .filter(|l| l.status == LinkStatus::Broken)
            .map(|l| (l.source_path.as_str(), l.raw_target.as_str()))
            .collect()
    }

    // =========================================================================
    // Link validation tests
    // =========================================================================

    #[test]
    fn parent_relative_link_resolves() {
        let docs = vec![
            doc("dir/x.md", &["../other/y.md"]),
            doc("other/y.md", &[]),
        ];
        let links = validate_links(&docs);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].resolved_path, "other/y.md");
        assert_eq!(links[0].status, LinkStatus::Resolved);
    }

    #[test]
    fn missing_target_is_broken() {
        let docs = vec![doc("dir/x.md", &["../other/y.md"])];
        let links = validate_links(&docs);
        assert_eq!(links[0].status, LinkStatus::Broken);
        assert_eq!(broken(&links), vec![("dir/x.md", "../other/y.md")]);
    }

    #[test]
    fn match_is_case_sensitive() {
        let docs = vec![doc("a/x.md", &["Y.md"]), doc("a/y.md", &[])];
        let links = validate_links(&docs);
        assert_eq!(links[0].status, LinkStatus::Broken);
    }

    #[test]
    fn anchor_only_link_always_resolves() {
        let docs = vec![doc("a/x.md", &["#intro", ""])];
        let links = validate_links(&docs);
        assert!(links.iter().all(|l| l.status == LinkStatus::Resolved));
        assert!(links.iter().all(|l| l.resolved_path == "a/x.md"));
    }

    #[test]
    fn anchor_on_existing_file_resolves() {
        let docs = vec![doc("a/x.md", &["y.md#missing-heading"]), doc("a/y.md", &[])];
        let links = validate_links(&docs);
        assert_eq!(links[0].status, LinkStatus::Resolved);
    }

    #[test]
    fn link_escaping_root_is_broken() {
        let docs = vec![doc("x.md", &["../x.md"])];
        let links = validate_links(&docs);
        assert_eq!(links[0].resolved_path, "../x.md");
        assert_eq!(links[0].status, LinkStatus::Broken);
    }

    #[test]
    fn links_keep_reading_order() {
        let docs = vec![doc("a.md", &["c.md", "b.md", "c.md"]), doc("b.md", &[])];
        let links = validate_links(&docs);
        let targets: Vec<&str> = links.iter().map(|l| l.raw_target.as_str()).collect();
        assert_eq!(targets, vec!["c.md", "b.md", "c.md"]);
    }

    // =========================================================================
    // Variant pairing tests
    // =========================================================================

    #[test]
    fn base_and_cn_are_paired() {
        let docs = vec![doc("s/01_Topic.md", &[]), doc("s/01_Topic_CN.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert!(pairings.iter().all(|p| p.status == PairingStatus::Paired));
        assert_eq!(pairings[0].counterpart, "s/01_Topic_CN.md");
        assert_eq!(pairings[1].counterpart, "s/01_Topic.md");
    }

    #[test]
    fn lone_cn_is_unpaired() {
        let docs = vec![doc("s/02_Other_CN.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert_eq!(pairings[0].status, PairingStatus::Unpaired);
        assert_eq!(pairings[0].variant, LanguageVariant::Cn);
        assert_eq!(pairings[0].counterpart, "s/02_Other.md");
    }

    #[test]
    fn lone_base_is_unpaired() {
        let docs = vec![doc("s/03_Solo.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert_eq!(pairings[0].status, PairingStatus::Unpaired);
        assert_eq!(pairings[0].counterpart, "s/03_Solo_CN.md");
    }

    #[test]
    fn counterpart_in_other_directory_does_not_pair() {
        let docs = vec![doc("a/01_Topic.md", &[]), doc("b/01_Topic_CN.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert!(pairings.iter().all(|p| p.status == PairingStatus::Unpaired));
    }

    #[test]
    fn extension_case_does_not_block_pairing() {
        let docs = vec![doc("s/01_A.MD", &[]), doc("s/01_A_CN.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert!(pairings.iter().all(|p| p.status == PairingStatus::Paired));
        assert_eq!(pairings[0].counterpart, "s/01_A_CN.md");
        assert_eq!(pairings[1].counterpart, "s/01_A.MD");
    }

    #[test]
    fn different_extensions_pair() {
        let docs = vec![doc("s/01_A.md", &[]), doc("s/01_A_CN.markdown", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert!(pairings.iter().all(|p| p.status == PairingStatus::Paired));
        assert_eq!(pairings[0].counterpart, "s/01_A_CN.markdown");
        assert_eq!(pairings[1].counterpart, "s/01_A.md");
    }

    #[test]
    fn root_level_pairing() {
        let docs = vec![doc("README.md", &[]), doc("README_CN.md", &[])];
        let pairings = pair_variants(&docs, "_CN");
        assert_eq!(pairings[0].counterpart, "README_CN.md");
        assert!(pairings.iter().all(|p| p.status == PairingStatus::Paired));
    }

    // =========================================================================
    // Orphan tests
    // =========================================================================

    #[test]
    fn unlinked_documents_are_orphans() {
        let docs = vec![
            doc("a.md", &["b.md", "#self"]),
            doc("b.md", &[]),
            doc("c.md", &["missing.md"]),
        ];
        let links = validate_links(&docs);
        let orphans: Vec<&str> = find_orphans(&docs, &links)
            .iter()
            .map(|d| d.path.as_str())
            .collect();
        assert_eq!(orphans, vec!["a.md", "c.md"]);
    }

    #[test]
    fn self_link_does_not_adopt() {
        let docs = vec![doc("a.md", &["a.md"])];
        let links = validate_links(&docs);
        assert_eq!(find_orphans(&docs, &links).len(), 1);
    }
}
