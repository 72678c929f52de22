//! Series index construction.
//!
//! Stage 3 of the pipeline. Groups documents by series and orders them the
//! way a hand-written table of contents would: by numeric filename prefix,
//! unnumbered articles last, ties by filename.
//!
//! The ordering is a pure function of the document paths. Scan order, thread
//! scheduling and filesystem listing order have no influence on the result.

use crate::naming::OrderKey;
use crate::types::{Document, SeriesIndex};
use std::collections::BTreeMap;

/// Build one [`SeriesIndex`] per distinct series.
///
/// The root series (files directly in the content root) comes first; the
/// other series follow in [`OrderKey`] order of their names.
pub fn build_index(documents: &[Document]) -> Vec<SeriesIndex> {
    let mut groups: BTreeMap<&str, Vec<Document>> = BTreeMap::new();
    for doc in documents {
        groups.entry(doc.series.as_str()).or_default().push(doc.clone());
    }

    let mut index: Vec<SeriesIndex> = groups
        .into_iter()
        .map(|(name, mut docs)| {
            docs.sort_by_cached_key(|d| OrderKey::new(d.file_name()));
            SeriesIndex {
                name: name.to_string(),
                documents: docs,
            }
        })
        .collect();

    index.sort_by_cached_key(|s| (!s.name.is_empty(), OrderKey::new(&s.name)));
    index
}
