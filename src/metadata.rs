//! Metadata extraction from parsed documents
//!
//! Pulls `<meta>` name/content pairs into a flat map. Keys are case
//! sensitive; the key is the first non-empty of the `name`, `property`, and
//! `http-equiv` attributes, in that order.

use scraper::Html;
use std::collections::BTreeMap;

/// Flat metadata mapping extracted from a document
pub type MetadataMap = BTreeMap<String, String>;

const KEY_ATTRIBUTES: [&str; 3] = ["name", "property", "http-equiv"];

/// Extract metadata from a parsed document or fragment.
///
/// Meta tags missing a usable key or missing `content` entirely are skipped.
/// A later tag repeating a key replaces the earlier value; precedence across
/// documents is handled separately by [`merge_missing`].
pub fn extract_metadata(document: &Html) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    for node in document.tree.root().descendants() {
        let Some(element) = node.value().as_element() else {
            continue;
        };
        if element.name() != "meta" {
            continue;
        }

        let key = KEY_ATTRIBUTES
            .iter()
            .find_map(|attr| element.attr(attr).filter(|value| !value.is_empty()));
        let (Some(key), Some(content)) = (key, element.attr("content")) else {
            continue;
        };
        metadata.insert(key.to_string(), content.to_string());
    }
    metadata
}

/// Merge `incoming` into `target`, never overwriting an existing key.
pub fn merge_missing(target: &mut MetadataMap, incoming: MetadataMap) {
    for (key, value) in incoming {
        target.entry(key).or_insert(value);
    }
}
