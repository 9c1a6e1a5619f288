//! Shared XML attribute helpers.
//!
//! All functions handle namespace-prefixed attributes and UTF-8 conversion
//! safely; malformed attributes are skipped here because well-formedness is
//! enforced by the cleaner before any element reaches these helpers.

use quick_xml::events::BytesStart;

/// Extract a string attribute by local name (ignoring namespace prefix).
pub fn attr_string_local(e: &BytesStart, key: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == key {
            return std::str::from_utf8(&attr.value).ok().map(|s| s.to_string());
        }
    }
    None
}

/// Check whether any attribute with one of the given local names is present.
pub fn has_any_attr_local(e: &BytesStart, keys: &[&[u8]]) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| keys.contains(&attr.key.local_name().as_ref()))
}
