//! XML namespace constants for SpreadsheetML parts
//!
//! Protection elements are matched by resolved namespace, not by prefix: a
//! part may bind SpreadsheetML as the default namespace (`<worksheet xmlns=...>`)
//! or under any prefix (`<x:worksheet xmlns:x=...>`), and both the
//! Transitional and Strict conformance URIs occur in the wild.

use quick_xml::name::{Namespace, ResolveResult};

/// Main spreadsheet namespace (Transitional conformance)
pub const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Strict OOXML spreadsheet namespace (Office 2013+ Strict conformance)
pub const NS_SPREADSHEET_STRICT: &str = "http://purl.oclc.org/ooxml/spreadsheetml/main";

/// Check whether a namespace URI is SpreadsheetML (either conformance class).
#[inline]
pub fn is_spreadsheet_namespace(uri: &[u8]) -> bool {
    uri == NS_SPREADSHEET.as_bytes() || uri == NS_SPREADSHEET_STRICT.as_bytes()
}

/// Check whether a resolved element name is bound to SpreadsheetML.
#[inline]
pub fn is_spreadsheet_element(resolved: &ResolveResult<'_>) -> bool {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => is_spreadsheet_namespace(uri),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_matching() {
        assert!(is_spreadsheet_namespace(NS_SPREADSHEET.as_bytes()));
        assert!(is_spreadsheet_namespace(NS_SPREADSHEET_STRICT.as_bytes()));
        assert!(!is_spreadsheet_namespace(
            b"http://schemas.openxmlformats.org/package/2006/relationships"
        ));
        // No substring matching: a look-alike URI is a different namespace
        assert!(!is_spreadsheet_namespace(
            b"http://schemas.openxmlformats.org/spreadsheetml/2006/main/extra"
        ));
    }

    #[test]
    fn test_resolved_element_matching() {
        let bound = ResolveResult::Bound(Namespace(NS_SPREADSHEET.as_bytes()));
        assert!(is_spreadsheet_element(&bound));
        assert!(!is_spreadsheet_element(&ResolveResult::Unbound));
        assert!(!is_spreadsheet_element(&ResolveResult::Unknown(
            b"x".to_vec()
        )));
    }
}
