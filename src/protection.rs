//! Sheet and workbook protection declarations
//!
//! SpreadsheetML declares editing locks with two elements:
//!
//! ```xml
//! <!-- in xl/worksheets/sheetN.xml -->
//! <sheetProtection sheet="1" objects="1" scenarios="1"
//!     algorithmName="SHA-512" hashValue="..." saltValue="..." spinCount="100000"/>
//!
//! <!-- in xl/workbook.xml -->
//! <workbookProtection lockStructure="1" workbookPassword="CC1A"/>
//! ```
//!
//! Neither element encrypts anything; removing it is enough to unlock the
//! sheet or workbook structure.

use quick_xml::events::BytesStart;
use serde::Serialize;

use crate::xml_helpers::{attr_string_local, has_any_attr_local};

/// Attributes that carry a password hash (legacy 16-bit or modern SHA-based).
const PASSWORD_ATTRS: &[&[u8]] = &[
    b"password",
    b"hashValue",
    b"workbookPassword",
    b"workbookHashValue",
    b"revisionsPassword",
    b"revisionsHashValue",
];

/// Which protection declaration an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProtectionKind {
    /// `<sheetProtection>` in a worksheet part
    Sheet,
    /// `<workbookProtection>` in the workbook part
    Workbook,
}

impl ProtectionKind {
    /// Local element name in the SpreadsheetML namespace.
    #[must_use]
    pub fn element_name(self) -> &'static str {
        match self {
            Self::Sheet => "sheetProtection",
            Self::Workbook => "workbookProtection",
        }
    }

    /// Map an element local name to a protection kind.
    #[must_use]
    pub fn from_local_name(local: &[u8]) -> Option<Self> {
        match local {
            b"sheetProtection" => Some(Self::Sheet),
            b"workbookProtection" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// The set of protection kinds a cleaning pass removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtectionTargets {
    pub sheet: bool,
    pub workbook: bool,
}

impl ProtectionTargets {
    /// Remove every kind of protection.
    pub const ALL: Self = Self {
        sheet: true,
        workbook: true,
    };

    #[must_use]
    pub fn includes(self, kind: ProtectionKind) -> bool {
        match kind {
            ProtectionKind::Sheet => self.sheet,
            ProtectionKind::Workbook => self.workbook,
        }
    }
}

impl Default for ProtectionTargets {
    fn default() -> Self {
        Self::ALL
    }
}

/// A protection element found (and dropped) while cleaning one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionElement {
    pub kind: ProtectionKind,
    /// The element declared a password hash.
    pub password_protected: bool,
    /// Hash algorithm for modern (SHA-based) protection, e.g. `SHA-512`.
    pub algorithm: Option<String>,
}

impl ProtectionElement {
    /// Describe a protection element from its start tag.
    pub fn from_start(kind: ProtectionKind, e: &BytesStart) -> Self {
        Self {
            kind,
            password_protected: has_any_attr_local(e, PASSWORD_ATTRS),
            algorithm: attr_string_local(e, b"algorithmName")
                .or_else(|| attr_string_local(e, b"workbookAlgorithmName")),
        }
    }
}

/// A protection element removed from a named archive member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedProtection {
    /// Archive member the element was removed from
    pub part: String,
    pub kind: ProtectionKind,
    pub password_protected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

impl RemovedProtection {
    pub fn new(part: &str, element: ProtectionElement) -> Self {
        Self {
            part: part.to_string(),
            kind: element.kind,
            password_protected: element.password_protected,
            algorithm: element.algorithm,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn describe(xml: &str) -> ProtectionElement {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        if let Ok(Event::Empty(e)) = reader.read_event() {
            let kind = ProtectionKind::from_local_name(e.local_name().as_ref())
                .expect("protection element");
            ProtectionElement::from_start(kind, &e)
        } else {
            panic!("Expected Empty event");
        }
    }

    #[test]
    fn test_kind_from_local_name() {
        assert_eq!(
            ProtectionKind::from_local_name(b"sheetProtection"),
            Some(ProtectionKind::Sheet)
        );
        assert_eq!(
            ProtectionKind::from_local_name(b"workbookProtection"),
            Some(ProtectionKind::Workbook)
        );
        assert_eq!(ProtectionKind::from_local_name(b"protection"), None);
        assert_eq!(ProtectionKind::from_local_name(b"protectedRanges"), None);
    }

    #[test]
    fn test_element_name_roundtrip() {
        for kind in [ProtectionKind::Sheet, ProtectionKind::Workbook] {
            assert_eq!(
                ProtectionKind::from_local_name(kind.element_name().as_bytes()),
                Some(kind)
            );
        }
    }

    #[test]
    fn test_sheet_protection_without_password() {
        let element = describe(r#"<sheetProtection sheet="1" objects="1" scenarios="1"/>"#);
        assert_eq!(element.kind, ProtectionKind::Sheet);
        assert!(!element.password_protected);
        assert_eq!(element.algorithm, None);
    }

    #[test]
    fn test_sheet_protection_legacy_password() {
        let element = describe(r#"<sheetProtection sheet="1" password="CC1A"/>"#);
        assert!(element.password_protected);
        assert_eq!(element.algorithm, None);
    }

    #[test]
    fn test_sheet_protection_modern_hash() {
        let element = describe(
            r#"<sheetProtection algorithmName="SHA-512" hashValue="abc123" saltValue="c2FsdA==" spinCount="100000" sheet="1"/>"#,
        );
        assert!(element.password_protected);
        assert_eq!(element.algorithm.as_deref(), Some("SHA-512"));
    }

    #[test]
    fn test_workbook_protection_hash() {
        let element = describe(
            r#"<workbookProtection workbookAlgorithmName="SHA-512" workbookHashValue="xyz" lockStructure="1"/>"#,
        );
        assert_eq!(element.kind, ProtectionKind::Workbook);
        assert!(element.password_protected);
        assert_eq!(element.algorithm.as_deref(), Some("SHA-512"));
    }

    #[test]
    fn test_targets() {
        let all = ProtectionTargets::default();
        assert!(all.includes(ProtectionKind::Sheet));
        assert!(all.includes(ProtectionKind::Workbook));

        let sheets_only = ProtectionTargets {
            sheet: true,
            workbook: false,
        };
        assert!(sheets_only.includes(ProtectionKind::Sheet));
        assert!(!sheets_only.includes(ProtectionKind::Workbook));

        let none = ProtectionTargets {
            sheet: false,
            workbook: false,
        };
        assert!(!none.includes(ProtectionKind::Sheet));
        assert!(!none.includes(ProtectionKind::Workbook));
    }
}
