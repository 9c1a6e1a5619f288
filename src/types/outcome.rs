use serde::Serialize;
use std::borrow::Cow;

use crate::protection::{ProtectionKind, RemovedProtection};

/// What a protection-removal call looked at and what it removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnprotectReport {
    /// Candidate members that were parsed, in archive order.
    pub parts_scanned: Vec<String>,
    /// Every removed protection element.
    pub removed: Vec<RemovedProtection>,
    /// Members that were rewritten, in archive order.
    pub changed_parts: Vec<String>,
}

impl UnprotectReport {
    /// Number of removed elements of the given kind.
    #[must_use]
    pub fn count(&self, kind: ProtectionKind) -> usize {
        self.removed.iter().filter(|r| r.kind == kind).count()
    }

    /// Whether any removed element declared a password hash.
    #[must_use]
    pub fn had_password(&self) -> bool {
        self.removed.iter().any(|r| r.password_protected)
    }
}

/// Output of a protection-removal call.
///
/// On the pass-through path `bytes` borrows the caller's input, so the
/// output is the input by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unprotected<'a> {
    pub bytes: Cow<'a, [u8]>,
    pub file_name: String,
    pub report: UnprotectReport,
}

impl Unprotected<'_> {
    /// Whether the archive was rewritten.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.report.changed_parts.is_empty()
    }

    /// Take ownership of the output bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes.into_owned()
    }
}
