//! Per-call configuration.

use serde::{Deserialize, Serialize};

use crate::naming::DEFAULT_SUFFIX;
use crate::protection::ProtectionTargets;

/// Options for a protection-removal call.
///
/// Every field is optional in JSON; `{}` yields the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnprotectOptions {
    /// Remove `<sheetProtection>` from worksheet parts.
    pub sheet_protection: bool,
    /// Remove `<workbookProtection>` from the workbook part.
    pub workbook_protection: bool,
    /// Appended to the file stem of a rewritten workbook.
    pub output_suffix: String,
}

impl Default for UnprotectOptions {
    fn default() -> Self {
        Self {
            sheet_protection: true,
            workbook_protection: true,
            output_suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

impl UnprotectOptions {
    /// Parse options from JSON.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn targets(&self) -> ProtectionTargets {
        ProtectionTargets {
            sheet: self.sheet_protection,
            workbook: self.workbook_protection,
        }
    }
}
