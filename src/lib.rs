//! xlunlock - remove sheet and workbook protection from XLSX files
//!
//! Strips `<sheetProtection>` and `<workbookProtection>` declarations from an
//! Office Open XML package and hands back an archive that differs from the
//! input only in the parts that carried them:
//! - Member order, names and compression are kept
//! - Untouched members are copied without recompression
//! - Unprotected input comes back byte-for-byte, under its original name
//!
//! # Usage (Rust)
//!
//! ```no_run
//! let data = std::fs::read("Book1.xlsx")?;
//! let result = xlunlock::remove_protection(&data, "Book1.xlsx")?;
//! if result.changed() {
//!     std::fs::write(&result.file_name, &result.bytes)?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { unprotect_xlsx } from 'xlunlock';
//! await init();
//! const out = unprotect_xlsx(new Uint8Array(buffer), file.name);
//! download(out.bytes, out.fileName);
//! ```

pub mod cleaner;
pub mod error;
pub mod host;
pub mod namespaces;
pub mod naming;
pub mod options;
pub mod parts;
pub mod protection;
pub mod types;
pub mod unprotect;
pub mod xml_helpers;

mod export;

use wasm_bindgen::prelude::*;

pub use error::{ErrorKind, Result, UnlockError, XmlError};
pub use options::UnprotectOptions;
pub use protection::{ProtectionKind, RemovedProtection};
pub use types::*;
pub use unprotect::{remove_protection, remove_protection_with};

/// Result of [`unprotect_xlsx`], as seen from JavaScript.
#[wasm_bindgen]
pub struct UnprotectedFile {
    bytes: Vec<u8>,
    file_name: String,
    report: UnprotectReport,
}

#[wasm_bindgen]
impl UnprotectedFile {
    /// Output workbook bytes (the input itself when nothing changed).
    #[must_use]
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    #[must_use]
    #[wasm_bindgen(getter, js_name = fileName)]
    pub fn file_name(&self) -> String {
        self.file_name.clone()
    }

    #[must_use]
    #[wasm_bindgen(getter)]
    pub fn changed(&self) -> bool {
        !self.report.changed_parts.is_empty()
    }

    #[must_use]
    #[wasm_bindgen(getter, js_name = contentType)]
    pub fn content_type(&self) -> String {
        host::XLSX_CONTENT_TYPE.to_string()
    }

    #[must_use]
    #[wasm_bindgen(getter, js_name = contentDisposition)]
    pub fn content_disposition(&self) -> String {
        host::content_disposition(&self.file_name)
    }

    #[must_use]
    #[wasm_bindgen(getter, js_name = removedCount)]
    pub fn removed_count(&self) -> usize {
        self.report.removed.len()
    }

    /// The full report as a plain JS object.
    ///
    /// # Errors
    /// Returns an error if the report cannot be converted.
    #[wasm_bindgen(getter)]
    pub fn report(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.report)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

impl From<Unprotected<'_>> for UnprotectedFile {
    fn from(result: Unprotected<'_>) -> Self {
        Self {
            bytes: result.bytes.into_owned(),
            file_name: result.file_name,
            report: result.report,
        }
    }
}

/// Remove all sheet and workbook protection from an XLSX file.
///
/// # Errors
/// Returns an error if the file is not a ZIP archive, a worksheet or
/// workbook part is malformed, or the output cannot be written.
#[wasm_bindgen]
pub fn unprotect_xlsx(
    data: &[u8],
    file_name: &str,
) -> std::result::Result<UnprotectedFile, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    remove_protection(data, file_name)
        .map(UnprotectedFile::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Like [`unprotect_xlsx`], with options given as JSON
/// (`{"sheetProtection": true, "workbookProtection": false, "outputSuffix": "_open"}`).
///
/// # Errors
/// Returns an error for invalid options JSON or any [`unprotect_xlsx`] failure.
#[wasm_bindgen]
pub fn unprotect_xlsx_with_options(
    data: &[u8],
    file_name: &str,
    options_json: &str,
) -> std::result::Result<UnprotectedFile, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let options = UnprotectOptions::from_json(options_json)
        .map_err(|e| JsValue::from_str(&format!("invalid options: {e}")))?;
    remove_protection_with(data, file_name, &options)
        .map(UnprotectedFile::from)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether an upload with this name should be accepted.
#[must_use]
#[wasm_bindgen]
pub fn is_supported_file(file_name: &str) -> bool {
    host::is_supported_file_name(file_name)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
