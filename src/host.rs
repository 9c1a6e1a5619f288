//! Helpers for hosts that accept uploads and send back the result.
//!
//! These cover the request plumbing around the core call: which file names
//! to accept and how to label the response.

/// File extensions accepted for upload.
///
/// `.xls` is accepted here, but a legacy binary workbook is not a ZIP
/// archive, so the core call rejects it with an invalid-archive error.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".xlsx", ".xlsm", ".xls"];

/// Response content type for the output workbook.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Custom response header carrying the output file name.
pub const FILENAME_HEADER: &str = "x-filename";

/// Whether `file_name` ends with a supported extension (ASCII case-insensitive).
#[must_use]
pub fn is_supported_file_name(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// `Content-Disposition` value offering `file_name` as a download.
///
/// The name is quoted when it contains whitespace, `;` or `"`.
#[must_use]
pub fn content_disposition(file_name: &str) -> String {
    let needs_quotes = file_name
        .chars()
        .any(|c| c.is_whitespace() || c == ';' || c == '"');
    if !needs_quotes {
        return format!("attachment; filename={file_name}");
    }

    let mut quoted = String::with_capacity(file_name.len() + 2);
    for c in file_name.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!("attachment; filename=\"{quoted}\"")
}
