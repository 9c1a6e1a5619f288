//! Tests for the JavaScript-facing API (run with `wasm-pack test`)
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;
mod fixtures;

use common::*;
use wasm_bindgen_test::*;
use xlunlock::{is_supported_file, unprotect_xlsx, unprotect_xlsx_with_options, version};

#[wasm_bindgen_test]
fn test_unprotect_xlsx() {
    let input = PackageBuilder::workbook()
        .sheet(SheetXml::new().protected(r#"sheet="1""#).build())
        .build();

    let out = unprotect_xlsx(&input, "Book1.xlsx").unwrap();
    assert!(out.changed());
    assert_eq!(out.file_name(), "Book1_unprotected.xlsx");
    assert_eq!(out.removed_count(), 1);
    assert_eq!(
        out.content_disposition(),
        "attachment; filename=Book1_unprotected.xlsx"
    );
    assert_eq!(protection_count(&out.bytes()), 0);
}

#[wasm_bindgen_test]
fn test_unprotect_xlsx_pass_through() {
    let input = PackageBuilder::workbook().sheet(SheetXml::new().build()).build();

    let out = unprotect_xlsx(&input, "Book1.xlsx").unwrap();
    assert!(!out.changed());
    assert_eq!(out.bytes(), input);
    assert_eq!(out.file_name(), "Book1.xlsx");
}

#[wasm_bindgen_test]
fn test_options_json() {
    let input = PackageBuilder::workbook()
        .sheet(SheetXml::new().protected(r#"sheet="1""#).build())
        .build();

    let out = unprotect_xlsx_with_options(&input, "a.xlsx", r#"{"sheetProtection":false}"#)
        .unwrap();
    assert!(!out.changed());

    assert!(unprotect_xlsx_with_options(&input, "a.xlsx", "not json").is_err());
}

#[wasm_bindgen_test]
fn test_errors_become_js_values() {
    assert!(unprotect_xlsx(b"not a zip", "Book1.xlsx").is_err());
}

#[wasm_bindgen_test]
fn test_helpers() {
    assert!(is_supported_file("Book1.XLSX"));
    assert!(!is_supported_file("Book1.csv"));
    assert!(!version().is_empty());
}
