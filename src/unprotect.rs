//! Protection removal for a whole package.
//!
//! One call walks the archive once to clean every candidate part, then
//! either returns the input untouched or rebuilds the archive. Nothing is
//! shared between calls and nothing touches the filesystem, so concurrent
//! calls need no coordination.

use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::cleaner::{clean_part, CleanOutcome};
use crate::error::{Result, UnlockError};
use crate::export::save_archive;
use crate::naming::derive_output_name;
use crate::options::UnprotectOptions;
use crate::parts::classify;
use crate::protection::RemovedProtection;
use crate::types::{ChangeSet, UnprotectReport, Unprotected};

/// Remove all sheet and workbook protection from an XLSX package.
///
/// Returns the input bytes and `file_name` unchanged when nothing was
/// protected; otherwise a rebuilt archive named `<stem>_unprotected<ext>`.
///
/// # Errors
/// See [`remove_protection_with`].
pub fn remove_protection<'a>(data: &'a [u8], file_name: &str) -> Result<Unprotected<'a>> {
    remove_protection_with(data, file_name, &UnprotectOptions::default())
}

/// Remove protection as selected by `options`.
///
/// # Errors
/// - [`UnlockError::InvalidArchive`] if `data` is not a ZIP archive or a
///   candidate part cannot be extracted.
/// - [`UnlockError::MalformedXml`] if any candidate part is not well-formed.
/// - [`UnlockError::ArchiveWrite`] if rebuilding the archive fails.
///
/// Any error aborts the whole call; no partially cleaned archive is produced.
pub fn remove_protection_with<'a>(
    data: &'a [u8],
    file_name: &str,
    options: &UnprotectOptions,
) -> Result<Unprotected<'a>> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(UnlockError::invalid_archive)?;
    let targets = options.targets();

    let mut changes = ChangeSet::new();
    let mut report = UnprotectReport::default();

    for i in 0..archive.len() {
        let name = archive
            .by_index_raw(i)
            .map_err(UnlockError::invalid_archive)?
            .name()
            .to_string();
        let Some(kind) = classify(&name) else {
            continue;
        };

        let xml = read_member(&mut archive, i, &name)?;
        let outcome = clean_part(&xml, targets).map_err(|source| UnlockError::MalformedXml {
            part: name.clone(),
            source,
        })?;
        log::debug!("scanned {name} ({kind:?}): {} removed", outcome.removed().len());

        report.parts_scanned.push(name.clone());
        if let CleanOutcome::Cleaned { bytes, removed } = outcome {
            report
                .removed
                .extend(removed.into_iter().map(|e| RemovedProtection::new(&name, e)));
            report.changed_parts.push(name.clone());
            changes.insert(name, bytes);
        }
    }

    let bytes = save_archive(data, &changes)?;
    let file_name = if changes.is_empty() {
        log::info!(
            "{file_name}: no protection found in {} parts, returning input unchanged",
            report.parts_scanned.len()
        );
        file_name.to_string()
    } else {
        let output = derive_output_name(file_name, &options.output_suffix);
        log::info!(
            "{file_name}: removed {} protection elements from {} parts, wrote {output}",
            report.removed.len(),
            changes.len()
        );
        output
    };

    Ok(Unprotected {
        bytes,
        file_name,
        report,
    })
}

/// Decompress one candidate member.
fn read_member(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    index: usize,
    name: &str,
) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_index(index)
        .map_err(|e| UnlockError::unreadable_member(name, e))?;
    let mut xml = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
    entry
        .read_to_end(&mut xml)
        .map_err(|e| UnlockError::unreadable_member(name, e.into()))?;
    Ok(xml)
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
    use crate::error::ErrorKind;
    use crate::protection::ProtectionKind;
    use std::borrow::Cow;
    use std::io::Write;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const SHEET_LOCKED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/><sheetProtection sheet="1" password="CC1A"/></worksheet>"#;
    const SHEET_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData/></worksheet>"#;
    const WORKBOOK_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheets/></workbook>"#;
    const WORKBOOK_LOCKED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><workbookProtection lockStructure="1"/><sheets/></workbook>"#;

    fn package(members: &[(&str, &str)]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            let options =
                FileOptions::default().compression_method(zip::CompressionMethod::Deflated);
            for (name, content) in members {
                zip.start_file(*name, options).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_unprotected_input_is_borrowed() {
        let data = package(&[
            ("xl/workbook.xml", WORKBOOK_OPEN),
            ("xl/worksheets/sheet1.xml", SHEET_OPEN),
        ]);
        let result = remove_protection(&data, "Book1.xlsx").unwrap();

        assert!(!result.changed());
        assert!(matches!(result.bytes, Cow::Borrowed(_)));
        assert_eq!(result.bytes.as_ref(), data.as_slice());
        assert_eq!(result.file_name, "Book1.xlsx");
        assert_eq!(
            result.report.parts_scanned,
            vec!["xl/workbook.xml", "xl/worksheets/sheet1.xml"]
        );
    }

    #[test]
    fn test_protected_sheet_is_rewritten() {
        let data = package(&[
            ("xl/workbook.xml", WORKBOOK_OPEN),
            ("xl/worksheets/sheet1.xml", SHEET_LOCKED),
        ]);
        let result = remove_protection(&data, "Book1.xlsx").unwrap();

        assert!(result.changed());
        assert_eq!(result.file_name, "Book1_unprotected.xlsx");
        assert_eq!(result.report.changed_parts, vec!["xl/worksheets/sheet1.xml"]);
        assert_eq!(result.report.count(ProtectionKind::Sheet), 1);
        assert!(result.report.had_password());
    }

    #[test]
    fn test_disabled_kind_is_left_alone() {
        let data = package(&[
            ("xl/workbook.xml", WORKBOOK_LOCKED),
            ("xl/worksheets/sheet1.xml", SHEET_OPEN),
        ]);
        let options = UnprotectOptions {
            workbook_protection: false,
            ..UnprotectOptions::default()
        };
        let result = remove_protection_with(&data, "Book1.xlsx", &options).unwrap();
        assert!(!result.changed());
        assert_eq!(result.bytes.as_ref(), data.as_slice());
    }

    #[test]
    fn test_custom_suffix() {
        let data = package(&[("xl/workbook.xml", WORKBOOK_LOCKED)]);
        let options = UnprotectOptions {
            output_suffix: "-unlocked".to_string(),
            ..UnprotectOptions::default()
        };
        let result = remove_protection_with(&data, "budget.xlsm", &options).unwrap();
        assert_eq!(result.file_name, "budget-unlocked.xlsm");
    }

    #[test]
    fn test_not_a_zip() {
        let err = remove_protection(b"PK\x03\x04 truncated", "Book1.xlsx").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArchive);
    }

    #[test]
    fn test_malformed_part_names_member() {
        let data = package(&[
            ("xl/workbook.xml", WORKBOOK_LOCKED),
            ("xl/worksheets/sheet2.xml", "<worksheet><sheetData></worksheet>"),
        ]);
        let err = remove_protection(&data, "Book1.xlsx").unwrap_err();
        match err {
            UnlockError::MalformedXml { part, .. } => assert_eq!(part, "xl/worksheets/sheet2.xml"),
            other => panic!("expected MalformedXml, got {other:?}"),
        }
    }
}
