//! Rebuild an OOXML ZIP archive with replacement member contents.
//!
//! Members are replayed in their stored order. Unchanged entries are copied
//! via `raw_copy_file` (no recompression, CRC and timestamps kept); only
//! members named in the change set are re-encoded.

use std::collections::HashSet;
use std::io::{Cursor, Write};
use zip::read::ZipFile;
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::error::{Result, UnlockError};
use crate::types::ChangeSet;

/// Rewrite `original_data`, substituting the members listed in `changes`.
///
/// # Errors
/// Returns [`UnlockError::ArchiveWrite`] if the original cannot be re-read,
/// a change names a member the archive does not contain, or writing fails.
pub(crate) fn rewrite_archive(original_data: &[u8], changes: &ChangeSet) -> Result<Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(original_data))
        .map_err(|e| UnlockError::archive_write(None, e))?;

    // Every replacement must land on an existing member
    {
        let members: HashSet<&str> = archive.file_names().collect();
        if let Some(missing) = changes.names().find(|name| !members.contains(name)) {
            return Err(UnlockError::archive_write(
                Some(missing),
                ZipError::FileNotFound,
            ));
        }
    }

    let buf: Vec<u8> = Vec::with_capacity(original_data.len());
    let mut writer = ZipWriter::new(Cursor::new(buf));

    let comment = archive.comment();
    if !comment.is_empty() {
        writer.set_comment(String::from_utf8_lossy(comment));
    }

    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| UnlockError::archive_write(None, e))?;
        let name = entry.name().to_string();

        match changes.get(&name) {
            Some(bytes) => {
                let options = replacement_options(&entry, bytes.len());
                drop(entry);
                writer
                    .start_file(name.as_str(), options)
                    .map_err(|e| UnlockError::archive_write(Some(&name), e))?;
                writer
                    .write_all(bytes)
                    .map_err(|e| UnlockError::archive_write(Some(&name), e.into()))?;
            }
            None => writer
                .raw_copy_file(entry)
                .map_err(|e| UnlockError::archive_write(Some(&name), e))?,
        }
    }

    let cursor = writer
        .finish()
        .map_err(|e| UnlockError::archive_write(None, e))?;
    Ok(cursor.into_inner())
}

/// Entry options for a replaced member, inherited from the source entry.
fn replacement_options(entry: &ZipFile<'_>, len: usize) -> FileOptions {
    let mut options = FileOptions::default()
        .compression_method(entry.compression())
        .last_modified_time(entry.last_modified())
        .large_file(u32::try_from(len).is_err());
    if let Some(mode) = entry.unix_mode() {
        options = options.unix_permissions(mode);
    }
    options
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
    use std::io::Read;
    use zip::CompressionMethod;

    fn build(members: &[(&str, &[u8], CompressionMethod)], comment: &str) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            for (name, data, method) in members {
                let options = FileOptions::default().compression_method(*method);
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            if !comment.is_empty() {
                zip.set_comment(comment);
            }
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    /// (name, compression, crc, raw stored bytes) for every member in order.
    fn raw_members(data: &[u8]) -> Vec<(String, CompressionMethod, u32, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut entry = archive.by_index_raw(i).unwrap();
                let mut raw = Vec::new();
                entry.read_to_end(&mut raw).unwrap();
                (entry.name().to_string(), entry.compression(), entry.crc32(), raw)
            })
            .collect()
    }

    fn read_member(data: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(data)).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut out = Vec::new();
        entry.read_to_end(&mut out).unwrap();
        out
    }

    fn sample() -> Vec<u8> {
        build(
            &[
                ("[Content_Types].xml", b"<Types/>".as_slice(), CompressionMethod::Deflated),
                (
                    "xl/workbook.xml",
                    b"<workbook><workbookProtection/></workbook>".as_slice(),
                    CompressionMethod::Deflated,
                ),
                (
                    "xl/media/image1.png",
                    [0x89, b'P', b'N', b'G', 0, 1, 2, 3].as_slice(),
                    CompressionMethod::Stored,
                ),
                ("xl/worksheets/sheet1.xml", b"<worksheet/>".as_slice(), CompressionMethod::Stored),
            ],
            "written by a test",
        )
    }

    #[test]
    fn test_replaces_only_changed_members() {
        let original = sample();
        let mut changes = ChangeSet::new();
        changes.insert("xl/workbook.xml", b"<workbook/>".to_vec());

        let rewritten = rewrite_archive(&original, &changes).unwrap();

        let before = raw_members(&original);
        let after = raw_members(&rewritten);
        assert_eq!(before.len(), after.len());
        for (old, new) in before.iter().zip(&after) {
            assert_eq!(old.0, new.0, "member order must be preserved");
            assert_eq!(old.1, new.1, "compression must be preserved for {}", old.0);
            if old.0 != "xl/workbook.xml" {
                assert_eq!(old.2, new.2, "crc changed for {}", old.0);
                assert_eq!(old.3, new.3, "raw bytes changed for {}", old.0);
            }
        }
        assert_eq!(read_member(&rewritten, "xl/workbook.xml"), b"<workbook/>");
    }

    #[test]
    fn test_keeps_stored_compression_for_replacement() {
        let original = sample();
        let mut changes = ChangeSet::new();
        changes.insert("xl/worksheets/sheet1.xml", b"<worksheet><sheetData/></worksheet>".to_vec());

        let rewritten = rewrite_archive(&original, &changes).unwrap();
        let after = raw_members(&rewritten);
        let sheet = after.iter().find(|m| m.0 == "xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(sheet.1, CompressionMethod::Stored);
        assert_eq!(sheet.3, b"<worksheet><sheetData/></worksheet>");
    }

    #[test]
    fn test_carries_archive_comment() {
        let original = sample();
        let mut changes = ChangeSet::new();
        changes.insert("xl/workbook.xml", b"<workbook/>".to_vec());

        let rewritten = rewrite_archive(&original, &changes).unwrap();
        let archive = ZipArchive::new(Cursor::new(rewritten.as_slice())).unwrap();
        assert_eq!(archive.comment(), b"written by a test");
    }

    #[test]
    fn test_unknown_member_is_write_error() {
        let original = sample();
        let mut changes = ChangeSet::new();
        changes.insert("xl/worksheets/sheet9.xml", b"<worksheet/>".to_vec());

        let err = rewrite_archive(&original, &changes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveWrite);
        assert!(err.to_string().contains("xl/worksheets/sheet9.xml"));
    }

    #[test]
    fn test_unreadable_original_is_write_error() {
        let mut changes = ChangeSet::new();
        changes.insert("xl/workbook.xml", b"<workbook/>".to_vec());

        let err = rewrite_archive(b"definitely not a zip", &changes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveWrite);
    }

    #[test]
    fn test_unreadable_entry_is_write_error() {
        let mut original = sample();
        // Break the local header of the last member, the central directory stays valid
        let name = b"xl/worksheets/sheet1.xml";
        let at = original
            .windows(name.len())
            .position(|w| w == name)
            .unwrap()
            - 30;
        assert_eq!(&original[at..at + 4], b"PK\x03\x04");
        original[at..at + 4].fill(0);
        assert!(ZipArchive::new(Cursor::new(original.as_slice())).is_ok());

        let mut changes = ChangeSet::new();
        changes.insert("xl/workbook.xml", b"<workbook/>".to_vec());

        let err = rewrite_archive(&original, &changes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveWrite);
    }
}
