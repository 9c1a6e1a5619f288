//! Common test utilities and assertion helpers.
//!
//! Helpers for inspecting output archives at the ZIP level (raw member
//! bytes, CRCs, compression) and at the XML level (protection elements).
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use std::io::{Cursor, Read};
use zip::{CompressionMethod, ZipArchive};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Archive Inspection
// ============================================================================

/// One member as stored: everything that must survive a pass-through copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMember {
    pub name: String,
    pub method: CompressionMethod,
    pub crc32: u32,
    pub raw: Vec<u8>,
}

/// All members in stored order, without decompressing.
#[must_use]
pub fn raw_members(data: &[u8]) -> Vec<RawMember> {
    let mut archive = ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    (0..archive.len())
        .map(|i| {
            let mut entry = archive.by_index_raw(i).unwrap();
            let mut raw = Vec::new();
            entry.read_to_end(&mut raw).unwrap();
            RawMember {
                name: entry.name().to_string(),
                method: entry.compression(),
                crc32: entry.crc32(),
                raw,
            }
        })
        .collect()
}

/// Member names in stored order.
#[must_use]
pub fn member_names(data: &[u8]) -> Vec<String> {
    raw_members(data).into_iter().map(|m| m.name).collect()
}

/// Decompressed content of one member.
#[must_use]
pub fn read_member(data: &[u8], name: &str) -> Vec<u8> {
    let mut archive = ZipArchive::new(Cursor::new(data)).expect("Failed to open ZIP archive");
    let mut entry = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing member {name}"));
    let mut out = Vec::new();
    entry.read_to_end(&mut out).unwrap();
    out
}

#[must_use]
pub fn read_member_string(data: &[u8], name: &str) -> String {
    String::from_utf8(read_member(data, name)).unwrap()
}

// ============================================================================
// XML Inspection
// ============================================================================

/// Count SpreadsheetML elements with the given local name.
#[must_use]
pub fn count_elements(xml: &str, local: &str) -> usize {
    let mut reader = NsReader::from_str(xml);
    let mut count = 0;
    loop {
        match reader.read_resolved_event().unwrap() {
            (ResolveResult::Bound(ns), Event::Start(e) | Event::Empty(e))
                if xlunlock::namespaces::is_spreadsheet_namespace(ns.as_ref())
                    && e.local_name().as_ref() == local.as_bytes() =>
            {
                count += 1;
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }
    count
}

/// Total protection elements across every worksheet and workbook member.
#[must_use]
pub fn protection_count(data: &[u8]) -> usize {
    member_names(data)
        .iter()
        .filter(|name| xlunlock::parts::classify(name).is_some())
        .map(|name| {
            let xml = read_member_string(data, name);
            count_elements(&xml, "sheetProtection") + count_elements(&xml, "workbookProtection")
        })
        .sum()
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert both archives list the same members in the same order, and that
/// every member not in `changed` is stored byte-identically.
pub fn assert_untouched_except(before: &[u8], after: &[u8], changed: &[&str]) {
    let before = raw_members(before);
    let after = raw_members(after);
    let names = |members: &[RawMember]| members.iter().map(|m| m.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&before), names(&after), "member order changed");

    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.method, new.method, "compression changed for {}", old.name);
        if !changed.contains(&old.name.as_str()) {
            assert_eq!(old.crc32, new.crc32, "crc changed for {}", old.name);
            assert_eq!(old.raw, new.raw, "stored bytes changed for {}", old.name);
        }
    }
}
