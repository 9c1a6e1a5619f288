//! Test fixtures for generating XLSX packages in memory.
//!
//! Packages are assembled member by member so tests control order,
//! compression method and content exactly.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{PackageBuilder, SheetXml};
//!
//! let xlsx = PackageBuilder::workbook()
//!     .sheet(SheetXml::new().protected(r#"sheet="1" password="CC1A""#).build())
//!     .sheet(SheetXml::new().build())
//!     .build();
//!
//! let result = xlunlock::remove_protection(&xlsx, "Book1.xlsx").unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

pub const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub const NS_STRICT: &str = "http://purl.oclc.org/ooxml/spreadsheetml/main";
pub const NS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Fake PNG payload: incompressible enough that Stored is realistic.
pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
    b'R', 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89,
];

// ============================================================================
// Sheet XML Builder
// ============================================================================

/// Builder for a worksheet part.
#[derive(Debug, Clone, Default)]
pub struct SheetXml {
    rows: Vec<String>,
    protection: Option<String>,
    strict: bool,
}

impl SheetXml {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an inline-string cell row.
    #[must_use]
    pub fn row(mut self, r: u32, cell: &str, text: &str) -> Self {
        self.rows.push(format!(
            r#"<row r="{r}"><c r="{cell}" t="inlineStr"><is><t>{text}</t></is></c></row>"#
        ));
        self
    }

    /// Add `<sheetProtection {attrs}/>` after `<sheetData>`.
    #[must_use]
    pub fn protected(mut self, attrs: &str) -> Self {
        self.protection = Some(attrs.to_string());
        self
    }

    /// Use the strict SpreadsheetML namespace.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        let ns = if self.strict { NS_STRICT } else { NS_MAIN };
        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
             <worksheet xmlns=\"{ns}\" xmlns:r=\"{NS_REL}\">\
             <dimension ref=\"A1\"/><sheetData>"
        );
        for row in &self.rows {
            xml.push_str(row);
        }
        xml.push_str("</sheetData>");
        if let Some(attrs) = &self.protection {
            xml.push_str(&format!("<sheetProtection {attrs}/>"));
        }
        xml.push_str("<pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>");
        xml.push_str("</worksheet>");
        xml
    }
}

/// Workbook part with `count` sheets and optional `<workbookProtection>`.
#[must_use]
pub fn workbook_xml(count: usize, protection: Option<&str>) -> String {
    let mut xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n\
         <workbook xmlns=\"{NS_MAIN}\" xmlns:r=\"{NS_REL}\">"
    );
    if let Some(attrs) = protection {
        xml.push_str(&format!("<workbookProtection {attrs}/>"));
    }
    xml.push_str("<sheets>");
    for i in 1..=count {
        xml.push_str(&format!(
            r#"<sheet name="Sheet{i}" sheetId="{i}" r:id="rId{i}"/>"#
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

// ============================================================================
// Package Builder
// ============================================================================

#[derive(Debug, Clone)]
struct Member {
    name: String,
    data: Vec<u8>,
    method: CompressionMethod,
}

/// Builder for a ZIP package with explicit member order.
#[derive(Debug, Clone, Default)]
pub struct PackageBuilder {
    members: Vec<Member>,
    sheets: usize,
    comment: Option<String>,
}

impl PackageBuilder {
    /// Empty archive, no members.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimal workbook skeleton: content types, package rels, styles and
    /// an unprotected `xl/workbook.xml`. Sheets are added with [`Self::sheet`].
    #[must_use]
    pub fn workbook() -> Self {
        Self::new()
            .member("[Content_Types].xml", CONTENT_TYPES.as_bytes(), CompressionMethod::Deflated)
            .member("_rels/.rels", ROOT_RELS.as_bytes(), CompressionMethod::Deflated)
            .member("xl/workbook.xml", workbook_xml(0, None).as_bytes(), CompressionMethod::Deflated)
            .member("xl/styles.xml", STYLES.as_bytes(), CompressionMethod::Deflated)
    }

    /// Append a raw member.
    #[must_use]
    pub fn member(mut self, name: &str, data: &[u8], method: CompressionMethod) -> Self {
        self.members.push(Member {
            name: name.to_string(),
            data: data.to_vec(),
            method,
        });
        self
    }

    /// Append `xl/worksheets/sheetN.xml` (deflated).
    #[must_use]
    pub fn sheet(mut self, xml: String) -> Self {
        self.sheets += 1;
        let name = format!("xl/worksheets/sheet{}.xml", self.sheets);
        self.member(&name, xml.as_bytes(), CompressionMethod::Deflated)
    }

    /// Replace the content of an existing member, keeping its position.
    #[must_use]
    pub fn replace(mut self, name: &str, data: &[u8]) -> Self {
        let member = self
            .members
            .iter_mut()
            .find(|m| m.name == name)
            .unwrap_or_else(|| panic!("no member {name}"));
        member.data = data.to_vec();
        self
    }

    /// Append a stored PNG under `xl/media/`.
    #[must_use]
    pub fn image(self, name: &str) -> Self {
        self.member(&format!("xl/media/{name}"), PNG_BYTES, CompressionMethod::Stored)
    }

    #[must_use]
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    #[must_use]
    pub fn build(&self) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut buf);
            let mtime = DateTime::from_date_and_time(2024, 3, 15, 10, 30, 0).unwrap();
            for member in &self.members {
                let options = FileOptions::default()
                    .compression_method(member.method)
                    .last_modified_time(mtime);
                zip.start_file(member.name.as_str(), options).unwrap();
                zip.write_all(&member.data).unwrap();
            }
            if let Some(comment) = &self.comment {
                zip.set_comment(comment.as_str());
            }
            zip.finish().unwrap();
        }
        buf.into_inner()
    }
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><cellXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"><protection locked="0"/></xf></cellXfs></styleSheet>"#;
