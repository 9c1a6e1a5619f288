//! XML part cleaner
//!
//! Streams one worksheet or workbook part through quick-xml, dropping every
//! SpreadsheetML `sheetProtection` / `workbookProtection` element (with its
//! whole subtree) and copying all other events verbatim.
//!
//! The cleaner never decides what the caller writes back: an unchanged part
//! is reported as [`CleanOutcome::Unchanged`] without bytes, so untouched
//! members keep their original encoding down to the last byte.

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::{NsReader, Writer};

use crate::error::XmlError;
use crate::namespaces::is_spreadsheet_element;
use crate::protection::{ProtectionElement, ProtectionKind, ProtectionTargets};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Result of cleaning one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Nothing was removed; the caller must keep the original bytes.
    Unchanged,
    /// At least one protection element was removed.
    Cleaned {
        /// Re-serialized part, UTF-8 with an explicit XML declaration.
        bytes: Vec<u8>,
        removed: Vec<ProtectionElement>,
    },
}

impl CleanOutcome {
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Cleaned { .. })
    }

    #[must_use]
    pub fn removed(&self) -> &[ProtectionElement] {
        match self {
            Self::Unchanged => &[],
            Self::Cleaned { removed, .. } => removed,
        }
    }
}

/// Remove protection elements selected by `targets` from one XML part.
///
/// The whole document is parsed even when nothing needs removing, so a
/// part that is not well-formed is always reported as an error.
///
/// # Errors
/// Returns [`XmlError`] if the part is not UTF-8 or not well-formed XML.
pub fn clean_part(xml: &[u8], targets: ProtectionTargets) -> Result<CleanOutcome, XmlError> {
    let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);
    let text = std::str::from_utf8(xml)
        .map_err(|e| XmlError::new(e.valid_up_to(), "part is not valid UTF-8"))?;

    let mut reader = NsReader::from_str(text);
    let mut state = CleanState::new(targets, text.len());

    loop {
        let next = reader
            .read_resolved_event()
            .map(|(resolved, event)| (NameClass::of(&resolved), event));
        let position = reader.buffer_position();
        let (class, event) = next.map_err(|e| XmlError::new(position, e.to_string()))?;
        match &event {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) => check_attribute_prefixes(&reader, e, position)?,
            _ => {}
        }
        state.handle(&class, event, position)?;
    }

    state.finish(reader.buffer_position())
}

/// Namespace resolution of an element name, reduced to what the cleaner needs.
enum NameClass {
    Spreadsheet,
    Other,
    UnboundPrefix(String),
}

impl NameClass {
    fn of(resolved: &ResolveResult<'_>) -> Self {
        match resolved {
            ResolveResult::Unknown(prefix) => {
                Self::UnboundPrefix(String::from_utf8_lossy(prefix).into_owned())
            }
            other if is_spreadsheet_element(other) => Self::Spreadsheet,
            _ => Self::Other,
        }
    }
}

struct CleanState<'a> {
    targets: ProtectionTargets,
    writer: Writer<Vec<u8>>,
    /// Open elements in the source document.
    depth: usize,
    roots: usize,
    /// Open elements inside the subtree currently being dropped.
    skip_depth: usize,
    /// Whitespace-only text held back until we know whether the next
    /// element is being removed.
    pending_ws: Option<BytesText<'a>>,
    seen_any: bool,
    wrote_decl: bool,
    removed: Vec<ProtectionElement>,
}

impl<'a> CleanState<'a> {
    fn new(targets: ProtectionTargets, capacity: usize) -> Self {
        Self {
            targets,
            writer: Writer::new(Vec::with_capacity(capacity)),
            depth: 0,
            roots: 0,
            skip_depth: 0,
            pending_ws: None,
            seen_any: false,
            wrote_decl: false,
            removed: Vec::new(),
        }
    }

    fn handle(&mut self, class: &NameClass, event: Event<'a>, pos: usize) -> Result<(), XmlError> {
        self.check_well_formed(class, &event, pos)?;
        self.seen_any = true;

        if self.skip_depth > 0 {
            match event {
                Event::Start(_) => self.skip_depth += 1,
                Event::End(_) => self.skip_depth -= 1,
                _ => {}
            }
            return Ok(());
        }

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if let Some(kind) = self.removable_kind(class, e) {
                    self.removed.push(ProtectionElement::from_start(kind, e));
                    self.pending_ws = None;
                    if matches!(event, Event::Start(_)) {
                        self.skip_depth = 1;
                    }
                    return Ok(());
                }
                self.write(event, pos)
            }
            Event::Decl(ref decl) => {
                let canonical = canonical_decl(decl, pos)?;
                self.wrote_decl = true;
                self.write(Event::Decl(canonical), pos)
            }
            Event::Text(text) if is_whitespace(&text) => {
                self.flush_pending(pos)?;
                self.pending_ws = Some(text);
                Ok(())
            }
            other => self.write(other, pos),
        }
    }

    fn removable_kind(&self, class: &NameClass, e: &BytesStart) -> Option<ProtectionKind> {
        if !matches!(class, NameClass::Spreadsheet) {
            return None;
        }
        ProtectionKind::from_local_name(e.local_name().as_ref())
            .filter(|kind| self.targets.includes(*kind))
    }

    fn check_well_formed(
        &mut self,
        class: &NameClass,
        event: &Event<'a>,
        pos: usize,
    ) -> Result<(), XmlError> {
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if let NameClass::UnboundPrefix(prefix) = class {
                    return Err(XmlError::new(
                        pos,
                        format!("namespace prefix `{prefix}` is not declared"),
                    ));
                }
                if !is_xml_name(e.name().as_ref()) {
                    return Err(XmlError::new(pos, "invalid element name"));
                }
                check_attributes(e, pos)?;
                if self.depth == 0 {
                    if self.roots > 0 {
                        return Err(XmlError::new(pos, "more than one root element"));
                    }
                    self.roots += 1;
                }
                if matches!(event, Event::Start(_)) {
                    self.depth += 1;
                }
            }
            Event::End(_) => {
                if self.depth == 0 {
                    return Err(XmlError::new(pos, "closing tag without matching start tag"));
                }
                self.depth -= 1;
            }
            Event::Text(text) => {
                if self.depth == 0 && !is_whitespace(text) {
                    return Err(XmlError::new(pos, "text outside the root element"));
                }
                let unescaped = text
                    .unescape()
                    .map_err(|e| XmlError::new(pos, e.to_string()))?;
                check_chars(&unescaped, pos)?;
            }
            Event::CData(_) if self.depth == 0 => {
                return Err(XmlError::new(pos, "CDATA outside the root element"));
            }
            Event::CData(raw) => check_chars(&String::from_utf8_lossy(raw), pos)?,
            Event::Comment(raw) => check_chars(&String::from_utf8_lossy(raw), pos)?,
            Event::Decl(_) if self.seen_any => {
                return Err(XmlError::new(
                    pos,
                    "XML declaration is only allowed at the start of the document",
                ));
            }
            Event::DocType(_) if self.roots > 0 => {
                return Err(XmlError::new(pos, "DOCTYPE after the root element"));
            }
            _ => {}
        }
        Ok(())
    }

    fn write(&mut self, event: Event<'a>, pos: usize) -> Result<(), XmlError> {
        if !self.wrote_decl {
            self.wrote_decl = true;
            self.emit(Event::Decl(default_decl()), pos)?;
            if !matches!(event, Event::Decl(_)) {
                self.emit(Event::Text(BytesText::from_escaped("\n")), pos)?;
            }
        }
        self.flush_pending(pos)?;
        self.emit(event, pos)
    }

    fn flush_pending(&mut self, pos: usize) -> Result<(), XmlError> {
        match self.pending_ws.take() {
            Some(text) => self.emit(Event::Text(text), pos),
            None => Ok(()),
        }
    }

    fn emit(&mut self, event: Event<'_>, pos: usize) -> Result<(), XmlError> {
        self.writer
            .write_event(event)
            .map_err(|e| XmlError::new(pos, e.to_string()))
    }

    fn finish(mut self, pos: usize) -> Result<CleanOutcome, XmlError> {
        if self.depth > 0 {
            return Err(XmlError::new(
                pos,
                format!(
                    "unexpected end of document with {} unclosed element(s)",
                    self.depth
                ),
            ));
        }
        if self.roots == 0 {
            return Err(XmlError::new(pos, "document has no root element"));
        }
        if self.removed.is_empty() {
            return Ok(CleanOutcome::Unchanged);
        }

        self.flush_pending(pos)?;
        Ok(CleanOutcome::Cleaned {
            bytes: self.writer.into_inner(),
            removed: self.removed,
        })
    }
}

fn check_attributes(e: &BytesStart, pos: usize) -> Result<(), XmlError> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::new(pos, err.to_string()))?;
        if !is_xml_name(attr.key.as_ref()) {
            return Err(XmlError::new(pos, "invalid attribute name"));
        }
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::new(pos, err.to_string()))?;
        check_chars(&value, pos)?;
    }
    Ok(())
}

/// Every prefixed attribute must use a declared prefix (`xml` and `xmlns`
/// are reserved and always bound).
fn check_attribute_prefixes(
    reader: &NsReader<&[u8]>,
    e: &BytesStart,
    pos: usize,
) -> Result<(), XmlError> {
    for attr in e.attributes().flatten() {
        let Some(prefix) = attr.key.prefix() else {
            continue;
        };
        if matches!(prefix.as_ref(), b"xml" | b"xmlns") {
            continue;
        }
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(XmlError::new(
                pos,
                format!(
                    "namespace prefix `{}` is not declared",
                    String::from_utf8_lossy(&prefix)
                ),
            ));
        }
    }
    Ok(())
}

/// Reject characters outside the XML `Char` production.
fn check_chars(text: &str, pos: usize) -> Result<(), XmlError> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(XmlError::new(
            pos,
            format!("character U+{:04X} is not allowed in XML", u32::from(c)),
        )),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

/// Whether `name` matches the XML `Name` production.
fn is_xml_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

fn is_whitespace(text: &BytesText) -> bool {
    text.iter().all(u8::is_ascii_whitespace)
}

fn default_decl() -> BytesDecl<'static> {
    BytesDecl::new("1.0", Some("UTF-8"), None)
}

/// Re-declare the document as UTF-8, keeping its version and standalone flag.
fn canonical_decl(source: &BytesDecl, pos: usize) -> Result<BytesDecl<'static>, XmlError> {
    let version = source
        .version()
        .map_err(|e| XmlError::new(pos, e.to_string()))?;
    let version = String::from_utf8_lossy(&version).into_owned();
    let standalone = match source.standalone() {
        Some(value) => {
            let value = value.map_err(|e| XmlError::new(pos, e.to_string()))?;
            Some(String::from_utf8_lossy(&value).into_owned())
        }
        None => None,
    };
    Ok(BytesDecl::new(&version, Some("UTF-8"), standalone.as_deref()))
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

    const NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

    fn clean(xml: &str) -> CleanOutcome {
        clean_part(xml.as_bytes(), ProtectionTargets::ALL).unwrap()
    }

    fn cleaned_text(xml: &str) -> String {
        match clean(xml) {
            CleanOutcome::Cleaned { bytes, .. } => String::from_utf8(bytes).unwrap(),
            CleanOutcome::Unchanged => panic!("expected the part to change"),
        }
    }

    #[test]
    fn test_removes_sheet_protection() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{NS}"><sheetData/><sheetProtection sheet="1" objects="1"/><pageMargins left="0.7"/></worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert_eq!(
            out,
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{NS}"><sheetData/><pageMargins left="0.7"/></worksheet>"#
            )
        );
    }

    #[test]
    fn test_removes_workbook_protection() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{NS}">
  <workbookPr defaultThemeVersion="124226"/>
  <workbookProtection lockStructure="1" workbookPassword="CC1A"/>
  <sheets><sheet name="Sheet1" sheetId="1"/></sheets>
</workbook>"#
        );
        let outcome = clean(&xml);
        assert!(outcome.is_changed());
        assert_eq!(outcome.removed().len(), 1);
        assert_eq!(outcome.removed()[0].kind, ProtectionKind::Workbook);
        assert!(outcome.removed()[0].password_protected);

        let CleanOutcome::Cleaned { bytes, .. } = outcome else {
            panic!("expected change");
        };
        let out = String::from_utf8(bytes).unwrap();
        // The indentation run in front of the removed element goes with it
        assert_eq!(
            out,
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{NS}">
  <workbookPr defaultThemeVersion="124226"/>
  <sheets><sheet name="Sheet1" sheetId="1"/></sheets>
</workbook>"#
            )
        );
    }

    #[test]
    fn test_unchanged_part_reports_no_bytes() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="{NS}"><sheetData/></worksheet>"#
        );
        let outcome = clean(&xml);
        assert_eq!(outcome, CleanOutcome::Unchanged);
        assert!(!outcome.is_changed());
        assert!(outcome.removed().is_empty());
    }

    #[test]
    fn test_prefixed_namespace() {
        let xml = format!(
            r#"<x:worksheet xmlns:x="{NS}"><x:sheetData/><x:sheetProtection sheet="1"/></x:worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert!(!out.contains("sheetProtection"));
        assert!(out.contains("<x:sheetData/>"));
    }

    #[test]
    fn test_strict_namespace() {
        let xml = r#"<worksheet xmlns="http://purl.oclc.org/ooxml/spreadsheetml/main"><sheetProtection sheet="1"/></worksheet>"#;
        let out = cleaned_text(xml);
        assert!(!out.contains("sheetProtection"));
    }

    #[test]
    fn test_foreign_namespace_is_kept() {
        let xml = format!(
            r#"<worksheet xmlns="{NS}" xmlns:o="urn:other"><sheetData/><o:sheetProtection sheet="1"/></worksheet>"#
        );
        assert_eq!(clean(&xml), CleanOutcome::Unchanged);
    }

    #[test]
    fn test_unqualified_document_is_kept() {
        let xml = r#"<worksheet><sheetProtection sheet="1"/></worksheet>"#;
        assert_eq!(clean(xml), CleanOutcome::Unchanged);
    }

    #[test]
    fn test_nested_and_non_empty_elements() {
        let xml = format!(
            r#"<worksheet xmlns="{NS}"><extLst><ext><sheetProtection sheet="1"><inner a="1"/>text</sheetProtection></ext></extLst><sheetProtection sheet="1"/></worksheet>"#
        );
        let outcome = clean(&xml);
        assert_eq!(outcome.removed().len(), 2);
        let CleanOutcome::Cleaned { bytes, .. } = outcome else {
            panic!("expected change");
        };
        let out = String::from_utf8(bytes).unwrap();
        assert!(out.ends_with(&format!(
            r#"<worksheet xmlns="{NS}"><extLst><ext></ext></extLst></worksheet>"#
        )));
    }

    #[test]
    fn test_both_kinds_in_one_part() {
        let xml = format!(
            r#"<workbook xmlns="{NS}"><workbookProtection lockStructure="1"/><sheetProtection sheet="1"/></workbook>"#
        );
        let kinds: Vec<_> = clean(&xml).removed().iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![ProtectionKind::Workbook, ProtectionKind::Sheet]);
    }

    #[test]
    fn test_targets_restrict_removal() {
        let xml = format!(
            r#"<workbook xmlns="{NS}"><workbookProtection lockStructure="1"/><sheetProtection sheet="1"/></workbook>"#
        );
        let sheets_only = ProtectionTargets {
            sheet: true,
            workbook: false,
        };
        let outcome = clean_part(xml.as_bytes(), sheets_only).unwrap();
        let CleanOutcome::Cleaned { bytes, removed } = outcome else {
            panic!("expected change");
        };
        assert_eq!(removed.len(), 1);
        let out = String::from_utf8(bytes).unwrap();
        assert!(out.contains("workbookProtection"));
        assert!(!out.contains("sheetProtection"));

        let none = ProtectionTargets {
            sheet: false,
            workbook: false,
        };
        assert_eq!(
            clean_part(xml.as_bytes(), none).unwrap(),
            CleanOutcome::Unchanged
        );
    }

    #[test]
    fn test_declaration_added_when_missing() {
        let xml = format!(r#"<worksheet xmlns="{NS}"><sheetProtection/></worksheet>"#);
        let out = cleaned_text(&xml);
        assert_eq!(
            out,
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<worksheet xmlns=\"{NS}\"></worksheet>"
            )
        );
    }

    #[test]
    fn test_declaration_rewritten_as_utf8() {
        let xml = format!(
            r#"<?xml version='1.0' encoding='utf-8'?><worksheet xmlns="{NS}"><sheetProtection/></worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }

    #[test]
    fn test_bom_is_accepted() {
        let mut xml = b"\xEF\xBB\xBF".to_vec();
        xml.extend_from_slice(
            format!(r#"<?xml version="1.0"?><worksheet xmlns="{NS}"><sheetProtection/></worksheet>"#)
                .as_bytes(),
        );
        let outcome = clean_part(&xml, ProtectionTargets::ALL).unwrap();
        let CleanOutcome::Cleaned { bytes, .. } = outcome else {
            panic!("expected change");
        };
        assert!(bytes.starts_with(b"<?xml"));
    }

    #[test]
    fn test_escapes_and_comments_are_preserved() {
        let xml = format!(
            r#"<worksheet xmlns="{NS}"><!-- keep me --><sheetData><row r="1"><c r="A1" t="inlineStr"><is><t xml:space="preserve"> a &amp; b &lt;c&gt; </t></is></c></row></sheetData><sheetProtection/><![CDATA[x<y]]></worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert!(out.contains("<!-- keep me -->"));
        assert!(out.contains(r#"<t xml:space="preserve"> a &amp; b &lt;c&gt; </t>"#));
        assert!(out.contains("<![CDATA[x<y]]>"));
    }

    #[test]
    fn test_idempotent() {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="{NS}">
  <sheetData/>
  <sheetProtection sheet="1"/>
</worksheet>"#
        );
        let first = cleaned_text(&xml);
        assert_eq!(clean(&first), CleanOutcome::Unchanged);
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            ("unclosed root", format!(r#"<worksheet xmlns="{NS}"><sheetData>"#)),
            ("mismatched tags", format!(r#"<worksheet xmlns="{NS}"><a></b></worksheet>"#)),
            ("stray closing tag", format!(r#"<worksheet xmlns="{NS}"/></worksheet>"#)),
            ("two roots", format!(r#"<worksheet xmlns="{NS}"/><worksheet xmlns="{NS}"/>"#)),
            ("text outside root", format!(r#"<worksheet xmlns="{NS}"/>junk"#)),
            ("empty document", String::new()),
            ("unbound prefix", r#"<x:worksheet><x:sheetProtection/></x:worksheet>"#.to_string()),
            ("duplicate attribute", format!(r#"<worksheet xmlns="{NS}" a="1" a="2"/>"#)),
            ("unknown entity", format!(r#"<worksheet xmlns="{NS}">&nope;</worksheet>"#)),
            ("truncated tag", format!(r#"<worksheet xmlns="{NS}"><sheetData"#)),
            ("late declaration", format!(r#"<worksheet xmlns="{NS}"/><?xml version="1.0"?>"#)),
            ("control character in text", format!("<worksheet xmlns=\"{NS}\"><t>a\u{1}b</t></worksheet>")),
            ("control character reference", format!(r#"<worksheet xmlns="{NS}"><t>&#x1;</t></worksheet>"#)),
            ("control character in attribute", format!("<worksheet xmlns=\"{NS}\" a=\"\u{8}\"/>")),
            ("name starting with a digit", format!(r#"<worksheet xmlns="{NS}"><1bad/></worksheet>"#)),
            ("attribute name starting with a dash", format!(r#"<worksheet xmlns="{NS}" -a="1"/>"#)),
            ("undeclared attribute prefix", format!(r#"<worksheet xmlns="{NS}"><sheetData foo:bar="1"/></worksheet>"#)),
        ];
        for (label, xml) in cases {
            assert!(
                clean_part(xml.as_bytes(), ProtectionTargets::ALL).is_err(),
                "{label} should be rejected"
            );
        }
    }

    #[test]
    fn test_malformed_part_with_protection_is_not_rewritten() {
        let cases = [
            format!("<worksheet xmlns=\"{NS}\"><sheetProtection/><t>\u{1}</t></worksheet>"),
            format!(r#"<worksheet xmlns="{NS}"><sheetProtection/><1bad/></worksheet>"#),
            format!(r#"<worksheet xmlns="{NS}"><sheetProtection foo:bar="1"/></worksheet>"#),
        ];
        for xml in cases {
            let err = clean_part(xml.as_bytes(), ProtectionTargets::ALL).unwrap_err();
            assert!(!err.message.is_empty());
        }
    }

    #[test]
    fn test_declared_and_reserved_attribute_prefixes() {
        let xml = format!(
            r#"<worksheet xmlns="{NS}" xmlns:r="urn:rel" xmlns:mc="urn:mc" mc:Ignorable="r"><sheetData/><drawing r:id="rId1"/><t xml:space="preserve"> </t><sheetProtection/></worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert!(out.contains(r#"<drawing r:id="rId1"/>"#));
        assert!(out.contains(r#"xml:space="preserve""#));
    }

    #[test]
    fn test_non_ascii_names_and_text() {
        let xml = format!(
            r#"<worksheet xmlns="{NS}" xmlns:ü="urn:x"><ü:données é="ü">預算 😀</ü:données><sheetProtection/></worksheet>"#
        );
        let out = cleaned_text(&xml);
        assert!(out.contains("<ü:données é=\"ü\">預算 😀</ü:données>"));
    }

    #[test]
    fn test_malformed_even_without_protection() {
        let xml = format!(r#"<worksheet xmlns="{NS}"><sheetData></worksheet>"#);
        assert!(clean_part(xml.as_bytes(), ProtectionTargets::ALL).is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = clean_part(b"<worksheet>\xFF</worksheet>", ProtectionTargets::ALL).unwrap_err();
        assert_eq!(err.position, 11);
        assert!(err.message.contains("UTF-8"));
    }
}
