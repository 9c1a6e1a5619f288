//! Candidate part matching
//!
//! Only two kinds of archive members are ever opened: worksheet parts
//! directly under `xl/worksheets/` and the workbook descriptor
//! `xl/workbook.xml`. Everything else (relationships, styles, media, VBA
//! projects, chartsheets, nested folders) is passed through untouched.

/// Folder holding worksheet parts.
pub const WORKSHEETS_DIR: &str = "xl/worksheets/";

/// The workbook descriptor part.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";

/// Kind of a candidate member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Worksheet,
    Workbook,
}

/// Classify an archive member name, returning `None` for non-candidates.
///
/// Worksheets match `xl/worksheets/*.xml` one level deep, so
/// `xl/worksheets/_rels/sheet1.xml.rels` and anything in subfolders is not a
/// candidate.
#[must_use]
pub fn classify(name: &str) -> Option<PartKind> {
    if name == WORKBOOK_PART {
        return Some(PartKind::Workbook);
    }
    let file = name.strip_prefix(WORKSHEETS_DIR)?;
    let is_sheet = !file.contains('/') && file.len() > ".xml".len() && file.ends_with(".xml");
    is_sheet.then_some(PartKind::Worksheet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("xl/workbook.xml" => Some(PartKind::Workbook); "workbook descriptor")]
    #[test_case("xl/worksheets/sheet1.xml" => Some(PartKind::Worksheet); "first sheet")]
    #[test_case("xl/worksheets/sheet12.xml" => Some(PartKind::Worksheet); "two digit sheet")]
    #[test_case("xl/worksheets/Data Sheet.xml" => Some(PartKind::Worksheet); "arbitrary name")]
    #[test_case("xl/worksheets/_rels/sheet1.xml.rels" => None; "sheet relationships")]
    #[test_case("xl/worksheets/nested/sheet1.xml" => None; "nested folder")]
    #[test_case("xl/worksheets/" => None; "directory entry")]
    #[test_case("xl/worksheets/.xml" => None; "bare extension")]
    #[test_case("xl/worksheets/sheet1.bin" => None; "binary sheet")]
    #[test_case("xl/chartsheets/sheet1.xml" => None; "chartsheet")]
    #[test_case("xl/styles.xml" => None; "styles")]
    #[test_case("xl/_rels/workbook.xml.rels" => None; "workbook relationships")]
    #[test_case("/xl/workbook.xml" => None; "leading slash is a different name")]
    #[test_case("XL/WORKBOOK.XML" => None; "names are case sensitive")]
    #[test_case("[Content_Types].xml" => None; "content types")]
    fn test_classify(name: &str) -> Option<PartKind> {
        classify(name)
    }
}
