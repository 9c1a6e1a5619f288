//! Output file naming.
//!
//! `Book1.xlsx` becomes `Book1_unprotected.xlsx`; `report` becomes
//! `report_unprotected`.

/// Suffix appended to the file stem of a rewritten workbook.
pub const DEFAULT_SUFFIX: &str = "_unprotected";

/// Derive the output file name for a rewritten workbook.
///
/// The extension is everything from the last `.` of the final path
/// component, except that leading dots belong to the stem (`.hidden` has no
/// extension). Directory components are kept as-is.
#[must_use]
pub fn derive_output_name(file_name: &str, suffix: &str) -> String {
    let (stem, extension) = split_extension(file_name);
    format!("{stem}{suffix}{extension}")
}

/// Split `file_name` into `(stem, extension)`, the extension keeping its dot.
fn split_extension(file_name: &str) -> (&str, &str) {
    let base_start = file_name.rfind(['/', '\\']).map_or(0, |sep| sep + 1);
    let Some(base) = file_name.get(base_start..) else {
        return (file_name, "");
    };

    let leading_dots = base.len() - base.trim_start_matches('.').len();
    match base.rfind('.') {
        Some(dot) if dot > leading_dots => file_name.split_at(base_start + dot),
        _ => (file_name, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Book1.xlsx" => "Book1_unprotected.xlsx"; "xlsx")]
    #[test_case("report" => "report_unprotected"; "no extension")]
    #[test_case("macros.xlsm" => "macros_unprotected.xlsm"; "xlsm")]
    #[test_case("archive.tar.xlsx" => "archive.tar_unprotected.xlsx"; "last dot wins")]
    #[test_case("Q3 results (final).xlsx" => "Q3 results (final)_unprotected.xlsx"; "spaces and parens")]
    #[test_case(".xlsx" => ".xlsx_unprotected"; "dotfile has no extension")]
    #[test_case("..xlsx" => "..xlsx_unprotected"; "only leading dots")]
    #[test_case("name." => "name_unprotected."; "trailing dot")]
    #[test_case("dir.v2/Book1" => "dir.v2/Book1_unprotected"; "dot in directory only")]
    #[test_case("uploads/Book1.xlsx" => "uploads/Book1_unprotected.xlsx"; "forward slash path")]
    #[test_case(r"C:\Users\me\Book1.xlsx" => r"C:\Users\me\Book1_unprotected.xlsx"; "windows path")]
    #[test_case("預算.xlsx" => "預算_unprotected.xlsx"; "non ascii stem")]
    #[test_case("" => "_unprotected"; "empty name")]
    fn test_derive_output_name(input: &str) -> String {
        derive_output_name(input, DEFAULT_SUFFIX)
    }

    #[test]
    fn test_custom_suffix() {
        assert_eq!(derive_output_name("Book1.xlsx", "-open"), "Book1-open.xlsx");
        assert_eq!(derive_output_name("Book1.xlsx", ""), "Book1.xlsx");
    }

    #[test]
    fn test_deterministic() {
        let first = derive_output_name("Book1.xlsx", DEFAULT_SUFFIX);
        let second = derive_output_name("Book1.xlsx", DEFAULT_SUFFIX);
        assert_eq!(first, second);
    }
}
