//! Declaration extraction
//!
//! Finds where top-level declarations start in a file and cuts one declaration's lines out of
//! it: from the line beginning with the declaration marker through the first line beginning
//! with the closing marker at column 0.

use crate::unnest::error::{FlattenError, FlattenResult};
use crate::unnest::line::Line;
use crate::unnest::markers::{self, Markers};

/// Every line index where a top-level declaration begins.
pub fn locate_declarations(lines: &[&str], markers: &Markers) -> Vec<usize> {
    let starts: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| markers.starts_declaration(line))
        .map(|(index, _)| index)
        .collect();
    tracing::debug!(count = starts.len(), "located declarations");
    starts
}

/// Cut the declaration starting at `start` out of `lines`.
///
/// Returns an empty vector when `lines[start]` does not begin with the declaration marker;
/// callers decide whether that means skip or abort. A declaration that runs off the end of the
/// input without a closing line is [`FlattenError::MalformedNesting`].
pub fn extract<'src>(
    lines: &[&'src str],
    start: usize,
    markers: &Markers,
) -> FlattenResult<Vec<Line<'src>>> {
    let first = lines.get(start).ok_or(FlattenError::OutOfRange {
        index: start,
        len: lines.len(),
    })?;

    if !markers.starts_declaration(first) {
        return Ok(Vec::new());
    }

    let mut result = Vec::new();
    for (index, text) in lines.iter().enumerate().skip(start) {
        result.push(Line::new(index, *text));
        if markers.closes_declaration(text) {
            tracing::debug!(start, end = index, "extracted declaration");
            return Ok(result);
        }
    }

    Err(FlattenError::MalformedNesting {
        label: markers::label(first).unwrap_or_default().to_string(),
        line: start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unnest::line::split_lines;

    const SOURCE: &str = "#include <doctest.h>\n\
                          \n\
                          TEST_CASE(\"first\") {\n\
                          \x20 CHECK(true);\n\
                          }\n\
                          \n\
                          TEST_CASE(\"second\") {\n\
                          \x20 SUBCASE(\"a\") {\n\
                          \x20 }\n\
                          }\n";

    #[test]
    fn test_locate_declarations() {
        let lines = split_lines(SOURCE);
        assert_eq!(locate_declarations(&lines, &Markers::default()), vec![2, 6]);
    }

    #[test]
    fn test_extract_through_closing_brace() {
        let lines = split_lines(SOURCE);
        let extracted = extract(&lines, 6, &Markers::default()).unwrap();
        let indices: Vec<usize> = extracted.iter().map(|line| line.index).collect();
        assert_eq!(indices, vec![6, 7, 8, 9]);
        assert_eq!(extracted[0].text, "TEST_CASE(\"second\") {\n");
        assert_eq!(extracted[3].text, "}\n");
    }

    #[test]
    fn test_extract_not_a_declaration_is_empty() {
        let lines = split_lines(SOURCE);
        assert!(extract(&lines, 0, &Markers::default()).unwrap().is_empty());
        assert!(extract(&lines, 3, &Markers::default()).unwrap().is_empty());
    }

    #[test]
    fn test_extract_out_of_range() {
        let lines = split_lines(SOURCE);
        assert_eq!(
            extract(&lines, 10, &Markers::default()),
            Err(FlattenError::OutOfRange { index: 10, len: 10 })
        );
    }

    #[test]
    fn test_extract_unclosed_declaration() {
        let lines = split_lines("TEST_CASE(\"open\") {\n  CHECK(true);\n");
        assert_eq!(
            extract(&lines, 0, &Markers::default()),
            Err(FlattenError::MalformedNesting {
                label: "open".to_string(),
                line: 0
            })
        );
    }
}
