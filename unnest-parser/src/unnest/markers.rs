//! Structural markers
//!
//! The parser recognises exactly five literal markers and nothing else of the host language:
//!
//!     TEST_CASE("label") {        declaration marker, at column 0
//!         SUBCASE("label") {      nested-block marker, at any column
//!         }                       closing marker, at the nested marker's column
//!     }                           closing marker, at column 0
//!
//! plus the opening brace (only looked at when it sits alone on the line after a nested
//! marker) and the continuation marker `...` used to chain labels.
//!
//! All string surgery on labels goes through explicit byte ranges, so a label that happens to
//! repeat elsewhere on its line is never touched twice.

use std::ops::Range;

/// The literal markers that delimit declarations and nested blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub declaration: String,
    pub nested: String,
    pub open: String,
    pub close: String,
    pub continuation: String,
}

impl Default for Markers {
    fn default() -> Self {
        Markers::doctest()
    }
}

impl Markers {
    /// The doctest markers: `TEST_CASE`, `SUBCASE`, braces and `...`.
    pub fn doctest() -> Self {
        Markers {
            declaration: "TEST_CASE".to_string(),
            nested: "SUBCASE".to_string(),
            open: "{".to_string(),
            close: "}".to_string(),
            continuation: "...".to_string(),
        }
    }

    /// Does this line open a top-level declaration?
    pub fn starts_declaration(&self, line: &str) -> bool {
        line.starts_with(&self.declaration)
    }

    /// Does this line close a top-level declaration?
    pub fn closes_declaration(&self, line: &str) -> bool {
        line.starts_with(&self.close)
    }

    /// Column at which the nested-block marker occurs on this line, if it does.
    pub fn nested_column(&self, line: &str) -> Option<usize> {
        line.find(&self.nested)
    }

    /// Does the closing marker sit at exactly `column`, with only indentation before it?
    pub fn closes_at(&self, line: &str, column: usize) -> bool {
        match (line.get(..column), line.get(column..)) {
            (Some(indent), Some(rest)) => is_indentation(indent) && rest.starts_with(&self.close),
            _ => false,
        }
    }

    /// Is this line a lone opening brace at exactly `column`?
    pub fn opens_alone_at(&self, line: &str, column: usize) -> bool {
        match (line.get(..column), line.get(column..)) {
            (Some(indent), Some(rest)) => is_indentation(indent) && rest.trim_end() == self.open,
            _ => false,
        }
    }

    /// Remove one leading continuation marker, if present.
    pub fn strip_continuation_prefix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.continuation.as_str()).unwrap_or(name)
    }

    /// Remove one trailing continuation marker, if present.
    pub fn strip_continuation_suffix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_suffix(self.continuation.as_str()).unwrap_or(name)
    }
}

/// Byte range of the text between the first pair of double quotes on the line.
pub fn label_span(line: &str) -> Option<Range<usize>> {
    let open = line.find('"')?;
    let start = open + 1;
    let len = line[start..].find('"')?;
    Some(start..start + len)
}

/// The quoted label on a line.
pub fn label(line: &str) -> Option<&str> {
    label_span(line).map(|span| &line[span])
}

/// Rebuild a line with its first quoted label replaced.
pub fn replace_label(line: &str, name: &str) -> Option<String> {
    let span = label_span(line)?;
    let mut replaced = String::with_capacity(line.len() + name.len());
    replaced.push_str(&line[..span.start]);
    replaced.push_str(name);
    replaced.push_str(&line[span.end..]);
    Some(replaced)
}

/// Remove up to `indent` leading spaces or tabs.
///
/// A line that is only a line terminator is returned untouched, as is whatever follows the
/// indentation when the line is indented less than `indent`.
pub fn dedent(text: &str, indent: usize) -> &str {
    if crate::unnest::line::is_newline_only(text) {
        return text;
    }
    let strip = text
        .bytes()
        .take(indent)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &text[strip..]
}

fn is_indentation(text: &str) -> bool {
    text.bytes().all(|b| b == b' ' || b == b'\t')
}
