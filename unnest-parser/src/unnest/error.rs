//! Error types for extraction, tree building and flattening

use std::fmt;

/// Errors that abort flattening a declaration
///
/// Every variant carries the 0-based index of the offending line in the source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The start index lies beyond the end of the input
    OutOfRange { index: usize, len: usize },
    /// A block (or the declaration itself) opened at `line` is never closed
    MalformedNesting { label: String, line: usize },
    /// A declaration or nested-block line without a quoted label
    MissingLabel { line: usize },
    /// The lines handed to the tree builder do not open with a declaration
    NotADeclaration { line: usize },
}

impl FlattenError {
    /// The source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            FlattenError::OutOfRange { index, .. } => *index,
            FlattenError::MalformedNesting { line, .. }
            | FlattenError::MissingLabel { line }
            | FlattenError::NotADeclaration { line } => *line,
        }
    }
}

impl fmt::Display for FlattenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlattenError::OutOfRange { index, len } => {
                write!(
                    f,
                    "line {} is out of range (input has {} lines)",
                    index + 1,
                    len
                )
            }
            FlattenError::MalformedNesting { label, line } => {
                write!(
                    f,
                    "block \"{}\" opened on line {} has no matching close",
                    label,
                    line + 1
                )
            }
            FlattenError::MissingLabel { line } => {
                write!(f, "line {} has no quoted label", line + 1)
            }
            FlattenError::NotADeclaration { line } => {
                write!(f, "line {} does not start a declaration", line + 1)
            }
        }
    }
}

impl std::error::Error for FlattenError {}

/// Type alias for flattening results
pub type FlattenResult<T> = Result<T, FlattenError>;

/// Format source context around an error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(lines: &[&str], error_line: usize) -> String {
    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, text) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!(
            "{} {:3} | {}\n",
            marker,
            line_num + 1,
            text.trim_end_matches(['\n', '\r'])
        ));
    }

    context
}
