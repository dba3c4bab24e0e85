//! Source lines
//!
//! Everything downstream works on whole lines borrowed from the file text. A [`Line`] keeps its
//! trailing newline and leading whitespace exactly as read, so concatenating the lines of a range
//! reproduces that range byte for byte.

/// One line of input, identified by its 0-based position in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'src> {
    pub index: usize,
    pub text: &'src str,
}

impl<'src> Line<'src> {
    pub fn new(index: usize, text: &'src str) -> Self {
        Line { index, text }
    }

    /// 1-based line number, for messages meant for people.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

/// Split source text into lines, keeping each line's terminator.
///
/// A final line without a terminator is kept as is; an empty source has no lines.
pub fn split_lines(source: &str) -> Vec<&str> {
    source.split_inclusive('\n').collect()
}

pub(crate) fn is_newline_only(text: &str) -> bool {
    text == "\n" || text == "\r\n"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_terminators() {
        let lines = split_lines("a\n\n  b\nc");
        assert_eq!(lines, vec!["a\n", "\n", "  b\n", "c"]);
        assert_eq!(lines.concat(), "a\n\n  b\nc");
    }

    #[test]
    fn test_split_empty_source() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_newline_only() {
        assert!(is_newline_only("\n"));
        assert!(is_newline_only("\r\n"));
        assert!(!is_newline_only("  \n"));
        assert_eq!(Line::new(4, "x\n").number(), 5);
    }
}
