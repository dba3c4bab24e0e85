//! Source loading and the file-wide driver
//!
//! This module provides `SourceLoader` - it holds the text of one source file and runs the
//! extraction → building → flattening pipeline over one declaration or over every declaration
//! in the file. It is used by the CLI and by tests.
//!
//! # Example
//!
//! ```rust
//! use unnest_parser::unnest::loader::SourceLoader;
//!
//! // From file
//! let loader = SourceLoader::from_path("test_parsing.cpp").unwrap();
//! let flat = loader.flatten_one(11).unwrap();
//!
//! // From string, whole file
//! let loader = SourceLoader::from_string("TEST_CASE(\"t\") {\n}\n");
//! let rewritten = loader.rewrite().unwrap();
//! ```

use crate::unnest::building::build;
use crate::unnest::error::{format_source_context, FlattenError, FlattenResult};
use crate::unnest::extraction::{extract, locate_declarations};
use crate::unnest::flattening::{flatten, FlatDeclaration};
use crate::unnest::line::split_lines;
use crate::unnest::markers::Markers;
use crate::unnest::tree::Tree;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Error that can occur when loading or flattening a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoaderError {
    /// IO error when reading the file
    IoError { path: PathBuf, message: String },
    /// Flattening failed; `context` holds the numbered source lines around the failure
    FlattenError {
        path: Option<PathBuf>,
        error: FlattenError,
        context: String,
    },
}

impl LoaderError {
    /// Numbered source lines around the failing line, empty for IO errors.
    pub fn source_context(&self) -> &str {
        match self {
            LoaderError::IoError { .. } => "",
            LoaderError::FlattenError { context, .. } => context,
        }
    }
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::IoError { path, message } => {
                write!(f, "{}: IO error: {}", path.display(), message)
            }
            LoaderError::FlattenError { path, error, .. } => {
                let origin = path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<input>".to_string());
                write!(f, "{}:{}: {}", origin, error.line() + 1, error)
            }
        }
    }
}

impl std::error::Error for LoaderError {}

/// Extraction → building → flattening for the declaration starting at `start`.
///
/// Returns an empty vector when `start` is not a declaration line.
pub fn flatten_one(
    lines: &[&str],
    start: usize,
    markers: &Markers,
) -> FlattenResult<Vec<FlatDeclaration>> {
    let extracted = extract(lines, start, markers)?;
    if extracted.is_empty() {
        return Ok(Vec::new());
    }
    let tree = build(&extracted, markers)?;
    Ok(flatten(&tree, markers))
}

/// One declaration of a file and what it flattens to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    /// Index of the declaration's first line.
    pub start: usize,
    /// Index one past the declaration's closing line.
    pub end: usize,
    pub declarations: Vec<FlatDeclaration>,
}

/// Source text holder with pipeline shortcuts
pub struct SourceLoader {
    source: String,
    path: Option<PathBuf>,
    markers: Markers,
}

impl SourceLoader {
    /// Load from a file path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|err| LoaderError::IoError {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        tracing::debug!(path = %path.display(), bytes = source.len(), "loaded source");
        Ok(SourceLoader {
            source,
            path: Some(path.to_path_buf()),
            markers: Markers::default(),
        })
    }

    /// Load from a string
    pub fn from_string<S: Into<String>>(source: S) -> Self {
        SourceLoader {
            source: source.into(),
            path: None,
            markers: Markers::default(),
        }
    }

    /// Use a different marker set than the doctest defaults.
    pub fn with_markers(mut self, markers: Markers) -> Self {
        self.markers = markers;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn lines(&self) -> Vec<&str> {
        split_lines(&self.source)
    }

    /// Indices of every line that starts a declaration.
    pub fn declarations(&self) -> Vec<usize> {
        locate_declarations(&self.lines(), &self.markers)
    }

    /// Flatten the declaration starting at line index `start`.
    ///
    /// An empty result means `start` is not a declaration line.
    pub fn flatten_one(&self, start: usize) -> Result<Vec<FlatDeclaration>, LoaderError> {
        let lines = self.lines();
        flatten_one(&lines, start, &self.markers).map_err(|err| self.wrap(&lines, err))
    }

    /// Flatten every declaration in the file, in file order.
    pub fn flatten_all(&self) -> Result<Vec<Flattened>, LoaderError> {
        let lines = self.lines();
        let mut result: Vec<Flattened> = Vec::new();
        for start in locate_declarations(&lines, &self.markers) {
            if result.last().is_some_and(|prev| start < prev.end) {
                continue;
            }
            let flattened = self
                .flatten_range(&lines, start)
                .map_err(|err| self.wrap(&lines, err))?;
            result.push(flattened);
        }
        Ok(result)
    }

    /// Build the tree of the declaration at `start`, or `None` if it is not a declaration line.
    pub fn tree(&self, start: usize) -> Result<Option<Tree<'_>>, LoaderError> {
        let lines = self.lines();
        let extracted = extract(&lines, start, &self.markers).map_err(|e| self.wrap(&lines, e))?;
        if extracted.is_empty() {
            return Ok(None);
        }
        build(&extracted, &self.markers)
            .map(Some)
            .map_err(|e| self.wrap(&lines, e))
    }

    /// The whole file with every declaration replaced by its flat declarations.
    ///
    /// Ranges are computed against the untouched file, so replacing one declaration never
    /// shifts another. The separator after each group's last declaration is dropped to keep the
    /// spacing the file already had.
    pub fn rewrite(&self) -> Result<String, LoaderError> {
        let groups = self.flatten_all()?;
        Ok(self.splice(&groups))
    }

    /// The whole file with only the declaration at `start` replaced.
    ///
    /// Returns `None` when `start` is not a declaration line.
    pub fn rewrite_at(&self, start: usize) -> Result<Option<String>, LoaderError> {
        let lines = self.lines();
        let extracted = extract(&lines, start, &self.markers).map_err(|e| self.wrap(&lines, e))?;
        if extracted.is_empty() {
            return Ok(None);
        }
        let group = self
            .flatten_range(&lines, start)
            .map_err(|e| self.wrap(&lines, e))?;
        Ok(Some(self.splice(&[group])))
    }

    fn splice(&self, groups: &[Flattened]) -> String {
        let lines = self.lines();
        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for group in groups {
            out.extend(lines[cursor..group.start].iter().copied());
            if let Some((last, rest)) = group.declarations.split_last() {
                for decl in rest {
                    out.push_str(&decl.text);
                }
                out.push_str(last.without_separator());
            }
            cursor = group.end;
        }
        out.extend(lines[cursor..].iter().copied());

        tracing::debug!(declarations = groups.len(), "rewrote source");
        out
    }

    fn flatten_range(&self, lines: &[&str], start: usize) -> FlattenResult<Flattened> {
        let extracted = extract(lines, start, &self.markers)?;
        let end = extracted.last().map(|line| line.index + 1).unwrap_or(start);
        let tree = build(&extracted, &self.markers)?;
        Ok(Flattened {
            start,
            end,
            declarations: flatten(&tree, &self.markers),
        })
    }

    fn wrap(&self, lines: &[&str], error: FlattenError) -> LoaderError {
        LoaderError::FlattenError {
            path: self.path.clone(),
            context: format_source_context(lines, error.line()),
            error,
        }
    }
}
