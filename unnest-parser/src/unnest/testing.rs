//! Testing utilities
//!
//!     Hand-typed C++ snippets in test bodies drift: an indentation slip or a stray brace and
//!     the test exercises malformed input without anyone noticing. Tests that need a realistic
//!     source load it from the verified files under `unnest-parser/samples/` instead.
//!
//!     Each sample `<name>.cpp` may come with `<name>.flat.cpp`, the exact text the sample
//!     rewrites to. Keep the pair in sync when the flattening rules change.
//!
//!     ```rust,ignore
//!     use unnest_parser::unnest::testing::Samples;
//!
//!     let source = Samples::source("siblings");
//!     let expected = Samples::flattened("siblings");
//!     let loader = Samples::loader("siblings");
//!     ```

use crate::unnest::loader::SourceLoader;
use std::fs;
use std::path::PathBuf;

/// Access to the verified sample sources.
pub struct Samples;

impl Samples {
    /// Directory holding the samples.
    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
    }

    /// Path of `<name>.cpp`.
    pub fn path(name: &str) -> PathBuf {
        Self::dir().join(format!("{}.cpp", name))
    }

    /// Contents of `<name>.cpp`.
    pub fn source(name: &str) -> String {
        read(Self::path(name))
    }

    /// Contents of `<name>.flat.cpp`, the expected flattened text.
    pub fn flattened(name: &str) -> String {
        read(Self::dir().join(format!("{}.flat.cpp", name)))
    }

    /// A loader over `<name>.cpp`, read from disk so errors carry the path.
    pub fn loader(name: &str) -> SourceLoader {
        SourceLoader::from_path(Self::path(name))
            .unwrap_or_else(|err| panic!("sample '{}' failed to load: {}", name, err))
    }
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", path.display(), err))
}
