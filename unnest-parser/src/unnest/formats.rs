//! Output formats
//!
//! - text: the flat declarations back to back, ready to paste into the source file
//! - json: an array of `{ "name", "text" }` objects
//! - names: one synthesized test name per line
//! - treeviz: the nesting tree of a declaration, one line per node
//!
//! Treeviz encodes depth as indentation, 2 spaces per level:
//!
//!     ⧉ parses input... (line 12)
//!       ├ ...with spaces (line 15)
//!         • ...leading (line 16)
//!         • ...trailing (line 20)
//!       • ...without spaces (line 25)
//!
//! Icons: ⧉ declaration, ├ nested block with children of its own, • leaf.

use crate::unnest::flattening::FlatDeclaration;
use crate::unnest::tree::Tree;
use std::fmt;
use std::str::FromStr;

/// Output format selector shared by the CLI and the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
    Names,
    Tree,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Text, Format::Json, Format::Names, Format::Tree];

    pub fn as_str(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Json => "json",
            Format::Names => "names",
            Format::Tree => "tree",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Format::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown format '{}' (expected one of: {})", s, known.join(", "))
            })
    }
}

/// Flat declarations back to back, separators included.
pub fn to_text(declarations: &[FlatDeclaration]) -> String {
    declarations.iter().map(|decl| decl.text.as_str()).collect()
}

/// Pretty-printed JSON array of the flat declarations.
pub fn to_json(declarations: &[FlatDeclaration]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(declarations)
}

/// One synthesized name per line.
pub fn to_names(declarations: &[FlatDeclaration]) -> String {
    declarations
        .iter()
        .map(|decl| format!("{}\n", decl.name))
        .collect()
}

/// One line per node; see the module docs for the layout.
pub fn to_treeviz(tree: &Tree<'_>) -> String {
    let mut out = String::new();
    for id in tree.preorder() {
        let node = tree.node(id);
        let icon = if node.is_root() {
            "⧉"
        } else if node.is_leaf() {
            "•"
        } else {
            "├"
        };
        let line = node.opening_line().map(|line| line.number()).unwrap_or(0);
        out.push_str(&format!(
            "{}{} {} (line {})\n",
            "  ".repeat(tree.depth(id)),
            icon,
            node.name,
            line
        ));
    }
    out
}
