//! Flattening
//!
//! Walks a built [`Tree`] and emits one flat declaration per leaf, in pre-order. For the chain
//! `[root, n1, .., leaf]` the emitted text is:
//!
//!     root opening line, label replaced by the joined name
//!     root body
//!     n1 body, de-indented by n1's indent
//!     ..
//!     leaf body, de-indented by the leaf's indent
//!     root closing line
//!     blank separator line
//!
//! Names chain with the continuation marker: `"parses input..."` followed by
//! `"...with trailing space"` reads `"parses input with trailing space"`.

use crate::unnest::line::Line;
use crate::unnest::markers::{dedent, replace_label, Markers};
use crate::unnest::tree::{NodeId, Tree};
use serde::Serialize;

/// One emitted, non-nested declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatDeclaration {
    pub name: String,
    /// Full declaration text, ending with the blank separator line.
    pub text: String,
}

impl FlatDeclaration {
    /// The text without its trailing separator line.
    pub fn without_separator(&self) -> &str {
        self.text
            .strip_suffix("\r\n")
            .or_else(|| self.text.strip_suffix('\n'))
            .unwrap_or(&self.text)
    }
}

/// Emit one flat declaration per leaf of `tree`, in pre-order.
pub fn flatten(tree: &Tree<'_>, markers: &Markers) -> Vec<FlatDeclaration> {
    tree.leaves()
        .into_iter()
        .map(|leaf| {
            let chain = tree.ancestry(leaf);
            let name = synthesize_name(tree, &chain, markers);
            let text = synthesize_text(tree, &chain, &name);
            tracing::debug!(name = %name, depth = chain.len() - 1, "flattened leaf");
            FlatDeclaration { name, text }
        })
        .collect()
}

/// Join the names along `chain`, dropping continuation markers where names meet.
pub fn synthesize_name(tree: &Tree<'_>, chain: &[NodeId], markers: &Markers) -> String {
    let mut name = markers
        .strip_continuation_suffix(&tree.root().name)
        .to_string();
    for id in chain.iter().skip(1) {
        let part = markers.strip_continuation_prefix(&tree.node(*id).name);
        name.push(' ');
        name.push_str(markers.strip_continuation_suffix(part));
    }
    name
}

fn synthesize_text(tree: &Tree<'_>, chain: &[NodeId], name: &str) -> String {
    let root = tree.root();
    let mut text = String::new();

    if let Some(opening) = root.opening_line() {
        let renamed = replace_label(opening.text, name).unwrap_or_else(|| opening.text.into());
        text.push_str(&renamed);
    }
    push_lines(&mut text, root.body(), 0);

    for id in chain.iter().skip(1) {
        let node = tree.node(*id);
        push_lines(&mut text, node.body(), node.indent);
    }

    let mut terminator = "\n";
    if let Some(closing) = root.closing_line() {
        if closing.text.ends_with("\r\n") {
            terminator = "\r\n";
        }
        text.push_str(closing.text);
        if !closing.text.ends_with('\n') {
            text.push_str(terminator);
        }
    }
    text.push_str(terminator);
    text
}

fn push_lines(text: &mut String, lines: &[Line<'_>], indent: usize) {
    for line in lines {
        text.push_str(dedent(line.text, indent));
    }
}
