//! Tree building
//!
//! Turns the lines of one extracted declaration into a [`Tree`]. Two mutually recursive steps
//! share a cursor that is passed in and handed back by value:
//!
//! - root construction walks the declaration, hands every nested-block line to subtree
//!   construction, and stops at the closing marker in column 0;
//! - subtree construction opens a child at the nested marker's column, recurses into deeper
//!   blocks, and stops at the closing marker found at exactly that column.
//!
//! A line that opens a nested block belongs to the child it opens, never to the parent, so the
//! parent's body never repeats block-opening text. Every input line ends up in exactly one node.

use crate::unnest::error::{FlattenError, FlattenResult};
use crate::unnest::line::Line;
use crate::unnest::markers::{self, Markers};
use crate::unnest::tree::{Node, NodeId, Tree};

/// Build the tree of one declaration from its extracted lines.
pub fn build<'src>(lines: &[Line<'src>], markers: &Markers) -> FlattenResult<Tree<'src>> {
    let first = match lines.first() {
        Some(first) if first.text.contains(markers.declaration.as_str()) => *first,
        Some(first) => return Err(FlattenError::NotADeclaration { line: first.index }),
        None => return Err(FlattenError::NotADeclaration { line: 0 }),
    };
    let name = markers::label(first.text)
        .ok_or(FlattenError::MissingLabel { line: first.index })?
        .to_string();

    let mut root = Node::new(name, 0, None);
    root.owned_lines.push(first);
    let mut tree = Tree::with_root(root);
    let root_id = tree.root_id();

    let mut cursor = 1;
    while let Some(line) = lines.get(cursor) {
        if let Some(column) = markers.nested_column(line.text) {
            cursor = build_subtree(&mut tree, lines, cursor, column, root_id, markers)?;
            continue;
        }
        // A declaration that never closed on its own swallowed the next one.
        if markers.starts_declaration(line.text) {
            return Err(FlattenError::MalformedNesting {
                label: tree.root().name.clone(),
                line: first.index,
            });
        }
        tree.node_mut(root_id).owned_lines.push(*line);
        if markers.closes_declaration(line.text) {
            tracing::debug!(
                declaration = %tree.root().name,
                nodes = tree.len(),
                "built declaration tree"
            );
            return Ok(tree);
        }
        cursor += 1;
    }

    Err(FlattenError::MalformedNesting {
        label: tree.root().name.clone(),
        line: first.index,
    })
}

/// Consume the nested block opening at `start`, attach it under `parent`, and return the
/// cursor just past its closing line.
fn build_subtree<'src>(
    tree: &mut Tree<'src>,
    lines: &[Line<'src>],
    start: usize,
    column: usize,
    parent: NodeId,
    markers: &Markers,
) -> FlattenResult<usize> {
    let opening = lines[start];
    let name = markers::label(opening.text)
        .ok_or(FlattenError::MissingLabel {
            line: opening.index,
        })?
        .to_string();

    let id = tree.attach(Node::new(name, column, Some(parent)));
    tree.node_mut(id).owned_lines.push(opening);
    tracing::debug!(
        label = %tree.node(id).name,
        line = opening.number(),
        column,
        "opened nested block"
    );

    let mut cursor = start + 1;
    if let Some(brace) = lines.get(cursor) {
        if markers.opens_alone_at(brace.text, column) {
            let node = tree.node_mut(id);
            node.owned_lines.push(*brace);
            node.header_len = 2;
            cursor += 1;
        }
    }

    while let Some(line) = lines.get(cursor) {
        if let Some(nested) = markers.nested_column(line.text) {
            cursor = build_subtree(tree, lines, cursor, nested, id, markers)?;
            continue;
        }
        tree.node_mut(id).owned_lines.push(*line);
        cursor += 1;
        if markers.closes_at(line.text, column) {
            return Ok(cursor);
        }
    }

    Err(FlattenError::MalformedNesting {
        label: tree.node(id).name.clone(),
        line: opening.index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unnest::extraction::extract;
    use crate::unnest::line::split_lines;

    fn tree_of(source: &str) -> FlattenResult<Tree<'_>> {
        let markers = Markers::default();
        let lines = split_lines(source);
        let extracted = extract(&lines, 0, &markers)?;
        build(&extracted, &markers)
    }

    fn owned_texts<'a>(tree: &Tree<'a>, id: NodeId) -> Vec<&'a str> {
        tree.node(id).owned_lines.iter().map(|line| line.text).collect()
    }

    #[test]
    fn test_declaration_without_nesting_is_a_lone_root() {
        let tree = tree_of("TEST_CASE(\"flat\") {\n  CHECK(1);\n}\n").unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().name, "flat");
        assert_eq!(
            owned_texts(&tree, tree.root_id()),
            vec!["TEST_CASE(\"flat\") {\n", "  CHECK(1);\n", "}\n"]
        );
    }

    #[test]
    fn test_opening_line_belongs_to_child() {
        let source = "TEST_CASE(\"outer\") {\n\
                      \x20 setup();\n\
                      \x20 SUBCASE(\"inner\") {\n\
                      \x20   check();\n\
                      \x20 }\n\
                      }\n";
        let tree = tree_of(source).unwrap();
        let root = tree.root_id();
        assert_eq!(
            owned_texts(&tree, root),
            vec!["TEST_CASE(\"outer\") {\n", "  setup();\n", "}\n"]
        );

        let child = tree.root().children[0];
        assert_eq!(tree.node(child).name, "inner");
        assert_eq!(tree.node(child).indent, 2);
        assert_eq!(tree.node(child).parent, Some(root));
        assert_eq!(
            owned_texts(&tree, child),
            vec!["  SUBCASE(\"inner\") {\n", "    check();\n", "  }\n"]
        );
    }

    #[test]
    fn test_close_matches_by_column() {
        let source = "TEST_CASE(\"t\") {\n\
                      \x20 SUBCASE(\"s\") {\n\
                      \x20   if (x) {\n\
                      \x20     y();\n\
                      \x20   }\n\
                      \x20 }\n\
                      \x20 after();\n\
                      }\n";
        let tree = tree_of(source).unwrap();
        let child = tree.root().children[0];
        assert_eq!(tree.node(child).owned_lines.len(), 5);
        assert_eq!(
            owned_texts(&tree, tree.root_id()),
            vec!["TEST_CASE(\"t\") {\n", "  after();\n", "}\n"]
        );
    }

    #[test]
    fn test_brace_on_its_own_line_is_structural() {
        let source = "TEST_CASE(\"allman\")\n\
                      {\n\
                      \x20   SUBCASE(\"x\")\n\
                      \x20   {\n\
                      \x20       CHECK(x);\n\
                      \x20   }\n\
                      }\n";
        let tree = tree_of(source).unwrap();
        let child = tree.node(tree.root().children[0]);
        assert_eq!(child.header_len, 2);
        assert_eq!(child.body().len(), 1);
        assert_eq!(child.body()[0].text, "        CHECK(x);\n");
    }

    #[test]
    fn test_every_line_lands_in_exactly_one_node() {
        let source = "TEST_CASE(\"t\") {\n\
                      \x20 a();\n\
                      \x20 SUBCASE(\"s1\") {\n\
                      \x20   b();\n\
                      \x20   SUBCASE(\"s1a\") {\n\
                      \x20     c();\n\
                      \x20   }\n\
                      \x20 }\n\
                      \x20 SUBCASE(\"s2\") {\n\
                      \x20   d();\n\
                      \x20 }\n\
                      }\n";
        let tree = tree_of(source).unwrap();
        let mut seen: Vec<usize> = tree
            .preorder()
            .flat_map(|id| tree.node(id).owned_lines.iter().map(|line| line.index))
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..12).collect::<Vec<_>>());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_unclosed_nested_block() {
        let lines = [
            Line::new(3, "TEST_CASE(\"t\") {\n"),
            Line::new(4, "  SUBCASE(\"open\") {\n"),
            Line::new(5, "    x();\n"),
            Line::new(6, "}\n"),
        ];
        assert_eq!(
            build(&lines, &Markers::default()),
            Err(FlattenError::MalformedNesting {
                label: "open".to_string(),
                line: 4
            })
        );
    }

    #[test]
    fn test_missing_label() {
        let lines = [
            Line::new(0, "TEST_CASE(\"t\") {\n"),
            Line::new(1, "  SUBCASE(name) {\n"),
            Line::new(2, "  }\n"),
            Line::new(3, "}\n"),
        ];
        assert_eq!(
            build(&lines, &Markers::default()),
            Err(FlattenError::MissingLabel { line: 1 })
        );
    }

    #[test]
    fn test_missing_root_label() {
        let lines = [Line::new(0, "TEST_CASE(name) {\n"), Line::new(1, "}\n")];
        assert_eq!(
            build(&lines, &Markers::default()),
            Err(FlattenError::MissingLabel { line: 0 })
        );
    }

    #[test]
    fn test_declaration_inside_declaration_is_malformed() {
        let source = "TEST_CASE(\"a\") {}\n\
                      TEST_CASE(\"b\") {\n\
                      \x20 SUBCASE(\"s\") {\n\
                      \x20 }\n\
                      }\n";
        assert_eq!(
            tree_of(source),
            Err(FlattenError::MalformedNesting {
                label: "a".to_string(),
                line: 0
            })
        );
    }

    #[test]
    fn test_not_a_declaration() {
        let lines = [Line::new(7, "int main() {\n"), Line::new(8, "}\n")];
        assert_eq!(
            build(&lines, &Markers::default()),
            Err(FlattenError::NotADeclaration { line: 7 })
        );
        assert_eq!(
            build(&[], &Markers::default()),
            Err(FlattenError::NotADeclaration { line: 0 })
        );
    }
}
