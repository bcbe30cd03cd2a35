use crate::{
    kinds::CommandKind,
    parsing::tree::{NodeId, NodeKind, Span, SyntaxTree},
};

/// Validates the invariants of a fully nested tree.
///
/// Asserts that:
/// - All spans are within the source and not reversed
/// - Top-level children are sections, inline comments or line commands
/// - No section contains a section or inline comment, and no inline comment
///   contains another inline comment
/// - No `\end` command is left in the tree
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &SyntaxTree, source_len: usize) {
    let root = tree.root();
    let source = Span::new(0, source_len);
    for id in tree.descendants(root) {
        let span = tree.span(id);
        assert!(
            span.start <= span.end && source.contains(span),
            "span out of bounds: {span:?} (source len: {source_len})"
        );
        if let NodeKind::Command(command) = tree.kind(id) {
            assert!(
                command.kind != CommandKind::End,
                "`end` command left in tree at {span:?}"
            );
        }
    }

    for &child in tree.children(root) {
        assert!(
            matches!(
                tree.kind(child),
                NodeKind::Section(_) | NodeKind::Inline(_) | NodeKind::Command(_)
            ),
            "unexpected top-level {}",
            tree.kind(child).describe()
        );
        check_nesting(tree, child);
    }
}

fn check_nesting(tree: &SyntaxTree, id: NodeId) {
    let parent = tree.kind(id);
    for &child in tree.children(id) {
        let kind = tree.kind(child);
        match parent {
            NodeKind::Section(_) => assert!(
                !matches!(kind, NodeKind::Section(_) | NodeKind::Inline(_)),
                "{} nested in a section",
                kind.describe()
            ),
            NodeKind::Inline(_) => assert!(
                !matches!(kind, NodeKind::Inline(_)),
                "inline comment nested in an inline comment"
            ),
            _ => {}
        }
        check_nesting(tree, child);
    }
}
