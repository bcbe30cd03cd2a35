//! HTML neutralizer.
//!
//! Comments on templates are full of `<` and `>`, which the engine happily
//! reads as raw HTML. Comments never contain real HTML, so every raw HTML
//! node is turned back into the text it was written as, and text runs that
//! end up next to each other are merged. Boundary detection in the nesting
//! pass looks at text content and relies on that merging.

use crate::parsing::tree::{NodeId, NodeKind, SyntaxTree};

/// Rewrites raw HTML under `root` into literal text. Idempotent.
pub fn neutralize_html(tree: &mut SyntaxTree, root: NodeId) {
    for id in tree.descendants(root) {
        match tree.kind(id).clone() {
            NodeKind::HtmlBlock(literal) => {
                let span = tree.span(id);
                let text = tree.alloc(NodeKind::Text(literal), span);
                tree.set_kind(id, NodeKind::Paragraph);
                tree.set_children(id, vec![text]);
            }
            NodeKind::HtmlInline(literal) => tree.set_kind(id, NodeKind::Text(literal)),
            _ => {}
        }
    }

    for id in tree.descendants(root) {
        merge_adjacent_text(tree, id);
    }
}

/// Joins consecutive text children of `parent` into one node.
pub fn merge_adjacent_text(tree: &mut SyntaxTree, parent: NodeId) {
    let children = tree.take_children(parent);
    let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
    for child in children {
        if let Some(&prev) = merged.last() {
            if let (Some(a), Some(b)) = (tree.text(prev), tree.text(child)) {
                let joined = format!("{a}{b}");
                let span = tree.span(prev).cover(tree.span(child));
                tree.set_kind(prev, NodeKind::Text(joined));
                tree.set_span(prev, span);
                continue;
            }
        }
        merged.push(child);
    }
    tree.set_children(parent, merged);
}

/// True if no raw HTML node is left under `root`.
pub fn is_neutral(tree: &SyntaxTree, root: NodeId) -> bool {
    tree.descendants(root).into_iter().all(|id| {
        !matches!(
            tree.kind(id),
            NodeKind::HtmlBlock(_) | NodeKind::HtmlInline(_)
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{builder::build_tree, ext::verbatim::VerbatimExtension};
    use pretty_assertions::assert_eq;

    fn neutralized(source: &str) -> SyntaxTree {
        let mut tree = build_tree(source, &VerbatimExtension::new('\\'));
        let root = tree.root();
        neutralize_html(&mut tree, root);
        tree
    }

    fn paragraph_kinds(tree: &SyntaxTree) -> Vec<NodeKind> {
        let para = tree.children(tree.root())[0];
        tree.children(para)
            .iter()
            .map(|&c| tree.kind(c).clone())
            .collect()
    }

    #[test]
    fn inline_html_becomes_one_text_node() {
        let tree = neutralized("<i>x</i>");
        assert_eq!(paragraph_kinds(&tree), vec![NodeKind::Text("<i>x</i>".into())]);
    }

    #[test]
    fn template_arguments_are_text() {
        let tree = neutralized("Returns a std::vector<T> of things.");
        assert_eq!(
            paragraph_kinds(&tree),
            vec![NodeKind::Text("Returns a std::vector<T> of things.".into())]
        );
    }

    #[test]
    fn html_block_becomes_paragraph() {
        let tree = neutralized("<div>\nhello\n</div>\n");
        let block = tree.children(tree.root())[0];
        assert_eq!(tree.kind(block), &NodeKind::Paragraph);
        assert_eq!(
            paragraph_kinds(&tree),
            vec![NodeKind::Text("<div>\nhello\n</div>\n".into())]
        );
    }

    #[test]
    fn text_without_html_is_unchanged() {
        let source = "Plain *text* here.";
        let before = build_tree(source, &VerbatimExtension::new('\\'));
        let after = neutralized(source);
        assert_eq!(paragraph_kinds(&before), paragraph_kinds(&after));
    }

    #[test]
    fn neutralizing_twice_changes_nothing() {
        let mut tree = neutralized("a <b>c</b> d");
        let once = paragraph_kinds(&tree);
        let root = tree.root();
        neutralize_html(&mut tree, root);
        assert_eq!(paragraph_kinds(&tree), once);
        assert!(is_neutral(&tree, root));
    }
}
