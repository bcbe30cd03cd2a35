//! # Syntax Tree
//!
//! Owned, index-based tree produced by the engine adapter and rewritten by
//! the comment extensions.
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to their children by
//! [`NodeId`]. Tree surgery is therefore plain `Vec` manipulation: moving a
//! run of siblings into a new parent is a drain from one child list and an
//! extend of another. Detached nodes simply stay in the arena until the tree
//! is dropped at the end of the parse.

pub mod lines;
pub mod span;

pub use lines::{LineIndex, SourcePos};
pub use span::Span;

pub use crate::markup::InlineTarget;

use crate::kinds::{CommandKind, SectionKind};

/// Handle of a node inside its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A `\command` line with the captured pattern groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub kind: CommandKind,
    /// Captured groups in order; optional groups that did not match are empty.
    pub args: Vec<String>,
}

impl Command {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args
            .get(index)
            .map(String::as_str)
            .filter(|a| !a.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Text(String),
    Emphasis,
    Strong,
    Code(String),
    Link {
        url: String,
        title: String,
        email: bool,
    },
    Image {
        url: String,
    },
    List {
        start: Option<u64>,
    },
    Item,
    BlockQuote,
    CodeBlock {
        language: Option<String>,
        literal: String,
    },
    Heading {
        level: u8,
    },
    ThematicBreak,
    SoftBreak,
    HardBreak,
    HtmlBlock(String),
    HtmlInline(String),
    FootnoteDefinition(String),
    FootnoteReference(String),
    /// Engine construct without a counterpart in comments.
    Unsupported(&'static str),
    Command(Command),
    Section(SectionKind),
    Inline(InlineTarget),
    Verbatim(String),
}

impl NodeKind {
    pub fn is_break(&self) -> bool {
        matches!(self, NodeKind::SoftBreak | NodeKind::HardBreak)
    }

    /// Short name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Text(_) => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong emphasis",
            NodeKind::Code(_) => "code span",
            NodeKind::Link { .. } => "link",
            NodeKind::Image { .. } => "image",
            NodeKind::List { .. } => "list",
            NodeKind::Item => "list item",
            NodeKind::BlockQuote => "block quote",
            NodeKind::CodeBlock { .. } => "code block",
            NodeKind::Heading { .. } => "heading",
            NodeKind::ThematicBreak => "thematic break",
            NodeKind::SoftBreak => "soft break",
            NodeKind::HardBreak => "hard break",
            NodeKind::HtmlBlock(_) => "HTML block",
            NodeKind::HtmlInline(_) => "inline HTML",
            NodeKind::FootnoteDefinition(_) => "footnote definition",
            NodeKind::FootnoteReference(_) => "footnote reference",
            NodeKind::Unsupported(name) => *name,
            NodeKind::Command(_) => "command",
            NodeKind::Section(_) => "section",
            NodeKind::Inline(_) => "inline comment",
            NodeKind::Verbatim(_) => "verbatim",
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    span: Span,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl SyntaxTree {
    /// A tree holding only an empty document node spanning `len` bytes.
    pub fn new(len: usize) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                span: Span::new(0, len),
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Allocates a detached node.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            span,
            children: Vec::new(),
        });
        id
    }

    /// Allocates a node owning `children`, spanning from the first to the last child.
    pub fn alloc_parent(&mut self, kind: NodeKind, children: Vec<NodeId>) -> NodeId {
        let span = self.span_of_all(&children).unwrap_or_default();
        let id = self.alloc(kind, span);
        self.nodes[id.0].children = children;
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.0].kind = kind;
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0].span
    }

    pub fn set_span(&mut self, id: NodeId, span: Span) {
        self.nodes[id.0].span = span;
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    pub fn append_children(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        self.nodes[parent.0].children.extend(children);
    }

    /// Detaches and returns all children of `parent`.
    pub fn take_children(&mut self, parent: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.nodes[parent.0].children)
    }

    pub fn set_children(&mut self, parent: NodeId, children: Vec<NodeId>) {
        self.nodes[parent.0].children = children;
    }

    /// Recomputes the span of `id` from its children, if it has any.
    pub fn refit_span(&mut self, id: NodeId) {
        if let Some(span) = self.span_of_all(&self.nodes[id.0].children) {
            self.nodes[id.0].span = span;
        }
    }

    fn span_of_all(&self, ids: &[NodeId]) -> Option<Span> {
        ids.iter()
            .map(|&c| self.nodes[c.0].span)
            .reduce(Span::cover)
    }

    /// Text content if `id` is a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Depth-first pre-order walk over `id` and all of its descendants.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tree_has_empty_document() {
        let tree = SyntaxTree::new(7);
        assert_eq!(tree.kind(tree.root()), &NodeKind::Document);
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.span(tree.root()), Span::new(0, 7));
    }

    #[test]
    fn moving_children_is_a_slice_move() {
        let mut tree = SyntaxTree::new(10);
        let root = tree.root();
        let a = tree.alloc(NodeKind::Text("a".into()), Span::new(0, 1));
        let b = tree.alloc(NodeKind::Text("b".into()), Span::new(4, 6));
        tree.append_children(root, [a, b]);

        let moved = tree.take_children(root);
        let para = tree.alloc_parent(NodeKind::Paragraph, moved);
        tree.append_child(root, para);

        assert_eq!(tree.children(root), &[para]);
        assert_eq!(tree.children(para), &[a, b]);
        assert_eq!(tree.span(para), Span::new(0, 6));
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut tree = SyntaxTree::new(3);
        let root = tree.root();
        let p = tree.alloc(NodeKind::Paragraph, Span::new(0, 3));
        let t1 = tree.alloc(NodeKind::Text("x".into()), Span::new(0, 1));
        let t2 = tree.alloc(NodeKind::Text("y".into()), Span::new(2, 3));
        tree.append_child(root, p);
        tree.append_children(p, [t1, t2]);

        assert_eq!(tree.descendants(root), vec![root, p, t1, t2]);
    }
}
