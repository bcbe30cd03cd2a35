//! Nesting pass: turns the flat list of recognized constructs into sections.
//!
//! After recognition the document is a flat run of siblings:
//!
//! ```text
//! Paragraph, Section(returns), Paragraph, Command(end), Paragraph, Inline(param a), Paragraph
//! ```
//!
//! The pass scans it once from left to right and moves every sibling into
//! its final parent: the brief, the lazily created details, a named section
//! or an inline comment. Inline comments get the whole treatment again on
//! their own content, so they have their own brief and details.
//!
//! # Brief
//!
//! The brief is undecided until the first paragraph or structural construct.
//! A leading paragraph donates its first sentence to the brief; anything
//! else first (a block, a section, a non-transparent command) rules the
//! implicit brief out.
//!
//! # Section boundaries
//!
//! Content of a section or inline comment is found in two passes over the
//! same siblings:
//!
//! 1. explicit: run to the first stopper (section, inline, non-transparent
//!    command). If that stopper is `\end`, everything before it is the
//!    content and the `\end` is dropped.
//! 2. implicit: otherwise start over, stop at the same stoppers and also
//!    right after the first paragraph, which is split at its first line
//!    break. The rest of the split paragraph goes back to the outer scan.
//!
//! An `\end` wins no matter how far away it is. Without one, the nearest
//! paragraph end decides, not the nearest stopper.

use std::collections::VecDeque;

use crate::{
    error::ParseError,
    kinds::{CommandKind, SectionKind},
    parsing::tree::{LineIndex, NodeId, NodeKind, Span, SyntaxTree},
};

/// Where a paragraph may be split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// End of the first sentence, or a hard line break.
    BriefEnd,
    /// A hard line break.
    SectionEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Brief {
    Undecided,
    RuledOut,
    Established(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Paragraph,
    Command(CommandKind),
    Section(SectionKind),
    Inline,
    Block,
    Disallowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Split {
    /// Split at the break node with this index; the break is dropped.
    At(usize),
    /// Split the text node at `index` after byte `at`.
    InText { index: usize, at: usize },
}

pub struct Nesting<'a> {
    source: &'a str,
    lines: &'a LineIndex,
}

impl<'a> Nesting<'a> {
    pub fn new(source: &'a str, lines: &'a LineIndex) -> Self {
        Self { source, lines }
    }

    /// Nests the children of the document root.
    pub fn run(&self, tree: &mut SyntaxTree) -> Result<(), ParseError> {
        let root = tree.root();
        self.nest(tree, root)
    }

    fn nest(&self, tree: &mut SyntaxTree, parent: NodeId) -> Result<(), ParseError> {
        let mut pending: VecDeque<NodeId> = tree.take_children(parent).into();
        let mut out = Vec::new();
        let mut brief = Brief::Undecided;
        let mut details: Option<NodeId> = None;

        while let Some(node) = pending.pop_front() {
            match role(tree, node) {
                Role::Paragraph if brief == Brief::Undecided => {
                    let (prefix, rest) = split_paragraph(tree, node, Boundary::BriefEnd);
                    brief = match prefix {
                        Some(p) => {
                            let section =
                                tree.alloc_parent(NodeKind::Section(SectionKind::Brief), vec![p]);
                            out.push(section);
                            Brief::Established(section)
                        }
                        None => Brief::RuledOut,
                    };
                    requeue(&mut pending, rest);
                }
                Role::Paragraph => {
                    let (prefix, rest) = split_paragraph(tree, node, Boundary::SectionEnd);
                    if let Some(p) = prefix {
                        let target = details_section(tree, &mut details, &mut out, p);
                        append_content(tree, target, [p]);
                    }
                    requeue(&mut pending, rest);
                }
                Role::Command(CommandKind::End) => {
                    return Err(self.error(
                        tree,
                        node,
                        "`end` command without a section or inline comment to close",
                    ));
                }
                Role::Command(kind) => {
                    if !kind.is_transparent() && brief == Brief::Undecided {
                        brief = Brief::RuledOut;
                    }
                    out.push(node);
                }
                Role::Section(kind) => {
                    let target = match (kind, brief, details) {
                        (SectionKind::Brief, Brief::Established(existing), _) => existing,
                        (SectionKind::Brief, _, _) => {
                            brief = Brief::Established(node);
                            out.push(node);
                            node
                        }
                        (SectionKind::Details, _, Some(existing)) => existing,
                        _ => {
                            if brief == Brief::Undecided {
                                brief = Brief::RuledOut;
                            }
                            if kind == SectionKind::Details {
                                details = Some(node);
                            }
                            out.push(node);
                            node
                        }
                    };

                    let content = gather(tree, &mut pending);
                    append_content(tree, target, content);
                }
                Role::Inline => {
                    if brief == Brief::Undecided {
                        brief = Brief::RuledOut;
                    }
                    let content = gather(tree, &mut pending);
                    append_content(tree, node, content);
                    self.nest(tree, node)?;
                    out.push(node);
                }
                Role::Block => {
                    if brief == Brief::Undecided {
                        brief = Brief::RuledOut;
                    }
                    let target = details_section(tree, &mut details, &mut out, node);
                    append_content(tree, target, [node]);
                }
                Role::Disallowed => {
                    let message = format!(
                        "{} is not allowed in a documentation comment",
                        tree.kind(node).describe()
                    );
                    return Err(self.error(tree, node, message));
                }
            }
        }

        tree.set_children(parent, out);
        Ok(())
    }

    fn error(&self, tree: &SyntaxTree, node: NodeId, message: impl Into<String>) -> ParseError {
        let pos = self.lines.position(self.source, tree.span(node).start);
        ParseError::new(pos, message)
    }
}

/// Puts the remainder of a split paragraph back in front of the scan.
fn requeue(pending: &mut VecDeque<NodeId>, rest: Option<NodeId>) {
    if let Some(rest) = rest {
        pending.push_front(rest);
    }
}

fn role(tree: &SyntaxTree, node: NodeId) -> Role {
    match tree.kind(node) {
        NodeKind::Paragraph => Role::Paragraph,
        NodeKind::Command(c) => Role::Command(c.kind),
        NodeKind::Section(kind) => Role::Section(*kind),
        NodeKind::Inline(_) => Role::Inline,
        NodeKind::BlockQuote
        | NodeKind::List { .. }
        | NodeKind::CodeBlock { .. }
        | NodeKind::Heading { .. }
        | NodeKind::ThematicBreak => Role::Block,
        _ => Role::Disallowed,
    }
}

/// Whether `node` stops the content of the section before it.
fn ends_section(tree: &SyntaxTree, node: NodeId) -> bool {
    match tree.kind(node) {
        NodeKind::Section(_) | NodeKind::Inline(_) => true,
        NodeKind::Command(c) => !c.kind.is_transparent(),
        _ => false,
    }
}

fn is_end_command(tree: &SyntaxTree, node: NodeId) -> bool {
    matches!(tree.kind(node), NodeKind::Command(c) if c.kind == CommandKind::End)
}

/// Takes the content of a section or inline comment off the front of `pending`.
fn gather(tree: &mut SyntaxTree, pending: &mut VecDeque<NodeId>) -> Vec<NodeId> {
    if let Some(stop) = pending.iter().position(|&n| ends_section(tree, n)) {
        if is_end_command(tree, pending[stop]) {
            let content: Vec<NodeId> = pending.drain(..stop).collect();
            pending.pop_front();
            return content;
        }
    }

    let mut content = Vec::new();
    while let Some(&node) = pending.front() {
        if ends_section(tree, node) {
            break;
        }
        pending.pop_front();
        if matches!(tree.kind(node), NodeKind::Paragraph) {
            let (prefix, rest) = split_paragraph(tree, node, Boundary::SectionEnd);
            content.extend(prefix);
            requeue(pending, rest);
            break;
        }
        content.push(node);
    }
    content
}

fn details_section(
    tree: &mut SyntaxTree,
    details: &mut Option<NodeId>,
    out: &mut Vec<NodeId>,
    first: NodeId,
) -> NodeId {
    *details.get_or_insert_with(|| {
        let span = tree.span(first);
        let section = tree.alloc(NodeKind::Section(SectionKind::Details), span);
        out.push(section);
        section
    })
}

fn append_content(tree: &mut SyntaxTree, target: NodeId, content: impl IntoIterator<Item = NodeId>) {
    let mut span = tree.span(target);
    for node in content {
        span = span.cover(tree.span(node));
        tree.append_child(target, node);
    }
    tree.set_span(target, span);
}

/// Splits `para` at its first `boundary`.
///
/// Returns the paragraph holding the prefix (reusing `para`) and a new
/// paragraph holding the remainder. Breaks at either edge are trimmed and an
/// empty side comes back as `None`.
pub fn split_paragraph(
    tree: &mut SyntaxTree,
    para: NodeId,
    boundary: Boundary,
) -> (Option<NodeId>, Option<NodeId>) {
    let mut head = tree.take_children(para);
    let mut tail = match find_split(tree, &head, boundary) {
        None => Vec::new(),
        Some(Split::At(index)) => {
            let tail = head.split_off(index + 1);
            head.pop();
            tail
        }
        Some(Split::InText { index, at }) => {
            let node = head[index];
            let mut tail = head.split_off(index + 1);
            let span = tree.span(node);
            let text = tree.text(node).unwrap_or_default().to_string();
            let (first, second) = text.split_at(at);
            let cut = (span.start + at).min(span.end);

            let second = second.trim_start();
            if !second.is_empty() {
                let offset = span.end.saturating_sub(second.len()).max(cut);
                let rest = tree.alloc(NodeKind::Text(second.to_string()), Span::new(offset, span.end));
                tail.insert(0, rest);
            }
            tree.set_kind(node, NodeKind::Text(first.to_string()));
            tree.set_span(node, Span::new(span.start, cut));
            tail
        }
    };

    trim_breaks(tree, &mut head);
    trim_breaks(tree, &mut tail);

    let prefix = if head.is_empty() {
        None
    } else {
        tree.set_children(para, head);
        tree.refit_span(para);
        Some(para)
    };
    let rest = if tail.is_empty() {
        None
    } else {
        Some(tree.alloc_parent(NodeKind::Paragraph, tail))
    };
    (prefix, rest)
}

fn find_split(tree: &SyntaxTree, children: &[NodeId], boundary: Boundary) -> Option<Split> {
    for (index, &child) in children.iter().enumerate() {
        match tree.kind(child) {
            NodeKind::HardBreak => return Some(Split::At(index)),
            NodeKind::SoftBreak
                if boundary == Boundary::BriefEnd
                    && index > 0
                    && trailing_text(tree, children[index - 1]).is_some_and(ends_sentence) =>
            {
                return Some(Split::At(index));
            }
            NodeKind::Text(text) if boundary == Boundary::BriefEnd => {
                if let Some(at) = sentence_end_within(text) {
                    return Some(Split::InText { index, at });
                }
            }
            _ => {}
        }
    }
    None
}

fn trim_breaks(tree: &SyntaxTree, nodes: &mut Vec<NodeId>) {
    while nodes.last().is_some_and(|&n| tree.kind(n).is_break()) {
        nodes.pop();
    }
    let leading = nodes
        .iter()
        .take_while(|&&n| tree.kind(n).is_break())
        .count();
    nodes.drain(..leading);
}

/// The text run at the very end of `node`, looking through emphasis and links.
fn trailing_text(tree: &SyntaxTree, node: NodeId) -> Option<&str> {
    match tree.children(node).last() {
        Some(&last) => trailing_text(tree, last),
        None => tree.text(node),
    }
}

fn is_sentence_punctuation(c: char) -> bool {
    matches!(c, '.' | '?' | '!')
}

fn ends_sentence(text: &str) -> bool {
    text.trim_end().ends_with(is_sentence_punctuation)
}

/// Byte offset just past the first sentence end followed by more text.
fn sentence_end_within(text: &str) -> Option<usize> {
    text.char_indices().find_map(|(i, c)| {
        if !is_sentence_punctuation(c) {
            return None;
        }
        let after = &text[i + c.len_utf8()..];
        let continues = after.starts_with(char::is_whitespace) && !after.trim().is_empty();
        continues.then_some(i + c.len_utf8())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(tree: &mut SyntaxTree, kinds: Vec<NodeKind>) -> NodeId {
        let mut offset = 0;
        let children = kinds
            .into_iter()
            .map(|k| {
                let len = match &k {
                    NodeKind::Text(t) => t.len(),
                    _ => 1,
                };
                let id = tree.alloc(k, Span::new(offset, offset + len));
                offset += len;
                id
            })
            .collect();
        tree.alloc_parent(NodeKind::Paragraph, children)
    }

    fn texts(tree: &SyntaxTree, para: Option<NodeId>) -> Vec<NodeKind> {
        para.map(|p| {
            tree.children(p)
                .iter()
                .map(|&c| tree.kind(c).clone())
                .collect()
        })
        .unwrap_or_default()
    }

    fn text(s: &str) -> NodeKind {
        NodeKind::Text(s.to_string())
    }

    #[test]
    fn sentence_end_needs_following_text() {
        assert_eq!(sentence_end_within("One. Two."), Some(4));
        assert_eq!(sentence_end_within("Why? Because"), Some(4));
        assert_eq!(sentence_end_within("Only one."), None);
        assert_eq!(sentence_end_within("v1.2 is out"), None);
        assert_eq!(sentence_end_within("Trailing.   "), None);
    }

    #[test]
    fn brief_end_splits_inside_text() {
        let mut tree = SyntaxTree::new(0);
        let para = paragraph(&mut tree, vec![text("First sentence. Second sentence.")]);

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::BriefEnd);

        assert_eq!(texts(&tree, prefix), vec![text("First sentence.")]);
        assert_eq!(texts(&tree, rest), vec![text("Second sentence.")]);
    }

    #[test]
    fn brief_end_splits_at_soft_break_after_sentence() {
        let mut tree = SyntaxTree::new(0);
        let para = paragraph(
            &mut tree,
            vec![text("Done!"), NodeKind::SoftBreak, text("More")],
        );

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::BriefEnd);

        assert_eq!(texts(&tree, prefix), vec![text("Done!")]);
        assert_eq!(texts(&tree, rest), vec![text("More")]);
    }

    #[test]
    fn sentence_may_end_inside_emphasis() {
        let mut tree = SyntaxTree::new(0);
        let word = tree.alloc(text("b."), Span::new(3, 5));
        let emphasis = tree.alloc_parent(NodeKind::Emphasis, vec![word]);
        let lead = tree.alloc(text("A "), Span::new(0, 2));
        let soft = tree.alloc(NodeKind::SoftBreak, Span::new(6, 7));
        let tail = tree.alloc(text("c"), Span::new(7, 8));
        let para = tree.alloc_parent(NodeKind::Paragraph, vec![lead, emphasis, soft, tail]);

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::BriefEnd);

        assert_eq!(texts(&tree, prefix), vec![text("A "), NodeKind::Emphasis]);
        assert_eq!(texts(&tree, rest), vec![text("c")]);
    }

    #[test]
    fn soft_break_without_sentence_end_does_not_split() {
        let mut tree = SyntaxTree::new(0);
        let para = paragraph(
            &mut tree,
            vec![text("A long"), NodeKind::SoftBreak, text("brief")],
        );

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::BriefEnd);

        assert_eq!(
            texts(&tree, prefix),
            vec![text("A long"), NodeKind::SoftBreak, text("brief")]
        );
        assert_eq!(rest, None);
    }

    #[test]
    fn section_end_only_splits_at_hard_break() {
        let mut tree = SyntaxTree::new(0);
        let para = paragraph(
            &mut tree,
            vec![
                text("One. Two."),
                NodeKind::SoftBreak,
                text("Three"),
                NodeKind::HardBreak,
                text("Four"),
            ],
        );

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::SectionEnd);

        assert_eq!(
            texts(&tree, prefix),
            vec![text("One. Two."), NodeKind::SoftBreak, text("Three")]
        );
        assert_eq!(texts(&tree, rest), vec![text("Four")]);
    }

    #[test]
    fn leading_break_leaves_empty_prefix() {
        let mut tree = SyntaxTree::new(0);
        let para = paragraph(&mut tree, vec![NodeKind::HardBreak, text("x")]);

        let (prefix, rest) = split_paragraph(&mut tree, para, Boundary::BriefEnd);

        assert_eq!(prefix, None);
        assert_eq!(texts(&tree, rest), vec![text("x")]);
    }
}
