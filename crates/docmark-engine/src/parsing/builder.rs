//! Engine adapter: pulldown-cmark events into an owned [`SyntaxTree`].
//!
//! # Event flow
//!
//! pulldown-cmark emits a flat stream of `Start(tag)` / leaf / `End(tag)`
//! events, each with the byte range it was parsed from. The builder keeps a
//! stack of open containers and appends every node to the innermost one:
//!
//! ```text
//! Start(Paragraph)         0..9    push Paragraph
//! Text("A brief.")         0..8    Paragraph += Text
//! End(Paragraph)                   pop
//! ```
//!
//! Adjacent text events are merged first so that a backslash or a bracket
//! never splits a text run in two.
//!
//! # Segments
//!
//! Recognized command lines must open a block of their own before the
//! engine gets a chance to treat them as a lazy continuation line or a
//! setext heading. The source is therefore cut at those lines and every
//! segment is parsed separately; spans stay offsets into the whole comment.
//! Link reference definitions only apply within their own segment.
//!
//! # Verbatim runs
//!
//! When a text event contains the verbatim opener, the builder emits a
//! [`NodeKind::Verbatim`] leaf and then ignores every event that lies inside
//! the consumed range. Containers that start inside the range but end after
//! it are made transparent: their children are attached to the enclosing node.

use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TextMergeWithOffset,
};

use super::{
    ext::verbatim::VerbatimExtension,
    tree::{NodeId, NodeKind, Span, SyntaxTree},
};

#[derive(Debug, Clone, Copy)]
enum Frame {
    Open(NodeId),
    /// A container swallowed by a verbatim run; its `End` pops nothing else.
    Transparent,
}

pub struct TreeBuilder<'s> {
    source: &'s str,
    verbatim: &'s VerbatimExtension,
    tree: SyntaxTree,
    stack: Vec<Frame>,
    /// End of the last verbatim run; events starting before it are consumed.
    skip_until: usize,
    /// Nesting depth inside a container that lies wholly inside a verbatim run.
    skip_depth: usize,
}

/// Engine options: plain CommonMark plus footnotes, so that footnotes are
/// reported instead of silently turning into link text.
pub fn engine_options() -> Options {
    Options::ENABLE_FOOTNOTES
}

/// Parses `source` with the engine and returns the flat syntax tree.
pub fn build_tree(source: &str, verbatim: &VerbatimExtension) -> SyntaxTree {
    build_segments(source, verbatim, &[])
}

/// Like [`build_tree`], but every offset in `breaks` starts a fresh block
/// context: the engine sees each segment on its own, so no list, quote or
/// paragraph open before a break continues past it.
///
/// `breaks` must be ascending line starts.
pub fn build_segments(source: &str, verbatim: &VerbatimExtension, breaks: &[usize]) -> SyntaxTree {
    let mut builder = TreeBuilder::new(source, verbatim);
    let mut start = 0;
    for end in breaks.iter().copied().chain(std::iter::once(source.len())) {
        if end <= start {
            continue;
        }
        let parser = Parser::new_ext(&source[start..end], engine_options()).into_offset_iter();
        for (event, range) in TextMergeWithOffset::new(parser) {
            builder.push(event, (start + range.start..start + range.end).into());
        }
        start = end;
    }
    builder.finish()
}

impl<'s> TreeBuilder<'s> {
    pub fn new(source: &'s str, verbatim: &'s VerbatimExtension) -> Self {
        Self {
            source,
            verbatim,
            tree: SyntaxTree::new(source.len()),
            stack: Vec::new(),
            skip_until: 0,
            skip_depth: 0,
        }
    }

    pub fn push(&mut self, event: Event<'_>, span: Span) {
        if self.skip_depth > 0 {
            match event {
                Event::Start(_) => self.skip_depth += 1,
                Event::End(_) => self.skip_depth -= 1,
                _ => {}
            }
            return;
        }

        let in_verbatim = span.start < self.skip_until;
        match event {
            Event::Start(tag) => {
                if in_verbatim {
                    if span.end <= self.skip_until {
                        self.skip_depth = 1;
                    } else {
                        self.stack.push(Frame::Transparent);
                    }
                    return;
                }
                let id = self.tree.alloc(Self::container_kind(tag), span);
                let parent = self.current();
                self.tree.append_child(parent, id);
                self.stack.push(Frame::Open(id));
            }
            Event::End(_) => {
                self.stack.pop();
            }
            Event::Text(text) => self.text(text, span),
            Event::Code(code) => self.leaf(NodeKind::Code(code.into_string()), span),
            Event::Html(html) => {
                let parent = self.current();
                match self.tree.kind_mut(parent) {
                    NodeKind::HtmlBlock(literal) => literal.push_str(&html),
                    _ => self.leaf(NodeKind::HtmlBlock(html.into_string()), span),
                }
            }
            Event::InlineHtml(html) => self.leaf(NodeKind::HtmlInline(html.into_string()), span),
            Event::FootnoteReference(label) => {
                self.leaf(NodeKind::FootnoteReference(label.into_string()), span)
            }
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, span),
            Event::HardBreak => self.leaf(NodeKind::HardBreak, span),
            Event::Rule => self.leaf(NodeKind::ThematicBreak, span),
            _ => self.leaf(NodeKind::Unsupported("extension construct"), span),
        }
    }

    pub fn finish(self) -> SyntaxTree {
        self.tree
    }

    fn current(&self) -> NodeId {
        self.stack
            .iter()
            .rev()
            .find_map(|f| match f {
                Frame::Open(id) => Some(*id),
                Frame::Transparent => None,
            })
            .unwrap_or_else(|| self.tree.root())
    }

    fn leaf(&mut self, kind: NodeKind, span: Span) {
        if span.start < self.skip_until && span.end <= self.skip_until {
            return;
        }
        let id = self.tree.alloc(kind, span);
        let parent = self.current();
        self.tree.append_child(parent, id);
    }

    fn text(&mut self, text: CowStr<'_>, mut span: Span) {
        let parent = self.current();
        if let NodeKind::CodeBlock { literal, .. } = self.tree.kind_mut(parent) {
            literal.push_str(&text);
            return;
        }

        let mut text = text.into_string();
        if span.start < self.skip_until {
            if span.end <= self.skip_until {
                return;
            }
            span.start = self.skip_until;
            text = self.source[span.start..span.end].to_string();
        }

        loop {
            let Some(m) = self.verbatim.find(self.source, &text, span) else {
                self.append_text(text, span);
                return;
            };
            if m.text_before > 0 {
                self.append_text(
                    text[..m.text_before].to_string(),
                    Span::new(span.start, m.span.start),
                );
            }
            self.append(NodeKind::Verbatim(m.content), m.span);
            self.skip_until = m.span.end;

            if span.end <= m.span.end {
                return;
            }
            span.start = m.span.end;
            text = self.source[span.start..span.end].to_string();
        }
    }

    fn append_text(&mut self, text: String, span: Span) {
        if !text.is_empty() {
            self.append(NodeKind::Text(text), span);
        }
    }

    fn append(&mut self, kind: NodeKind, span: Span) {
        let id = self.tree.alloc(kind, span);
        let parent = self.current();
        self.tree.append_child(parent, id);
    }

    fn container_kind(tag: Tag<'_>) -> NodeKind {
        match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(kind) => NodeKind::CodeBlock {
                language: match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                },
                literal: String::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock(String::new()),
            Tag::List(start) => NodeKind::List { start },
            Tag::Item => NodeKind::Item,
            Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition(label.into_string()),
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
                email: link_type == LinkType::Email,
            },
            Tag::Image { dest_url, .. } => NodeKind::Image {
                url: dest_url.into_string(),
            },
            _ => NodeKind::Unsupported("extension construct"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(source: &str) -> SyntaxTree {
        build_tree(source, &VerbatimExtension::new('\\'))
    }

    fn kinds(tree: &SyntaxTree, id: NodeId) -> Vec<NodeKind> {
        tree.children(id)
            .iter()
            .map(|&c| tree.kind(c).clone())
            .collect()
    }

    #[test]
    fn paragraph_text_is_merged() {
        let tree = build("\\returns the value");
        let root = tree.root();
        assert_eq!(kinds(&tree, root), vec![NodeKind::Paragraph]);
        let para = tree.children(root)[0];
        assert_eq!(
            kinds(&tree, para),
            vec![NodeKind::Text("\\returns the value".into())]
        );
    }

    #[test]
    fn segments_close_open_containers() {
        let source = "> quote\n\\returns x";
        let tree = build_segments(source, &VerbatimExtension::new('\\'), &[8]);
        let root = tree.root();
        assert_eq!(kinds(&tree, root), vec![NodeKind::BlockQuote, NodeKind::Paragraph]);
        let para = tree.children(root)[1];
        assert_eq!(tree.span(para), Span::new(8, source.len()));
    }

    #[test]
    fn code_block_collects_literal() {
        let tree = build("```cpp extra\nint x;\n```\n");
        let block = tree.children(tree.root())[0];
        assert_eq!(
            tree.kind(block),
            &NodeKind::CodeBlock {
                language: Some("cpp".into()),
                literal: "int x;\n".into(),
            }
        );
    }

    #[test]
    fn verbatim_swallows_inline_html() {
        let tree = build("a \\verbatim <i>x</i>\\end b");
        let para = tree.children(tree.root())[0];
        assert_eq!(
            kinds(&tree, para),
            vec![
                NodeKind::Text("a ".into()),
                NodeKind::Verbatim("<i>x</i>".into()),
                NodeKind::Text(" b".into()),
            ]
        );
    }

    #[test]
    fn verbatim_stops_at_end_of_line() {
        let tree = build("\\verbatim *x*\nnext");
        let para = tree.children(tree.root())[0];
        assert_eq!(
            kinds(&tree, para),
            vec![
                NodeKind::Verbatim("*x*".into()),
                NodeKind::SoftBreak,
                NodeKind::Text("next".into()),
            ]
        );
    }

    #[test]
    fn verbatim_is_not_triggered_in_code() {
        let tree = build("`\\verbatim x`");
        let para = tree.children(tree.root())[0];
        assert_eq!(
            kinds(&tree, para),
            vec![NodeKind::Code("\\verbatim x".into())]
        );
    }

    #[test]
    fn spans_point_into_source() {
        let source = "one\n\ntwo";
        let tree = build(source);
        let second = tree.children(tree.root())[1];
        let span = tree.span(second);
        assert_eq!(&source[span.start..span.end], "two");
    }
}
