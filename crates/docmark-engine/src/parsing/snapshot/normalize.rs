use std::fmt::Write;

use crate::parsing::tree::{NodeId, NodeKind, SyntaxTree};

/// Renders everything below the document root, one node per line.
///
/// ```text
/// Section(brief)
///   Paragraph
///     Text "A brief."
/// ```
pub fn outline(tree: &SyntaxTree) -> String {
    let mut out = String::new();
    for &child in tree.children(tree.root()) {
        write_node(tree, child, 0, &mut out);
    }
    out
}

fn write_node(tree: &SyntaxTree, id: NodeId, depth: usize, out: &mut String) {
    let _ = writeln!(out, "{}{}", "  ".repeat(depth), label(tree.kind(id)));
    for &child in tree.children(id) {
        write_node(tree, child, depth + 1, out);
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Document => "Document".into(),
        NodeKind::Paragraph => "Paragraph".into(),
        NodeKind::Text(text) => format!("Text {text:?}"),
        NodeKind::Emphasis => "Emphasis".into(),
        NodeKind::Strong => "Strong".into(),
        NodeKind::Code(code) => format!("Code {code:?}"),
        NodeKind::Link { url, .. } => format!("Link {url:?}"),
        NodeKind::Image { url } => format!("Image {url:?}"),
        NodeKind::List { start: Some(n) } => format!("List({n})"),
        NodeKind::List { start: None } => "List".into(),
        NodeKind::Item => "Item".into(),
        NodeKind::BlockQuote => "BlockQuote".into(),
        NodeKind::CodeBlock { literal, .. } => format!("CodeBlock {literal:?}"),
        NodeKind::Heading { level } => format!("Heading({level})"),
        NodeKind::ThematicBreak => "ThematicBreak".into(),
        NodeKind::SoftBreak => "SoftBreak".into(),
        NodeKind::HardBreak => "HardBreak".into(),
        NodeKind::HtmlBlock(html) => format!("HtmlBlock {html:?}"),
        NodeKind::HtmlInline(html) => format!("HtmlInline {html:?}"),
        NodeKind::FootnoteDefinition(label) => format!("FootnoteDefinition {label:?}"),
        NodeKind::FootnoteReference(label) => format!("FootnoteReference {label:?}"),
        NodeKind::Unsupported(name) => format!("Unsupported({name})"),
        NodeKind::Command(command) => {
            let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
            format!("Command({}) {args:?}", command.kind.name())
        }
        NodeKind::Section(kind) => format!("Section({})", kind.name()),
        NodeKind::Inline(target) => format!("Inline({} {})", target.kind.name(), target.name),
        NodeKind::Verbatim(content) => format!("Verbatim {content:?}"),
    }
}
