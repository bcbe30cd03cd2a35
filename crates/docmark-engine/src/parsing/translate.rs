//! Translator: nested syntax tree into [`ParsedComment`].
//!
//! By the time the tree gets here every top-level child is a section, an
//! inline comment or a line command, so the walk is a plain recursive
//! descent. Errors carry the position of the offending node.

use crate::{
    error::ParseError,
    kinds::{CommandKind, SectionKind},
    markup::{
        Block, BriefSection, DetachedBinding, DetailsSection, DocComment, ExcludeMode, Group,
        Metadata, NamedSection, ParsedComment, Phrasing, Section, UnmatchedDocComment,
    },
    parsing::tree::{Command, LineIndex, NodeId, NodeKind, SyntaxTree},
};

/// URL scheme marking a link to a documented entity.
pub const DOCUMENTATION_SCHEME: &str = "docmark://";

/// Remote designations seen so far in a detached comment.
#[derive(Debug, Default)]
struct Remote {
    entity: Option<String>,
    file: bool,
}

impl Remote {
    fn is_set(&self) -> bool {
        self.entity.is_some() || self.file
    }
}

pub struct Translator<'a> {
    source: &'a str,
    lines: &'a LineIndex,
    has_matching_entity: bool,
}

impl<'a> Translator<'a> {
    pub fn new(source: &'a str, lines: &'a LineIndex, has_matching_entity: bool) -> Self {
        Self {
            source,
            lines,
            has_matching_entity,
        }
    }

    pub fn translate(&self, tree: &SyntaxTree) -> Result<ParsedComment, ParseError> {
        let mut remote = Remote::default();
        let mut comment = DocComment::default();
        let mut inlines = Vec::new();

        for &child in tree.children(tree.root()) {
            if let NodeKind::Inline(target) = tree.kind(child) {
                let mut inline = DocComment::default();
                for &part in tree.children(child) {
                    self.comment_part(tree, part, &mut inline, &mut remote)?;
                }
                inlines.push(UnmatchedDocComment {
                    target: target.clone(),
                    comment: inline,
                });
            } else {
                self.comment_part(tree, child, &mut comment, &mut remote)?;
            }
        }

        let binding = self.binding(&mut comment, remote);
        Ok(ParsedComment {
            comment,
            inlines,
            binding,
        })
    }

    fn binding(&self, comment: &mut DocComment, remote: Remote) -> Option<DetachedBinding> {
        if self.has_matching_entity {
            return None;
        }
        match remote {
            Remote {
                entity: Some(name), ..
            } => Some(DetachedBinding::Entity(name)),
            Remote { file: true, .. } => Some(DetachedBinding::File),
            _ => comment.metadata.module.take().map(DetachedBinding::Module),
        }
    }

    fn comment_part(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        comment: &mut DocComment,
        remote: &mut Remote,
    ) -> Result<(), ParseError> {
        match tree.kind(node) {
            NodeKind::Command(command) => {
                self.command(tree, node, command, &mut comment.metadata, remote)
            }
            NodeKind::Section(SectionKind::Brief) => {
                let content =
                    self.phrasing_section(tree, node, SectionKind::Brief, comment, remote)?;
                if !content.is_empty() {
                    comment.brief = Some(BriefSection { content });
                }
                Ok(())
            }
            NodeKind::Section(SectionKind::Details) => {
                let mut blocks = Vec::new();
                for &child in tree.children(node) {
                    match tree.kind(child) {
                        NodeKind::Command(command) => {
                            self.command(tree, child, command, &mut comment.metadata, remote)?
                        }
                        _ => blocks.push(self.block(tree, child)?),
                    }
                }
                if !blocks.is_empty() {
                    comment
                        .sections
                        .push(Section::Details(DetailsSection { blocks }));
                }
                Ok(())
            }
            NodeKind::Section(kind) => {
                let content = self.phrasing_section(tree, node, *kind, comment, remote)?;
                comment.sections.push(Section::Named(NamedSection {
                    kind: *kind,
                    content,
                }));
                Ok(())
            }
            other => Err(self.error(
                tree,
                node,
                format!("unexpected {} in a documentation comment", other.describe()),
            )),
        }
    }

    /// Paragraphs of a brief or named section, flattened into one run.
    fn phrasing_section(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        kind: SectionKind,
        comment: &mut DocComment,
        remote: &mut Remote,
    ) -> Result<Vec<Phrasing>, ParseError> {
        let mut content = Vec::new();
        for &child in tree.children(node) {
            match tree.kind(child) {
                NodeKind::Command(command) => {
                    self.command(tree, child, command, &mut comment.metadata, remote)?
                }
                NodeKind::Paragraph => {
                    if !content.is_empty() {
                        content.push(Phrasing::SoftBreak);
                    }
                    content.extend(self.phrasing(tree, child)?);
                }
                other => {
                    return Err(self.error(
                        tree,
                        child,
                        format!(
                            "{} is not allowed in a `{}` section",
                            other.describe(),
                            kind.name()
                        ),
                    ));
                }
            }
        }

        while matches!(content.last(), Some(Phrasing::SoftBreak | Phrasing::HardBreak)) {
            content.pop();
        }
        let leading = content
            .iter()
            .take_while(|p| matches!(p, Phrasing::SoftBreak | Phrasing::HardBreak))
            .count();
        content.drain(..leading);
        Ok(content)
    }

    fn command(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        command: &Command,
        metadata: &mut Metadata,
        remote: &mut Remote,
    ) -> Result<(), ParseError> {
        let name = command.kind.name();
        let required = |index: usize| {
            command.arg(index).map(str::to_string).ok_or_else(|| {
                self.error(tree, node, format!("`{name}` command requires an argument"))
            })
        };
        let set_once = |slot_is_set: bool| {
            if slot_is_set {
                Err(self.error(tree, node, format!("multiple `{name}` commands")))
            } else {
                Ok(())
            }
        };

        match command.kind {
            CommandKind::Exclude => {
                set_once(metadata.exclude.is_some())?;
                metadata.exclude = Some(match command.arg(0) {
                    Some("return") => ExcludeMode::Return,
                    Some("target") => ExcludeMode::Target,
                    _ => ExcludeMode::Entity,
                });
            }
            CommandKind::UniqueName => {
                set_once(metadata.unique_name.is_some())?;
                metadata.unique_name = Some(required(0)?);
            }
            CommandKind::OutputName => {
                set_once(metadata.output_name.is_some())?;
                metadata.output_name = Some(required(0)?);
            }
            CommandKind::Synopsis => {
                set_once(metadata.synopsis.is_some())?;
                metadata.synopsis = Some(required(0)?);
            }
            CommandKind::Group => {
                set_once(metadata.group.is_some())?;
                metadata.group = Some(Group {
                    name: required(1)?,
                    heading: command.arg(2).map(str::to_string),
                    is_output_section: command.arg(0) == Some("-"),
                });
            }
            CommandKind::Module => {
                set_once(metadata.module.is_some())?;
                metadata.module = Some(required(0)?);
            }
            CommandKind::OutputSection => {
                set_once(metadata.output_section.is_some())?;
                metadata.output_section = Some(required(0)?);
            }
            CommandKind::Entity | CommandKind::File => {
                if self.has_matching_entity {
                    return Err(self.error(
                        tree,
                        node,
                        format!(
                            "`{name}` command is not allowed on a comment attached to a declaration"
                        ),
                    ));
                }
                if remote.is_set() {
                    return Err(self.error(tree, node, "multiple remote designations"));
                }
                if command.kind == CommandKind::Entity {
                    remote.entity = Some(required(0)?);
                } else {
                    remote.file = true;
                }
            }
            CommandKind::End => {
                return Err(self.error(tree, node, "unexpected `end` command"));
            }
        }
        Ok(())
    }

    fn block(&self, tree: &SyntaxTree, node: NodeId) -> Result<Block, ParseError> {
        let block = match tree.kind(node) {
            NodeKind::Paragraph => Block::Paragraph {
                content: self.phrasing(tree, node)?,
            },
            NodeKind::List { start } => Block::List {
                start: *start,
                items: tree
                    .children(node)
                    .iter()
                    .map(|&item| self.item(tree, item))
                    .collect::<Result<_, _>>()?,
            },
            NodeKind::BlockQuote => Block::BlockQuote {
                blocks: self.blocks(tree, node)?,
            },
            NodeKind::CodeBlock { language, literal } => Block::CodeBlock {
                language: language.clone(),
                code: literal.clone(),
            },
            NodeKind::Heading { level: 1 } => Block::Heading {
                content: self.phrasing(tree, node)?,
            },
            NodeKind::Heading { level } => Block::Subheading {
                level: *level,
                content: self.phrasing(tree, node)?,
            },
            NodeKind::ThematicBreak => Block::ThematicBreak,
            other => return Err(self.not_allowed(tree, node, other)),
        };
        Ok(block)
    }

    fn blocks(&self, tree: &SyntaxTree, node: NodeId) -> Result<Vec<Block>, ParseError> {
        tree.children(node)
            .iter()
            .map(|&child| self.block(tree, child))
            .collect()
    }

    /// Blocks of a list item; tight items hold inline content directly, which
    /// is wrapped into paragraphs.
    fn item(&self, tree: &SyntaxTree, item: NodeId) -> Result<Vec<Block>, ParseError> {
        let mut blocks = Vec::new();
        let mut run: Vec<Phrasing> = Vec::new();
        for &child in tree.children(item) {
            if is_phrasing(tree.kind(child)) {
                run.push(self.inline(tree, child)?);
                continue;
            }
            if !run.is_empty() {
                blocks.push(Block::Paragraph {
                    content: std::mem::take(&mut run),
                });
            }
            blocks.push(self.block(tree, child)?);
        }
        if !run.is_empty() {
            blocks.push(Block::Paragraph { content: run });
        }
        Ok(blocks)
    }

    fn phrasing(&self, tree: &SyntaxTree, node: NodeId) -> Result<Vec<Phrasing>, ParseError> {
        tree.children(node)
            .iter()
            .map(|&child| self.inline(tree, child))
            .collect()
    }

    fn inline(&self, tree: &SyntaxTree, node: NodeId) -> Result<Phrasing, ParseError> {
        let phrasing = match tree.kind(node) {
            NodeKind::Text(text) => Phrasing::Text { text: text.clone() },
            NodeKind::SoftBreak => Phrasing::SoftBreak,
            NodeKind::HardBreak => Phrasing::HardBreak,
            NodeKind::Emphasis => Phrasing::Emphasis {
                content: self.phrasing(tree, node)?,
            },
            NodeKind::Strong => Phrasing::Strong {
                content: self.phrasing(tree, node)?,
            },
            NodeKind::Code(code) => Phrasing::Code { code: code.clone() },
            NodeKind::Verbatim(content) => Phrasing::Verbatim {
                content: content.clone(),
            },
            NodeKind::Link { url, title, email } => {
                self.link(tree, node, url, title, *email)?
            }
            other => return Err(self.not_allowed(tree, node, other)),
        };
        Ok(phrasing)
    }

    fn link(
        &self,
        tree: &SyntaxTree,
        node: NodeId,
        url: &str,
        title: &str,
        email: bool,
    ) -> Result<Phrasing, ParseError> {
        let content = self.phrasing(tree, node)?;

        if let Some(target) = url.strip_prefix(DOCUMENTATION_SCHEME) {
            return Ok(Phrasing::DocumentationLink {
                target: target.trim_end_matches('/').to_string(),
                relative: false,
                title: title.to_string(),
                content,
            });
        }

        if url.is_empty() {
            if !title.is_empty() {
                let (target, relative) = split_relative(title);
                return Ok(Phrasing::DocumentationLink {
                    target: target.to_string(),
                    relative,
                    title: String::new(),
                    content,
                });
            }
            if let [Phrasing::Text { text }] = content.as_slice() {
                let (target, relative) = split_relative(text);
                return Ok(Phrasing::DocumentationLink {
                    target: target.to_string(),
                    relative,
                    title: String::new(),
                    content: vec![Phrasing::text(target)],
                });
            }
        }

        let url = if email {
            format!("mailto:{url}")
        } else {
            url.to_string()
        };
        Ok(Phrasing::ExternalLink {
            url,
            title: title.to_string(),
            content,
        })
    }

    fn not_allowed(&self, tree: &SyntaxTree, node: NodeId, kind: &NodeKind) -> ParseError {
        self.error(
            tree,
            node,
            format!("{} is not allowed in a documentation comment", kind.describe()),
        )
    }

    fn error(&self, tree: &SyntaxTree, node: NodeId, message: impl Into<String>) -> ParseError {
        ParseError::new(
            self.lines.position(self.source, tree.span(node).start),
            message,
        )
    }
}

/// `?name` and `*name` are names relative to the documented entity.
fn split_relative(name: &str) -> (&str, bool) {
    match name.strip_prefix(['?', '*']) {
        Some(rest) => (rest, true),
        None => (name, false),
    }
}

fn is_phrasing(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text(_)
            | NodeKind::SoftBreak
            | NodeKind::HardBreak
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Code(_)
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::Verbatim(_)
            | NodeKind::HtmlInline(_)
            | NodeKind::FootnoteReference(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_markers_are_stripped() {
        assert_eq!(split_relative("?foo"), ("foo", true));
        assert_eq!(split_relative("*bar::baz"), ("bar::baz", true));
        assert_eq!(split_relative("plain"), ("plain", false));
    }
}
