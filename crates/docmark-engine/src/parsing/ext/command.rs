//! Command, section and inline recognition.
//!
//! # Pattern table
//!
//! Every kind owns one anchored regex, built from the command character, the
//! (possibly renamed) kind name and the kind's argument syntax, or taken
//! verbatim from the configuration. Patterns are tried in a fixed priority
//! order: commands, then sections, then inlines. The first match wins.
//!
//! # Line hook
//!
//! Candidates are lines starting at column 0 outside fenced code. Before the
//! engine runs, [`CommandExtension::block_breaks`] cuts the source in front
//! of every such line, so a command line after a list or a block quote closes
//! it instead of being read as a lazy continuation. Indented lines inside
//! list items and lines behind a `>` marker are never looked into. Patterns
//! run against the raw source line, so arguments such as `std::vector<T>`
//! reach the command unchanged even though the engine saw inline HTML in them.
//!
//! A matched line splits its paragraph in two around a marker node:
//!
//! ```text
//! Paragraph["intro", SB, "\returns the value", SB, "more"]
//!   => Paragraph["intro"], Section(returns), Paragraph["the value", SB, "more"]
//! ```
//!
//! Commands consume their whole line; sections and inlines consume only the
//! matched prefix and the rest of the line opens the following paragraph.

use docmark_config::CommentConfig;
use regex::Regex;

use crate::{
    error::CommentError,
    kinds::{CommandKind, InlineKind, SectionKind},
    parsing::tree::{Command, InlineTarget, LineIndex, NodeId, NodeKind, Span, SyntaxTree},
};

/// A successful match of one line against the pattern table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub kind: NodeKind,
    /// Bytes of the line consumed by the match.
    pub consumed: usize,
    /// Whether the rest of the line belongs to the command.
    pub whole_line: bool,
}

/// Compiled patterns for all command kinds, in matching priority order.
#[derive(Debug, Clone)]
pub struct PatternTable {
    command_character: char,
    commands: Vec<(CommandKind, Regex)>,
    sections: Vec<(SectionKind, Regex)>,
    inlines: Vec<(InlineKind, Regex)>,
}

impl PatternTable {
    pub fn from_config(config: &CommentConfig) -> Result<Self, CommentError> {
        for name in config.commands.keys().chain(config.patterns.keys()) {
            if !is_known_kind(name) {
                return Err(CommentError::UnknownKind { name: name.clone() });
            }
        }

        let compile = |kind: &str, suffix: &str| -> Result<Regex, CommentError> {
            let pattern = match config.patterns.get(kind) {
                Some(pattern) => pattern.clone(),
                None => {
                    let spelled = format!(
                        "{}{}",
                        config.command_character,
                        config.command_name(kind)
                    );
                    format!("^{}{suffix}", regex::escape(&spelled))
                }
            };
            Regex::new(&pattern).map_err(|source| CommentError::InvalidPattern {
                name: kind.to_string(),
                source,
            })
        };

        Ok(Self {
            command_character: config.command_character,
            commands: CommandKind::ALL
                .into_iter()
                .map(|k| compile(k.name(), k.argument_pattern()).map(|re| (k, re)))
                .collect::<Result<_, _>>()?,
            sections: SectionKind::ALL
                .into_iter()
                .map(|k| compile(k.name(), r"(?:\s+|$)").map(|re| (k, re)))
                .collect::<Result<_, _>>()?,
            inlines: InlineKind::ALL
                .into_iter()
                .map(|k| compile(k.name(), r"\s+(\S+)(?:\s+|$)").map(|re| (k, re)))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn command_character(&self) -> char {
        self.command_character
    }

    /// Matches a raw line (without its newline) against all patterns.
    pub fn match_line(&self, line: &str) -> Option<LineMatch> {
        if !line.starts_with(self.command_character) {
            return None;
        }

        for (kind, re) in &self.commands {
            if let Some(caps) = re.captures(line).filter(|c| anchored(c)) {
                let args = (1..caps.len())
                    .map(|i| caps.get(i).map_or("", |m| m.as_str()).to_string())
                    .collect();
                return Some(LineMatch {
                    kind: NodeKind::Command(Command { kind: *kind, args }),
                    consumed: line.len(),
                    whole_line: true,
                });
            }
        }

        for (kind, re) in &self.sections {
            if let Some(m) = re.find(line).filter(|m| m.start() == 0) {
                return Some(LineMatch {
                    kind: NodeKind::Section(*kind),
                    consumed: m.end(),
                    whole_line: false,
                });
            }
        }

        for (kind, re) in &self.inlines {
            if let Some(caps) = re.captures(line).filter(|c| anchored(c)) {
                let name = caps.get(1).map_or("", |m| m.as_str()).to_string();
                return Some(LineMatch {
                    kind: NodeKind::Inline(InlineTarget { kind: *kind, name }),
                    consumed: caps.get(0).map_or(0, |m| m.end()),
                    whole_line: false,
                });
            }
        }

        None
    }
}

fn anchored(caps: &regex::Captures<'_>) -> bool {
    caps.get(0).is_some_and(|m| m.start() == 0)
}

fn is_known_kind(name: &str) -> bool {
    CommandKind::ALL.iter().any(|k| k.name() == name)
        || SectionKind::ALL.iter().any(|k| k.name() == name)
        || InlineKind::ALL.iter().any(|k| k.name() == name)
}

/// The per-line block-open hook.
pub struct CommandExtension<'a> {
    patterns: &'a PatternTable,
    source: &'a str,
    lines: &'a LineIndex,
}

impl<'a> CommandExtension<'a> {
    pub fn new(patterns: &'a PatternTable, source: &'a str, lines: &'a LineIndex) -> Self {
        Self {
            patterns,
            source,
            lines,
        }
    }

    /// Line starts where the engine must begin a fresh block context.
    ///
    /// Every recognized line at column 0 closes whatever list, quote or
    /// paragraph is open above it. A setext underline right after such a
    /// line is cut off as well, so it never turns the line into a heading.
    /// Lines inside top-level fenced code blocks are not looked at.
    pub fn block_breaks(&self) -> Vec<usize> {
        let mut breaks = Vec::new();
        let mut fence: Option<Fence> = None;
        let mut after_match = false;
        for start in self.lines.line_starts() {
            let end = self.lines.line_end(self.source, start);
            let Some(line) = self.source.get(start..end) else {
                continue;
            };

            if let Some(open) = &fence {
                if open.is_closed_by(line) {
                    fence = None;
                }
                after_match = false;
                continue;
            }
            if let Some(open) = Fence::open(line) {
                fence = Some(open);
                after_match = false;
                continue;
            }

            let matched = self.patterns.match_line(line).is_some();
            if matched || (after_match && is_setext_underline(line)) {
                breaks.push(start);
            }
            after_match = matched;
        }
        breaks
    }

    /// Splits every top-level paragraph around its command lines.
    pub fn open_blocks(&self, tree: &mut SyntaxTree) {
        let root = tree.root();
        let children = tree.take_children(root);
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            if matches!(tree.kind(child), NodeKind::Paragraph) {
                self.split_paragraph(tree, child, &mut out);
            } else {
                out.push(child);
            }
        }
        tree.set_children(root, out);
    }

    fn split_paragraph(&self, tree: &mut SyntaxTree, para: NodeId, out: &mut Vec<NodeId>) {
        let mut lines: Vec<(Vec<NodeId>, Option<NodeId>)> = Vec::new();
        let mut line = Vec::new();
        for child in tree.take_children(para) {
            if tree.kind(child).is_break() {
                lines.push((std::mem::take(&mut line), Some(child)));
            } else {
                line.push(child);
            }
        }
        if !line.is_empty() {
            lines.push((line, None));
        }

        let mut current: Vec<NodeId> = Vec::new();
        let mut changed = false;
        for (nodes, line_break) in lines {
            let Some((line_match, line_span)) = nodes.first().and_then(|&n| self.match_line(&*tree, n))
            else {
                current.extend(nodes);
                current.extend(line_break);
                continue;
            };

            changed = true;
            flush_paragraph(tree, &mut current, out);
            out.push(tree.alloc(line_match.kind, line_span));

            if !line_match.whole_line {
                let cut = line_span.start + line_match.consumed;
                let rest = self.rest_of_line(tree, &nodes, cut);
                if !rest.is_empty() {
                    current = rest;
                    current.extend(line_break);
                }
            }
        }

        if changed {
            flush_paragraph(tree, &mut current, out);
        } else {
            tree.set_children(para, current);
            out.push(para);
        }
    }

    fn match_line(&self, tree: &SyntaxTree, first: NodeId) -> Option<(LineMatch, Span)> {
        let start = tree.span(first).start;
        let end = self.lines.line_end(self.source, start);
        let line = self.source.get(start..end)?;
        let m = self.patterns.match_line(line)?;
        Some((m, Span::new(start, end)))
    }

    /// Nodes of a line after byte offset `cut`; a text node straddling the cut is shortened.
    fn rest_of_line(&self, tree: &mut SyntaxTree, nodes: &[NodeId], cut: usize) -> Vec<NodeId> {
        let mut rest = Vec::new();
        for &node in nodes {
            let span = tree.span(node);
            if span.end <= cut {
                continue;
            }
            if span.start < cut {
                if let Some(text) = tree.text(node) {
                    let raw = &self.source[span.start..cut];
                    let remainder = match text.strip_prefix(raw) {
                        Some(r) => r,
                        None => &self.source[cut..span.end],
                    };
                    let remainder = remainder.trim_start().to_string();
                    if remainder.is_empty() {
                        continue;
                    }
                    tree.set_kind(node, NodeKind::Text(remainder));
                    tree.set_span(node, Span::new(cut, span.end));
                }
            }
            rest.push(node);
        }
        rest
    }
}

/// An open fenced code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A fence opener: up to three spaces, then three or more backticks or tildes.
    fn open(line: &str) -> Option<Self> {
        let body = strip_indent(line)?;
        let marker = body.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = body.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        if marker == '`' && body[len..].contains('`') {
            return None;
        }
        Some(Self { marker, len })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(body) = strip_indent(line) else {
            return false;
        };
        let len = body.chars().take_while(|&c| c == self.marker).count();
        len >= self.len && body[len..].trim().is_empty()
    }
}

/// The line without up to three spaces of indentation; `None` for indented code.
fn strip_indent(line: &str) -> Option<&str> {
    let body = line.trim_start_matches(' ');
    (line.len() - body.len() <= 3).then_some(body)
}

fn is_setext_underline(line: &str) -> bool {
    let Some(body) = strip_indent(line) else {
        return false;
    };
    let body = body.trim_end();
    !body.is_empty() && (body.chars().all(|c| c == '=') || body.chars().all(|c| c == '-'))
}

fn flush_paragraph(tree: &mut SyntaxTree, current: &mut Vec<NodeId>, out: &mut Vec<NodeId>) {
    while current.last().is_some_and(|&n| tree.kind(n).is_break()) {
        current.pop();
    }
    if !current.is_empty() {
        out.push(tree.alloc_parent(NodeKind::Paragraph, std::mem::take(current)));
    }
}
