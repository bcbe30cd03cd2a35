//! # Comment Parsing
//!
//! The parse pipeline, one fresh [`SyntaxTree`] per comment:
//!
//! ```text
//! text ─▶ block breaks ─▶ build_segments (+ verbatim) ─▶ command recognition ─▶ HTML neutralizer
//!      ─▶ nesting ─▶ translator ─▶ ParsedComment
//! ```
//!
//! [`CommentParser`] owns everything that outlives a single parse (the
//! compiled pattern table and the verbatim spelling) and is immutable, so one
//! parser can be shared between threads.

pub mod builder;
pub mod ext;
pub mod snapshot;
pub mod translate;
pub mod tree;

#[cfg(test)]
mod tests;

use docmark_config::CommentConfig;

use crate::{
    error::{CommentError, ParseError},
    markup::{CommentText, DocComment, ParsedComment},
};

use builder::build_segments;
use ext::{
    command::{CommandExtension, PatternTable},
    html::neutralize_html,
    nesting::Nesting,
    verbatim::VerbatimExtension,
};
use translate::Translator;
use tree::{LineIndex, SyntaxTree};

#[derive(Debug, Clone)]
pub struct CommentParser {
    patterns: PatternTable,
    verbatim: VerbatimExtension,
}

impl CommentParser {
    pub fn new(config: &CommentConfig) -> Result<Self, CommentError> {
        Ok(Self {
            patterns: PatternTable::from_config(config)?,
            verbatim: VerbatimExtension::new(config.command_character),
        })
    }

    pub fn command_character(&self) -> char {
        self.patterns.command_character()
    }

    /// Parses one comment.
    ///
    /// `has_matching_entity` tells whether the comment is attached to a
    /// declaration; detached comments may name their target with `\entity`,
    /// `\file` or `\module`.
    pub fn parse(&self, text: &str, has_matching_entity: bool) -> Result<ParsedComment, ParseError> {
        let lines = LineIndex::new(text);
        let tree = self.nested_tree(text, &lines)?;
        let parsed = Translator::new(text, &lines, has_matching_entity).translate(&tree)?;
        log::debug!(
            "parsed comment: {} section(s), {} inline comment(s), binding {:?}",
            parsed.comment.sections.len(),
            parsed.inlines.len(),
            parsed.binding
        );
        Ok(parsed)
    }

    pub fn parse_text(&self, comment: &CommentText) -> Result<ParsedComment, ParseError> {
        self.parse(&comment.text, comment.has_matching_entity)
    }

    /// Parses one comment, turning a structural error into a placeholder comment.
    pub fn parse_or_placeholder(&self, text: &str, has_matching_entity: bool) -> ParsedComment {
        self.parse(text, has_matching_entity)
            .unwrap_or_else(|error| {
                log::warn!("error while parsing comment: {error}");
                ParsedComment {
                    comment: DocComment::error_placeholder(&error),
                    inlines: Vec::new(),
                    binding: None,
                }
            })
    }

    /// Runs every pass up to and including nesting.
    pub fn nested_tree(&self, text: &str, lines: &LineIndex) -> Result<SyntaxTree, ParseError> {
        let recognition = CommandExtension::new(&self.patterns, text, lines);
        let breaks = recognition.block_breaks();
        let mut tree = build_segments(text, &self.verbatim, &breaks);
        log::trace!(
            "engine produced {} top-level node(s) from {} segment(s)",
            tree.children(tree.root()).len(),
            breaks.len() + 1
        );

        recognition.open_blocks(&mut tree);
        let root = tree.root();
        neutralize_html(&mut tree, root);
        log::trace!(
            "{} top-level node(s) after recognition",
            tree.children(root).len()
        );

        Nesting::new(text, lines).run(&mut tree)?;
        Ok(tree)
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    #[test]
    fn parser_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CommentParser>();
    }

    #[test]
    fn comment_text_carries_the_binding_flag() {
        let parser = CommentParser::new(&CommentConfig::default()).unwrap();
        assert_eq!(parser.command_character(), '\\');

        let parsed = parser
            .parse_text(&CommentText::new("\\file\n\nText.", false))
            .unwrap();
        assert_eq!(parsed.binding, Some(crate::markup::DetachedBinding::File));
    }

    #[test]
    fn placeholder_carries_the_error() {
        let parser = CommentParser::new(&CommentConfig::default()).unwrap();
        let parsed = parser.parse_or_placeholder("\\end", true);
        let brief = parsed.comment.brief_text().unwrap();
        assert!(brief.starts_with("(error while parsing comment: 1:1: "), "{brief}");
    }
}
