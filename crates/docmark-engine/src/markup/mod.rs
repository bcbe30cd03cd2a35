//! # Documentation Markup
//!
//! The structured value a comment is parsed into, independent of the
//! Markdown engine and of any output format.
//!
//! - **`content`**: blocks and phrasing content
//! - **`metadata`**: values set by line commands (`\exclude`, `\group`, ...)
//!
//! A [`DocComment`] holds at most one brief and an ordered list of sections.
//! Documentation aimed at other entities ends up in [`UnmatchedDocComment`]s
//! next to it, and a comment not attached to a declaration carries a
//! [`DetachedBinding`] naming what it documents.

pub mod content;
pub mod metadata;

pub use content::{Block, Phrasing, blocks_plain_text, plain_text};
pub use metadata::{ExcludeMode, Group, Metadata};

use serde::Serialize;

use crate::kinds::{InlineKind, SectionKind};

/// Comment text with the comment markers already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText {
    pub text: String,
    /// The comment is attached to a declaration; otherwise it is detached.
    pub has_matching_entity: bool,
}

impl CommentText {
    pub fn new(text: impl Into<String>, has_matching_entity: bool) -> Self {
        Self {
            text: text.into(),
            has_matching_entity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BriefSection {
    pub content: Vec<Phrasing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailsSection {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedSection {
    pub kind: SectionKind,
    pub content: Vec<Phrasing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum Section {
    Details(DetailsSection),
    Named(NamedSection),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocComment {
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub brief: Option<BriefSection>,
    pub sections: Vec<Section>,
}

impl DocComment {
    /// A comment whose brief reports that the real comment could not be parsed.
    pub fn error_placeholder(error: impl std::fmt::Display) -> Self {
        Self {
            brief: Some(BriefSection {
                content: vec![Phrasing::text(format!(
                    "(error while parsing comment: {error})"
                ))],
            }),
            ..Self::default()
        }
    }

    pub fn brief_text(&self) -> Option<String> {
        self.brief.as_ref().map(|b| plain_text(&b.content))
    }

    /// Plain text of all details sections, separated by newlines.
    pub fn details_text(&self) -> Option<String> {
        let texts: Vec<String> = self
            .sections
            .iter()
            .filter_map(|s| match s {
                Section::Details(d) => Some(blocks_plain_text(&d.blocks)),
                Section::Named(_) => None,
            })
            .collect();
        (!texts.is_empty()).then(|| texts.join("\n"))
    }

    /// Named sections of `kind`, in encounter order.
    pub fn named(&self, kind: SectionKind) -> impl Iterator<Item = &NamedSection> {
        self.sections.iter().filter_map(move |s| match s {
            Section::Named(n) if n.kind == kind => Some(n),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty() && self.brief.is_none() && self.sections.is_empty()
    }
}

/// The entity an inline comment documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineTarget {
    pub kind: InlineKind,
    pub name: String,
}

/// An inline comment that still has to be matched to its entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedDocComment {
    pub target: InlineTarget,
    pub comment: DocComment,
}

/// What a detached comment documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "binding", content = "name", rename_all = "snake_case")]
pub enum DetachedBinding {
    Entity(String),
    File,
    Module(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedComment {
    pub comment: DocComment,
    pub inlines: Vec<UnmatchedDocComment>,
    pub binding: Option<DetachedBinding>,
}
