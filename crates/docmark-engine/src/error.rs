use thiserror::Error;

use crate::parsing::tree::SourcePos;

/// A structural error in a comment, tied to a position in the comment text.
///
/// `line` and `column` are 1-based; the column counts characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(pos: SourcePos, message: impl Into<String>) -> Self {
        Self {
            line: pos.line,
            column: pos.column,
            message: message.into(),
        }
    }
}

/// Errors raised while setting up a [`crate::CommentParser`].
#[derive(Debug, Error)]
pub enum CommentError {
    #[error("unknown command kind `{name}` in configuration")]
    UnknownKind { name: String },

    #[error("invalid pattern for `{name}`: {source}")]
    InvalidPattern {
        name: String,
        source: regex::Error,
    },
}
