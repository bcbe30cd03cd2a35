pub mod error;
pub mod kinds;
pub mod markup;
pub mod parsing;

// Re-export key types for easier usage
pub use docmark_config::CommentConfig;
pub use error::{CommentError, ParseError};
pub use kinds::{CommandKind, InlineKind, SectionKind};
pub use markup::*;
pub use parsing::CommentParser;
