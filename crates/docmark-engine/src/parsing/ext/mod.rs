//! # Comment Extensions
//!
//! The comment-specific layers on top of the CommonMark engine, in the order
//! a parse applies them:
//!
//! - **`verbatim`**: `\verbatim` runs, hooked into tree building
//! - **`command`**: line commands, sections and inline comments
//! - **`html`**: raw HTML back into literal text
//! - **`nesting`**: the flat construct list into nested sections

pub mod command;
pub mod html;
pub mod nesting;
pub mod verbatim;
