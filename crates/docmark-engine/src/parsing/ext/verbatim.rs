//! Verbatim extension: `\verbatim <raw> \end` or to end of line.
//!
//! The engine has already split the raw text into events by the time we see
//! it, so the extension works on source offsets: it finds the opener in a
//! text event, takes the raw bytes straight from the comment text, and tells
//! the tree builder how far to skip.

use crate::parsing::tree::Span;

/// Opener and closer spelled with the configured command character.
#[derive(Debug, Clone)]
pub struct VerbatimExtension {
    open: String,
    close: String,
}

/// A verbatim run found inside a text event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbatimMatch {
    /// Bytes of the event text that precede the opener.
    pub text_before: usize,
    /// Span of the opener, content and closer in the source.
    pub span: Span,
    /// The raw content, exactly as written.
    pub content: String,
}

impl VerbatimExtension {
    pub const NAME: &'static str = "verbatim";

    pub fn new(command_character: char) -> Self {
        Self {
            open: format!("{command_character}{} ", Self::NAME),
            close: format!("{command_character}end"),
        }
    }

    /// Looks for an opener in the text event `text` that was produced from `span`.
    pub fn find(&self, source: &str, text: &str, span: Span) -> Option<VerbatimMatch> {
        let raw = source.get(span.start..span.end)?;
        let src_idx = raw.find(&self.open)?;
        let text_idx = text.find(&self.open)?;

        let open_start = span.start + src_idx;
        let content_start = open_start + self.open.len();
        let rest = &source[content_start..];
        let eol = rest.find('\n').unwrap_or(rest.len());

        let (content_end, consumed_end) = match rest[..eol].find(&self.close) {
            Some(i) => (content_start + i, content_start + i + self.close.len()),
            None => {
                let end = content_start + rest[..eol].trim_end_matches('\r').len();
                (end, end)
            }
        };

        Some(VerbatimMatch {
            text_before: text_idx,
            span: Span::new(open_start, consumed_end),
            content: source[content_start..content_end].to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(source: &str) -> Option<VerbatimMatch> {
        VerbatimExtension::new('\\').find(source, source, Span::new(0, source.len()))
    }

    #[test]
    fn runs_to_explicit_end() {
        let m = find("x \\verbatim a < b \\end y").unwrap();
        assert_eq!(m.text_before, 2);
        assert_eq!(m.content, "a < b ");
        assert_eq!(m.span, Span::new(2, 22));
    }

    #[test]
    fn runs_to_end_of_line() {
        let source = "\\verbatim *raw*\nnext";
        let m = find(source).unwrap();
        assert_eq!(m.content, "*raw*");
        assert_eq!(m.span.end, 15);
    }

    #[test]
    fn runs_to_end_of_input() {
        let m = find("\\verbatim tail").unwrap();
        assert_eq!(m.content, "tail");
        assert_eq!(m.span.end, 14);
    }

    #[test]
    fn closer_on_a_later_line_does_not_count() {
        let m = find("\\verbatim a\n\\end").unwrap();
        assert_eq!(m.content, "a");
    }

    #[test]
    fn opener_needs_trailing_space() {
        assert!(find("\\verbatim").is_none());
        assert!(find("\\verbatimx").is_none());
    }

    #[test]
    fn respects_command_character() {
        let ext = VerbatimExtension::new('@');
        let source = "@verbatim \\n @end";
        let m = ext.find(source, source, Span::new(0, source.len())).unwrap();
        assert_eq!(m.content, "\\n ");
    }
}
