use serde::Serialize;

/// Phrasing (inline) content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Phrasing {
    Text {
        text: String,
    },
    SoftBreak,
    HardBreak,
    Emphasis {
        content: Vec<Phrasing>,
    },
    Strong {
        content: Vec<Phrasing>,
    },
    Code {
        code: String,
    },
    /// Raw text taken from the comment without any Markdown interpretation.
    Verbatim {
        content: String,
    },
    ExternalLink {
        url: String,
        title: String,
        content: Vec<Phrasing>,
    },
    /// A link to another documented entity, resolved later by name.
    DocumentationLink {
        target: String,
        /// The name is relative to the documented entity (`?name` or `*name`).
        relative: bool,
        title: String,
        content: Vec<Phrasing>,
    },
}

impl Phrasing {
    pub fn text(text: impl Into<String>) -> Self {
        Phrasing::Text { text: text.into() }
    }

    /// Appends the text a reader would see, breaks as single spaces or newlines.
    pub fn write_plain(&self, out: &mut String) {
        match self {
            Phrasing::Text { text } => out.push_str(text),
            Phrasing::SoftBreak => out.push(' '),
            Phrasing::HardBreak => out.push('\n'),
            Phrasing::Code { code } => out.push_str(code),
            Phrasing::Verbatim { content } => out.push_str(content),
            Phrasing::Emphasis { content }
            | Phrasing::Strong { content }
            | Phrasing::ExternalLink { content, .. }
            | Phrasing::DocumentationLink { content, .. } => {
                content.iter().for_each(|p| p.write_plain(out))
            }
        }
    }
}

/// Plain text of a phrasing run.
pub fn plain_text(content: &[Phrasing]) -> String {
    let mut out = String::new();
    for p in content {
        p.write_plain(&mut out);
    }
    out
}

/// Block content of a details section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        content: Vec<Phrasing>,
    },
    List {
        /// First number of an ordered list; `None` for bullet lists.
        start: Option<u64>,
        items: Vec<Vec<Block>>,
    },
    BlockQuote {
        blocks: Vec<Block>,
    },
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// A level 1 heading.
    Heading {
        content: Vec<Phrasing>,
    },
    Subheading {
        level: u8,
        content: Vec<Phrasing>,
    },
    ThematicBreak,
}

impl Block {
    /// Plain text of the block; nested blocks are separated by newlines.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Paragraph { content }
            | Block::Heading { content }
            | Block::Subheading { content, .. } => plain_text(content),
            Block::List { items, .. } => items
                .iter()
                .map(|item| blocks_plain_text(item))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::BlockQuote { blocks } => blocks_plain_text(blocks),
            Block::CodeBlock { code, .. } => code.clone(),
            Block::ThematicBreak => String::new(),
        }
    }
}

pub fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_flattens_markup() {
        let content = vec![
            Phrasing::text("See "),
            Phrasing::DocumentationLink {
                target: "foo".into(),
                relative: false,
                title: String::new(),
                content: vec![Phrasing::Code { code: "foo()".into() }],
            },
            Phrasing::SoftBreak,
            Phrasing::Emphasis {
                content: vec![Phrasing::text("now")],
            },
        ];
        assert_eq!(plain_text(&content), "See foo() now");
    }

    #[test]
    fn list_items_are_lines() {
        let list = Block::List {
            start: None,
            items: vec![
                vec![Block::Paragraph {
                    content: vec![Phrasing::text("a")],
                }],
                vec![Block::Paragraph {
                    content: vec![Phrasing::text("b")],
                }],
            ],
        };
        assert_eq!(list.plain_text(), "a\nb");
    }
}
