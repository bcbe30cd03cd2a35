//! Tree-level tests for the parse pipeline.
//!
//! Every case runs the passes up to nesting, checks the tree invariants and
//! compares the outline against an inline snapshot.

use docmark_config::CommentConfig;
use insta::assert_snapshot;

use crate::parsing::{CommentParser, snapshot, tree::LineIndex};

fn nested(source: &str) -> String {
    let parser = CommentParser::new(&CommentConfig::default()).unwrap();
    let lines = LineIndex::new(source);
    let tree = parser.nested_tree(source, &lines).unwrap();
    snapshot::invariants(&tree, source.len());
    snapshot::outline(&tree)
}

fn nesting_error(source: &str) -> String {
    let parser = CommentParser::new(&CommentConfig::default()).unwrap();
    let lines = LineIndex::new(source);
    parser.nested_tree(source, &lines).unwrap_err().to_string()
}

#[test]
fn first_sentence_is_the_brief() {
    assert_snapshot!(nested("First sentence. Second sentence."), @r#"
    Section(brief)
      Paragraph
        Text "First sentence."
    Section(details)
      Paragraph
        Text "Second sentence."
    "#);
}

#[test]
fn explicit_end_closes_a_section() {
    assert_snapshot!(nested("\\effects A\n\\end\nB"), @r#"
    Section(effects)
      Paragraph
        Text "A"
    Section(details)
      Paragraph
        Text "B"
    "#);
}

#[test]
fn end_reaches_across_paragraphs() {
    assert_snapshot!(nested("\\notes One.\n\nTwo.\n\\end\nThree."), @r#"
    Section(notes)
      Paragraph
        Text "One."
      Paragraph
        Text "Two."
    Section(details)
      Paragraph
        Text "Three."
    "#);
}

#[test]
fn hard_break_ends_an_implicit_section() {
    assert_snapshot!(nested("\\returns A  \nB"), @r#"
    Section(returns)
      Paragraph
        Text "A"
    Section(details)
      Paragraph
        Text "B"
    "#);
}

#[test]
fn sections_follow_the_brief() {
    assert_snapshot!(nested("A brief.\n\n\\returns A value.\n\\see other"), @r#"
    Section(brief)
      Paragraph
        Text "A brief."
    Section(returns)
      Paragraph
        Text "A value."
    Section(see)
      Paragraph
        Text "other"
    "#);
}

#[test]
fn repeated_section_stays_separate() {
    assert_snapshot!(nested("\\returns A\n\\returns B"), @r#"
    Section(returns)
      Paragraph
        Text "A"
    Section(returns)
      Paragraph
        Text "B"
    "#);
}

#[test]
fn inline_comment_has_its_own_brief_and_details() {
    assert_snapshot!(nested("\\param a Brief.\nDetails."), @r#"
    Inline(param a)
      Section(brief)
        Paragraph
          Text "Brief."
      Section(details)
        Paragraph
          Text "Details."
    "#);
}

#[test]
fn command_line_after_a_quote_opens_a_section() {
    assert_snapshot!(nested("> quote\n\\returns x"), @r#"
    Section(details)
      BlockQuote
        Paragraph
          Text "quote"
    Section(returns)
      Paragraph
        Text "x"
    "#);
}

#[test]
fn rule_after_a_section_line_is_a_thematic_break() {
    assert_snapshot!(nested("\\notes A\n---"), @r#"
    Section(notes)
      Paragraph
        Text "A"
    Section(details)
      ThematicBreak
    "#);
}

#[test]
fn leading_list_rules_out_the_brief() {
    assert_snapshot!(nested("- item\n\nText."), @r#"
    Section(details)
      List
        Item
          Text "item"
      Paragraph
        Text "Text."
    "#);
}

#[test]
fn leading_heading_rules_out_the_brief() {
    assert_snapshot!(nested("# Title\n\nBody."), @r#"
    Section(details)
      Heading(1)
        Text "Title"
      Paragraph
        Text "Body."
    "#);
}

#[test]
fn transparent_command_does_not_end_a_section() {
    assert_snapshot!(nested("\\returns A\n\\exclude\nB"), @r#"
    Section(returns)
      Paragraph
        Text "A"
    Command(exclude) [""]
    Section(details)
      Paragraph
        Text "B"
    "#);
}

#[test]
fn verbatim_is_one_leaf() {
    assert_snapshot!(nested("\\verbatim a < b \\end"), @r#"
    Section(brief)
      Paragraph
        Verbatim "a < b "
    "#);
}

#[test]
fn template_arguments_stay_text() {
    assert_snapshot!(nested("Returns std::vector<T>."), @r#"
    Section(brief)
      Paragraph
        Text "Returns std::vector<T>."
    "#);
}

#[test]
fn unknown_command_stays_literal() {
    assert_snapshot!(nested("\\seealso foo"), @r#"
    Section(brief)
      Paragraph
        Text "\\seealso foo"
    "#);
}

#[test]
fn empty_comment_has_no_nodes() {
    assert_eq!(nested(""), "");
}

#[test]
fn stray_end_is_an_error() {
    assert_eq!(
        nesting_error("Text.\n\n\\end"),
        "3:1: `end` command without a section or inline comment to close"
    );
}

#[test]
fn footnote_definition_is_an_error() {
    assert_eq!(
        nesting_error("Brief.\n\n[^1]: note"),
        "3:1: footnote definition is not allowed in a documentation comment"
    );
}
