//! Import tests for the markdown format (markdown → document tree)
//!
//! These tests go through the public `Format` API and check the resulting
//! tree structure, depths included.

use crate::{fixture, init_logger};
use sticky_babel::format::Format;
use sticky_babel::formats::markdown::MarkdownFormat;
use sticky_babel::{BlockKind, BlockNode, DocumentTree, FormattingRules, InlineSpan};

fn md_to_tree(md: &str) -> DocumentTree {
    init_logger();
    MarkdownFormat::default()
        .parse(md)
        .expect("markdown parsing never fails")
}

fn kinds(nodes: &[BlockNode]) -> Vec<&'static str> {
    nodes.iter().map(|node| node.kind.name()).collect()
}

#[test]
fn test_messy_note_structure() {
    let tree = md_to_tree(&fixture("messy-note.md"));

    assert_eq!(
        kinds(&tree.children),
        vec![
            "Heading",
            "Paragraph",
            "TaskList",
            "Paragraph",
            "OrderedList",
            "Paragraph",
            "Paragraph",
            "Blockquote",
            "CodeBlock",
        ]
    );
    assert_eq!(tree.children[0].kind, BlockKind::Heading(1));
    assert!(tree.children[1].is_blank());

    let tasks = &tree.children[2];
    assert_eq!(tasks.children.len(), 2);
    assert_eq!(tasks.children[0].kind, BlockKind::TaskItem { checked: true });
    assert_eq!(tasks.children[1].kind, BlockKind::TaskItem { checked: false });

    let nested = &tasks.children[1].children[0];
    assert_eq!(nested.kind, BlockKind::BulletList);
    assert_eq!(nested.depth, 1);
    assert_eq!(nested.children.len(), 2);
    assert!(nested.children.iter().all(|item| item.depth == 1));

    assert_eq!(
        tree.children[6].content,
        vec![InlineSpan::text("Some text\ncontinues here.")]
    );
    assert_eq!(
        tree.children[8].kind,
        BlockKind::CodeBlock {
            language: Some("js".to_string()),
            lines: vec!["let x = 1;".to_string(), String::new()],
        }
    );
}

#[test]
fn test_inline_spans_in_items() {
    let tree = md_to_tree("- [ ] call [Ann](note://ann) about **the** *party*");
    let item = &tree.children[0].children[0];

    assert_eq!(
        item.content,
        vec![
            InlineSpan::text("call "),
            InlineSpan::Link {
                href: "note://ann".to_string(),
                children: vec![InlineSpan::text("Ann")],
            },
            InlineSpan::text(" about "),
            InlineSpan::Bold(vec![InlineSpan::text("the")]),
            InlineSpan::text(" "),
            InlineSpan::Italic(vec![InlineSpan::text("party")]),
        ]
    );
}

#[test]
fn test_half_typed_input_is_kept() {
    let tree = md_to_tree("- [\n- [x\n```");

    let list = &tree.children[0];
    assert_eq!(list.kind, BlockKind::BulletList);
    assert_eq!(list.children[0].content, vec![InlineSpan::text("[")]);
    assert_eq!(list.children[1].content, vec![InlineSpan::text("[x")]);
    assert_eq!(
        tree.children[1].kind,
        BlockKind::CodeBlock {
            language: None,
            lines: vec![],
        }
    );
}

#[test]
fn test_three_levels_of_tasks() {
    let tree = md_to_tree("- [ ] a\n  - [ ] b\n    - [x] c");

    let a = &tree.children[0].children[0];
    let b = &a.children[0].children[0];
    let c = &b.children[0].children[0];
    assert_eq!((a.depth, b.depth, c.depth), (0, 1, 2));
    assert_eq!(c.kind, BlockKind::TaskItem { checked: true });
}

#[test]
fn test_custom_indent_width() {
    init_logger();
    let rules = FormattingRules {
        indent_width: 4,
        ..FormattingRules::default()
    };
    let format = MarkdownFormat::new(rules);

    let flat = format.parse("- a\n  - b").unwrap();
    assert_eq!(flat.children[0].children.len(), 2);

    let nested = format.parse("- a\n    - b").unwrap();
    assert_eq!(nested.children[0].children.len(), 1);
    assert_eq!(kinds(&nested.children[0].children[0].children), vec!["BulletList"]);
}

#[test]
fn test_headings_and_rules() {
    let tree = md_to_tree("## Plan\n---\n####### seven");

    assert_eq!(tree.children[0].kind, BlockKind::Heading(2));
    assert_eq!(tree.children[1].kind, BlockKind::ThematicBreak);
    assert_eq!(tree.children[2].kind, BlockKind::Paragraph);
    assert_eq!(
        tree.children[2].content,
        vec![InlineSpan::text("####### seven")]
    );
}

#[test]
fn test_empty_and_blank_sources() {
    assert!(md_to_tree("").is_empty());
    assert!(md_to_tree("\n\n   \n\t").is_empty());
}
