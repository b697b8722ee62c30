//! CommonMark cross-check
//!
//! Canonical note markdown must mean the same thing to a CommonMark (GFM task
//! list) reader as it does to the note parser. Both sides are reduced to a
//! pre-order outline of block kinds; paragraphs are left out since item
//! continuation lines are paragraphs of their own here and lazy continuations
//! in CommonMark.

use crate::{fixture, init_logger};
use comrak::nodes::{ListType, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};
use sticky_babel::common::links::collect_links;
use sticky_babel::{BlockKind, DocumentTree};

fn comrak_outline(md: &str) -> (Vec<String>, Vec<String>) {
    let arena = Arena::new();
    let mut options = ComrakOptions::default();
    options.extension.tasklist = true;
    let root = parse_document(&arena, md, &options);

    let mut blocks = Vec::new();
    let mut links = Vec::new();
    for node in root.descendants() {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => blocks.push(format!("h{}", heading.level)),
            NodeValue::List(list) => {
                let ordered = matches!(list.list_type, ListType::Ordered);
                blocks.push(if ordered { "ol" } else { "ul" }.to_string());
            }
            NodeValue::Item(_) => blocks.push("li".to_string()),
            NodeValue::TaskItem(..) => blocks.push("task".to_string()),
            NodeValue::CodeBlock(code) => blocks.push(format!("code:{}", code.info)),
            NodeValue::BlockQuote => blocks.push("quote".to_string()),
            NodeValue::ThematicBreak => blocks.push("hr".to_string()),
            NodeValue::Link(link) => links.push(link.url.clone()),
            _ => {}
        }
    }
    (blocks, links)
}

fn tree_outline(tree: &DocumentTree) -> (Vec<String>, Vec<String>) {
    let mut blocks = Vec::new();
    tree.walk(&mut |node| {
        let label = match &node.kind {
            BlockKind::Heading(level) => format!("h{level}"),
            BlockKind::BulletList | BlockKind::TaskList => "ul".to_string(),
            BlockKind::OrderedList => "ol".to_string(),
            BlockKind::ListItem => "li".to_string(),
            BlockKind::TaskItem { .. } => "task".to_string(),
            BlockKind::CodeBlock { language, .. } => {
                format!("code:{}", language.as_deref().unwrap_or(""))
            }
            BlockKind::Blockquote => "quote".to_string(),
            BlockKind::ThematicBreak => "hr".to_string(),
            BlockKind::Paragraph => return,
        };
        blocks.push(label);
    });
    let links = collect_links(tree).into_iter().map(|link| link.href).collect();
    (blocks, links)
}

fn assert_same_reading(source: &str) {
    init_logger();
    let canonical = sticky_babel::serialize(&sticky_babel::parse(source));
    let reparsed = sticky_babel::parse(&canonical);
    assert_eq!(
        comrak_outline(&canonical),
        tree_outline(&reparsed),
        "canonical form read differently:\n{canonical}"
    );
}

#[test]
fn test_messy_note_reads_the_same() {
    assert_same_reading(&fixture("messy-note.md"));
}

#[test]
fn test_nested_tasks_read_the_same() {
    assert_same_reading("- [ ] a\n  - [x] b\n    1. c\n- [ ] d\n\n---\n\n## Done\n> see [b](note://b)");
}

#[test]
fn test_over_indented_lists_read_the_same() {
    assert_same_reading("* one\n      * two\n   * three\n1) four");
}

#[test]
fn test_code_and_quotes_read_the_same() {
    assert_same_reading("> a\n>\n> b\n\n```rust\nfn main() {}\n```\n### [docs](https://example.com)");
}
