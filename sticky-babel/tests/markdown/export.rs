//! Export tests for the markdown format (document tree → markdown)

use crate::{fixture, init_logger};
use sticky_babel::format::Format;
use sticky_babel::formats::markdown::MarkdownFormat;
use sticky_babel::{BlockNode, DocumentTree, FormatError, FormattingRules, InlineSpan};

fn text(s: &str) -> Vec<InlineSpan> {
    vec![InlineSpan::text(s)]
}

#[test]
fn test_messy_note_is_canonicalized() {
    init_logger();
    let source = fixture("messy-note.md");

    insta::assert_snapshot!(sticky_babel::serialize(&sticky_babel::parse(&source)), @r"
    # Weekend

    - [x] buy **milk**
    - [ ] call [Ann](note://ann-123)
      - ask about *Saturday*
      - bring `cake`

    1. pack
    2. leave

    Some text
    continues here.
    > quoted line
    ```js
    let x = 1;

    ```
    ");
}

#[test]
fn test_built_tree_serializes() {
    let tree = DocumentTree::new(vec![
        BlockNode::heading(2, text("Today")),
        BlockNode::list(
            sticky_babel::ListKind::Task,
            vec![
                BlockNode::task_item(
                    false,
                    text("review"),
                    vec![BlockNode::list(
                        sticky_babel::ListKind::Ordered,
                        vec![
                            BlockNode::item(text("first"), vec![]),
                            BlockNode::item(text("second"), vec![]),
                        ],
                    )],
                ),
                BlockNode::task_item(true, vec![], vec![]),
            ],
        ),
        BlockNode::blank(),
        BlockNode::thematic_break(),
    ]);

    assert_eq!(
        sticky_babel::serialize(&tree),
        "## Today\n- [ ] review\n  1. first\n  2. second\n- [x]\n\n---"
    );
}

#[test]
fn test_format_rejects_invalid_tree() {
    let tree = DocumentTree::new(vec![BlockNode::list(
        sticky_babel::ListKind::Bullet,
        vec![BlockNode::task_item(false, text("wrong kind"), vec![])],
    )]);

    let result = MarkdownFormat::default().serialize(&tree);
    assert!(matches!(result, Err(FormatError::SerializationError(_))));
}

#[test]
#[should_panic(expected = "cannot serialize an invalid document tree")]
fn test_serialize_panics_on_invalid_tree() {
    let tree = DocumentTree::new(vec![BlockNode::list(
        sticky_babel::ListKind::Task,
        vec![BlockNode::paragraph(text("not an item"))],
    )]);
    sticky_babel::serialize(&tree);
}

#[test]
fn test_rules_drive_markers_and_indent() {
    let rules = FormattingRules {
        indent_width: 4,
        bullet_marker: '+',
        ..FormattingRules::default()
    };
    let tree = sticky_babel::parse("- a\n  - b\n- [ ] c");

    assert_eq!(
        sticky_babel::serialize_with_rules(&tree, &rules),
        "+ a\n    + b\n+ [ ] c"
    );
}

#[test]
fn test_empty_tree_is_empty_string() {
    assert_eq!(sticky_babel::serialize(&DocumentTree::default()), "");
    assert_eq!(
        sticky_babel::serialize(&DocumentTree::new(vec![BlockNode::blank(), BlockNode::blank()])),
        ""
    );
}
