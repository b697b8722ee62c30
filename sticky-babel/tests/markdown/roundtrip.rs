//! Normalization round trips
//!
//! The first parse/serialize cycle may canonicalize; every later cycle must be
//! the identity.

use proptest::prelude::*;
use sticky_babel::transforms::{is_normalized, normalize_markdown, normalize_markdown_with_rules};
use sticky_babel::FormattingRules;

/// Line fragments covering every block rule, in canonical and non-canonical
/// spellings.
const FRAGMENTS: &[&str] = &[
    "",
    "",
    "plain text",
    "**bold** and *italic*",
    "see [Ann](note://ann)",
    "# Heading",
    "### Small *heading*",
    "---",
    "> quoted",
    "- bullet",
    "* star bullet",
    "-",
    "- [ ] open task",
    "- [x] done task",
    "+ [X] shouted task",
    "- [ ]",
    "- [",
    "1. first",
    "7) seventh",
    "  - nested",
    "  - [x] nested task",
    "    - deep",
    "      - too deep",
    "  continuation",
    "\t- tabbed",
    "```",
    "```sh",
    "``` `",
    "```` `js",
    "``` a`b",
    "plain text   ",
];

fn note() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..16).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn normalization_is_idempotent(source in note()) {
        let once = normalize_markdown(&source);
        let twice = normalize_markdown(&once);
        prop_assert_eq!(&twice, &once, "source: {:?}", source);
    }

    #[test]
    fn normalization_is_idempotent_with_wide_indent(source in note()) {
        let rules = FormattingRules {
            indent_width: 4,
            bullet_marker: '*',
            max_blank_lines: 2,
            ..FormattingRules::default()
        };
        let once = normalize_markdown_with_rules(&source, &rules);
        prop_assert!(is_normalized(&once, &rules), "source: {:?}", source);
    }

    #[test]
    fn normalized_output_has_no_trailing_whitespace(source in note()) {
        let once = normalize_markdown(&source);
        prop_assert!(!once.ends_with('\n'));
        prop_assert!(!once.starts_with('\n'));
    }
}

#[test]
fn test_canonical_documents_are_fixed_points() {
    let canonical = [
        "",
        "plain",
        "- [ ] a\n  - [x] b\n    1. c\n- [ ] d",
        "# Title\n\npara one\npara two\n\n---\n\n> quote\n>\n> more",
        "- item\n  first paragraph\n\n  second paragraph\n  - child",
        "```\n  indented code\n\n\n```",
    ];
    let rules = FormattingRules::default();
    for source in canonical {
        assert!(is_normalized(source, &rules), "not canonical: {source:?}");
    }
}

#[test]
fn test_non_canonical_spellings_converge() {
    assert_eq!(normalize_markdown("*   [X]   done"), "- [x] done");
    assert_eq!(normalize_markdown("   - three spaces"), "- three spaces");
    assert_eq!(normalize_markdown("- a\n   - b"), "- a\n  - b");
    assert_eq!(normalize_markdown("1) a\n1) b\n1) c"), "1. a\n2. b\n3. c");
    assert_eq!(normalize_markdown("a\n\n\n\n\nb"), "a\n\nb");
    assert_eq!(normalize_markdown("\n\n# lead"), "# lead");
}
