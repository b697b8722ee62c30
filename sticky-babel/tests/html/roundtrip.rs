//! markdown → HTML → markdown
//!
//! A canonical note loaded into the editor and handed back unchanged must
//! serialize to exactly the same markdown.

use crate::init_logger;
use sticky_babel::formats::html::{parse_from_html, serialize_to_html};
use sticky_babel::transforms::{html_to_markdown, markdown_to_html};
use sticky_babel::FormattingRules;

const CANONICAL_NOTES: &[&str] = &[
    "# Groceries\n\n- [x] **milk**\n- [ ] eggs\n  - free range\n  - a dozen\n\n1. shop\n2. cook",
    "Dear *me*,\nremember `make`.\n\n> quote one\n>\n> quote two\n\n---\n\n```\nplain code\n```",
    "- item\n  first paragraph\n\n  second paragraph\n  - child\n- [see](note://abc) ***now***",
    "### Deep\n- [ ] a\n  - [ ] b\n    - [x] c\n      1. d",
];

#[test]
fn test_canonical_notes_survive_the_editor() {
    init_logger();
    let rules = FormattingRules::default();
    for markdown in CANONICAL_NOTES {
        let html = markdown_to_html(markdown, &rules).unwrap();
        let back = html_to_markdown(&html, &rules).unwrap();
        assert_eq!(&back, markdown, "via html:\n{html}");
    }
}

#[test]
fn test_html_is_stable_after_one_cycle() {
    for markdown in CANONICAL_NOTES {
        let html = serialize_to_html(&sticky_babel::parse(markdown)).unwrap();
        let again = serialize_to_html(&parse_from_html(&html).unwrap()).unwrap();
        assert_eq!(again, html);
    }
}

#[test]
fn test_trees_match_after_html_cycle() {
    for markdown in CANONICAL_NOTES {
        let tree = sticky_babel::parse(markdown);
        let html = serialize_to_html(&tree).unwrap();
        assert_eq!(parse_from_html(&html).unwrap(), tree);
    }
}
