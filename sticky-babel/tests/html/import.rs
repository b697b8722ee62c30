//! Import tests for editor HTML (HTML → document tree → markdown)

use crate::init_logger;
use sticky_babel::format::Format;
use sticky_babel::formats::html::HtmlFormat;
use sticky_babel::transforms::html_to_markdown;
use sticky_babel::{BlockKind, FormattingRules};

const EDITOR_DOCUMENT: &str = r#"<h2>Plan</h2>
<p></p>
<ul data-type="taskList">
  <li data-type="taskItem" data-checked="true">
    <label><input type="checkbox" checked="checked"><span></span></label>
    <div><p>ship <b>it</b></p></div>
  </li>
  <li data-type="taskItem" data-checked="false">
    <label><input type="checkbox"><span></span></label>
    <div><p>tell <a href="note://ann">Ann</a></p></div>
  </li>
</ul>
<p>done for <i>today</i></p>"#;

#[test]
fn test_editor_document_to_markdown() {
    init_logger();
    let markdown = html_to_markdown(EDITOR_DOCUMENT, &FormattingRules::default()).unwrap();
    assert_eq!(
        markdown,
        "## Plan\n\n- [x] ship **it**\n- [ ] tell [Ann](note://ann)\ndone for *today*"
    );
}

#[test]
fn test_pasted_markup_is_tolerated() {
    init_logger();
    let html = "<div><div>first line</div><div><span style=\"color:red\">second</span> line</div></div>\
                <ol><li>one</li><li><strong>two</strong></li></ol>";
    let tree = HtmlFormat.parse(html).unwrap();

    assert_eq!(tree.children[0].kind, BlockKind::Paragraph);
    assert_eq!(tree.children[1].kind, BlockKind::Paragraph);
    assert_eq!(tree.children[2].kind, BlockKind::OrderedList);
    assert_eq!(
        sticky_babel::serialize(&tree),
        "first line\nsecond line\n1. one\n2. **two**"
    );
}

#[test]
fn test_full_document_uses_body_only() {
    let html = "<!DOCTYPE html><html><head><title>ignored</title></head><body><p>kept</p></body></html>";
    let tree = HtmlFormat.parse(html).unwrap();
    assert_eq!(sticky_babel::serialize(&tree), "kept");
}
