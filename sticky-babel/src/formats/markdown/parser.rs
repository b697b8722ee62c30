//! Markdown parsing (note markdown → document tree)
//!
//! A line-oriented stack machine. Each input line is classified once and then
//! routed by the containers currently open:
//!
//! - a stack of open lists, each remembering the indentation tier it was opened
//!   at and always holding one open item;
//! - an open paragraph, either top level or owned by the item of one list level;
//! - an open blockquote;
//! - an open code block, which suppresses every other rule until its fence closes.
//!
//! The machine emits IR events; tree assembly and depth assignment are left to
//! [`events_to_tree`]. Malformed input never fails: a half-typed checkbox is a
//! bullet, an unterminated fence closes at the end of input, an unmatched
//! delimiter stays literal.

use super::formatting_rules::FormattingRules;
use super::inline::to_inline;
use crate::common::flat_to_nested::events_to_tree;
use crate::ir::events::Event;
use crate::ir::nodes::{BlockNode, DocumentTree, InlineSpan, ListKind};

/// Parse note markdown into a document tree.
pub fn parse_markdown(source: &str, rules: &FormattingRules) -> DocumentTree {
    let mut parser = BlockParser::new(rules);
    for line in source.lines() {
        parser.feed_line(line);
    }
    let events = parser.finish();

    match events_to_tree(&events) {
        Ok(tree) => {
            log::debug!(
                "parsed {} lines into {} top-level blocks",
                source.lines().count(),
                tree.children.len()
            );
            tree
        }
        Err(err) => {
            log::error!("markdown event stream rejected, keeping lines as literal text: {err}");
            literal_paragraphs(source)
        }
    }
}

fn literal_paragraphs(source: &str) -> DocumentTree {
    DocumentTree::new(
        source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| BlockNode::paragraph(vec![InlineSpan::text(line)]))
            .collect(),
    )
}

/// What a single (trimmed) source line is.
#[derive(Debug, Clone, PartialEq)]
enum Line<'a> {
    Blank,
    Fence {
        info: &'a str,
    },
    ThematicBreak,
    Quote(&'a str),
    Item {
        kind: ListKind,
        checked: bool,
        text: &'a str,
    },
    Heading {
        level: u8,
        text: &'a str,
    },
    Text(&'a str),
}

fn classify(trimmed: &str) -> Line<'_> {
    if trimmed.is_empty() {
        return Line::Blank;
    }
    if let Some(rest) = trimmed.strip_prefix("```") {
        return Line::Fence {
            info: rest
                .trim_start_matches(|c: char| c == '`' || c.is_whitespace())
                .trim_end(),
        };
    }
    if is_thematic_break(trimmed) {
        return Line::ThematicBreak;
    }
    if let Some(rest) = trimmed.strip_prefix('>') {
        return Line::Quote(rest.trim());
    }
    if let Some(item) = bullet_item(trimmed).or_else(|| ordered_item(trimmed)) {
        return item;
    }
    if let Some(heading) = heading(trimmed) {
        return heading;
    }
    Line::Text(trimmed)
}

fn is_thematic_break(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first @ ('-' | '*' | '_')) => trimmed.len() >= 3 && chars.all(|c| c == first),
        _ => false,
    }
}

/// `-`, `*` or `+` followed by whitespace or the end of the line, optionally
/// followed by a `[ ]`, `[x]` or `[X]` checkbox.
fn bullet_item(trimmed: &str) -> Option<Line<'_>> {
    let rest = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('*'))
        .or_else(|| trimmed.strip_prefix('+'))?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let body = rest.trim_start();
    let checked = if body.starts_with("[ ]") {
        Some(false)
    } else if body.starts_with("[x]") || body.starts_with("[X]") {
        Some(true)
    } else {
        None
    };

    if let Some(checked) = checked {
        let after = &body[3..];
        if after.is_empty() || after.starts_with(char::is_whitespace) {
            return Some(Line::Item {
                kind: ListKind::Task,
                checked,
                text: after.trim(),
            });
        }
    }

    Some(Line::Item {
        kind: ListKind::Bullet,
        checked: false,
        text: body,
    })
}

/// One to nine digits, then `.` or `)`, then whitespace or the end of the line.
fn ordered_item(trimmed: &str) -> Option<Line<'_>> {
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if !(1..=9).contains(&digits) {
        return None;
    }
    let rest = trimmed[digits..]
        .strip_prefix('.')
        .or_else(|| trimmed[digits..].strip_prefix(')'))?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Line::Item {
        kind: ListKind::Ordered,
        checked: false,
        text: rest.trim(),
    })
}

fn heading(trimmed: &str) -> Option<Line<'_>> {
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(Line::Heading {
        level: level as u8,
        text: rest.trim(),
    })
}

fn is_closing_fence(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'`')
}

struct OpenList {
    kind: ListKind,
    tier: usize,
}

struct OpenParagraph {
    lines: Vec<String>,
    /// Index of the list whose current item owns the paragraph; `None` at top level.
    owner: Option<usize>,
}

struct OpenCode {
    language: Option<String>,
    lines: Vec<String>,
}

#[derive(Default)]
struct OpenQuote {
    paragraphs: Vec<Vec<String>>,
    current: Vec<String>,
}

struct BlockParser<'r> {
    rules: &'r FormattingRules,
    events: Vec<Event>,
    lists: Vec<OpenList>,
    paragraph: Option<OpenParagraph>,
    quote: Option<OpenQuote>,
    code: Option<OpenCode>,
    blank_run: usize,
    emitted_block: bool,
}

impl<'r> BlockParser<'r> {
    fn new(rules: &'r FormattingRules) -> Self {
        Self {
            rules,
            events: vec![Event::StartDocument],
            lists: Vec::new(),
            paragraph: None,
            quote: None,
            code: None,
            blank_run: 0,
            emitted_block: false,
        }
    }

    fn feed_line(&mut self, line: &str) {
        if let Some(code) = &mut self.code {
            if is_closing_fence(line.trim()) {
                self.close_code();
            } else {
                code.lines.push(line.to_string());
            }
            return;
        }

        let tier = self.rules.depth_of(line);
        match classify(line.trim()) {
            Line::Blank => {
                self.close_paragraph();
                self.close_quote();
                self.blank_run += 1;
            }
            Line::Fence { info } => {
                self.start_top_level_block();
                self.code = Some(OpenCode {
                    language: (!info.is_empty()).then(|| info.to_string()),
                    lines: Vec::new(),
                });
            }
            Line::ThematicBreak => {
                self.start_top_level_block();
                self.events.push(Event::ThematicBreak);
            }
            Line::Heading { level, text } => {
                self.start_top_level_block();
                self.events.push(Event::StartHeading(level));
                self.push_inlines(text);
                self.events.push(Event::EndHeading(level));
            }
            Line::Quote(text) => self.quote_line(text),
            Line::Item {
                kind,
                checked,
                text,
            } => self.list_line(tier, kind, checked, text),
            Line::Text(text) => self.text_line(tier, text),
        }
    }

    fn finish(mut self) -> Vec<Event> {
        if self.code.is_some() {
            log::debug!("unterminated code fence closed at end of input");
            self.close_code();
        }
        self.close_paragraph();
        self.close_quote();
        self.close_lists(0);
        self.events.push(Event::EndDocument);
        self.events
    }

    /// Emits the pending blank run as empty paragraphs before a new top-level block.
    fn begin_block(&mut self) {
        if self.emitted_block {
            let blanks = self.blank_run.min(self.rules.max_blank_lines);
            for _ in 0..blanks {
                self.events.push(Event::StartParagraph);
                self.events.push(Event::EndParagraph);
            }
        }
        self.blank_run = 0;
        self.emitted_block = true;
    }

    fn start_top_level_block(&mut self) {
        self.close_paragraph();
        self.close_quote();
        self.close_lists(0);
        self.begin_block();
    }

    fn quote_line(&mut self, text: &str) {
        if self.quote.is_none() {
            self.start_top_level_block();
        }
        let quote = self.quote.get_or_insert_with(OpenQuote::default);
        if text.is_empty() {
            if !quote.current.is_empty() {
                let paragraph = std::mem::take(&mut quote.current);
                quote.paragraphs.push(paragraph);
            }
        } else {
            quote.current.push(text.to_string());
        }
    }

    fn list_line(&mut self, tier: usize, kind: ListKind, checked: bool, text: &str) {
        self.close_paragraph();
        self.close_quote();

        if self.lists.is_empty() {
            self.begin_block();
            self.open_list(kind, tier);
        } else {
            let level = self.owning_list(tier);
            self.close_lists(level + 1);
            let (open_kind, open_tier) = (self.lists[level].kind, self.lists[level].tier);
            if tier > open_tier {
                self.open_list(kind, tier);
            } else if open_kind == kind {
                self.events.push(Event::end_item(kind));
                self.lists[level].tier = tier;
            } else {
                self.close_lists(level);
                if self.lists.is_empty() {
                    self.begin_block();
                }
                self.open_list(kind, tier);
            }
        }

        self.blank_run = 0;
        self.events.push(Event::start_item(kind, checked));
        self.push_inlines(text);
    }

    fn text_line(&mut self, tier: usize, text: &str) {
        if tier >= 1 {
            if let Some(owner) = self.lists.iter().rposition(|list| list.tier < tier) {
                let continuing = self.lists.len() == owner + 1
                    && matches!(&self.paragraph, Some(p) if p.owner == Some(owner));
                if !continuing {
                    self.close_paragraph();
                    self.close_lists(owner + 1);
                    self.paragraph = Some(OpenParagraph {
                        lines: Vec::new(),
                        owner: Some(owner),
                    });
                }
                if let Some(paragraph) = &mut self.paragraph {
                    paragraph.lines.push(text.to_string());
                }
                self.blank_run = 0;
                return;
            }
        }

        if let Some(paragraph) = &mut self.paragraph {
            if paragraph.owner.is_none() {
                paragraph.lines.push(text.to_string());
                return;
            }
        }

        self.start_top_level_block();
        self.paragraph = Some(OpenParagraph {
            lines: vec![text.to_string()],
            owner: None,
        });
    }

    /// The deepest open list a line at `tier` can attach to: the bottom list
    /// always qualifies, a nested one only if its parent sits at a lower tier.
    fn owning_list(&self, tier: usize) -> usize {
        (1..self.lists.len())
            .rev()
            .find(|&i| self.lists[i - 1].tier < tier)
            .unwrap_or(0)
    }

    fn open_list(&mut self, kind: ListKind, tier: usize) {
        self.events.push(Event::StartList(kind));
        self.lists.push(OpenList { kind, tier });
    }

    fn close_lists(&mut self, keep: usize) {
        while self.lists.len() > keep {
            if let Some(list) = self.lists.pop() {
                self.events.push(Event::end_item(list.kind));
                self.events.push(Event::EndList);
            }
        }
    }

    fn close_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            self.push_paragraph(&paragraph.lines);
        }
    }

    fn close_quote(&mut self) {
        if let Some(mut quote) = self.quote.take() {
            if !quote.current.is_empty() {
                quote.paragraphs.push(quote.current);
            }
            self.events.push(Event::StartBlockquote);
            for lines in &quote.paragraphs {
                self.push_paragraph(lines);
            }
            self.events.push(Event::EndBlockquote);
        }
    }

    fn close_code(&mut self) {
        if let Some(code) = self.code.take() {
            self.events.push(Event::StartCodeBlock(code.language));
            self.events
                .extend(code.lines.into_iter().map(Event::CodeLine));
            self.events.push(Event::EndCodeBlock);
        }
    }

    fn push_paragraph(&mut self, lines: &[String]) {
        self.events.push(Event::StartParagraph);
        self.push_inlines(&lines.join("\n"));
        self.events.push(Event::EndParagraph);
    }

    fn push_inlines(&mut self, text: &str) {
        self.events
            .extend(to_inline(text).into_iter().map(Event::Inline));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::markdown::serializer::serialize_markdown;
    use crate::ir::nodes::BlockKind;

    fn parse(source: &str) -> DocumentTree {
        parse_markdown(source, &FormattingRules::default())
    }

    fn kinds(nodes: &[BlockNode]) -> Vec<&'static str> {
        nodes.iter().map(|node| node.kind.name()).collect()
    }

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify(""), Line::Blank);
        assert_eq!(classify("```rust"), Line::Fence { info: "rust" });
        assert_eq!(classify("---"), Line::ThematicBreak);
        assert_eq!(classify("***"), Line::ThematicBreak);
        assert_eq!(classify("> quoted"), Line::Quote("quoted"));
        assert_eq!(
            classify("- [X] done"),
            Line::Item {
                kind: ListKind::Task,
                checked: true,
                text: "done"
            }
        );
        assert_eq!(
            classify("- [ ]"),
            Line::Item {
                kind: ListKind::Task,
                checked: false,
                text: ""
            }
        );
        assert_eq!(
            classify("+ item"),
            Line::Item {
                kind: ListKind::Bullet,
                checked: false,
                text: "item"
            }
        );
        assert_eq!(
            classify("12) twelve"),
            Line::Item {
                kind: ListKind::Ordered,
                checked: false,
                text: "twelve"
            }
        );
        assert_eq!(
            classify("### Title"),
            Line::Heading {
                level: 3,
                text: "Title"
            }
        );
        assert_eq!(classify("#hashtag"), Line::Text("#hashtag"));
        assert_eq!(classify("####### seven"), Line::Text("####### seven"));
        assert_eq!(classify("*emphasis*"), Line::Text("*emphasis*"));
        assert_eq!(classify("1.5 liters"), Line::Text("1.5 liters"));
    }

    #[test]
    fn test_half_typed_checkbox_is_a_bullet() {
        assert_eq!(
            classify("- [x]done"),
            Line::Item {
                kind: ListKind::Bullet,
                checked: false,
                text: "[x]done"
            }
        );
        assert_eq!(
            classify("- ["),
            Line::Item {
                kind: ListKind::Bullet,
                checked: false,
                text: "["
            }
        );
    }

    #[test]
    fn test_checkbox_line_switches_bullet_list_to_task_list() {
        let tree = parse("- plain\n- [ ] task\n- [x] done");
        assert_eq!(kinds(&tree.children), vec!["BulletList", "TaskList"]);
        assert_eq!(tree.children[1].children.len(), 2);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_nested_lists_follow_indentation() {
        let tree = parse("- [ ] A\n  - [ ] B\n    - [ ] C\n- [ ] D");
        let top = &tree.children[0];
        assert_eq!(top.children.len(), 2);
        let b_list = &top.children[0].children[0];
        assert_eq!(b_list.depth, 1);
        let c_list = &b_list.children[0].children[0];
        assert_eq!(c_list.depth, 2);
        assert_eq!(
            c_list.children[0].content,
            vec![InlineSpan::text("C")]
        );
    }

    #[test]
    fn test_over_indented_child_nests_one_level() {
        let tree = parse("- a\n      - b\n  - c");
        let nested = &tree.children[0].children[0].children[0];
        assert_eq!(nested.kind, BlockKind::BulletList);
        assert_eq!(nested.children.len(), 2);
    }

    #[test]
    fn test_blank_line_inside_list_keeps_list_open() {
        let tree = parse("- a\n\n- b");
        assert_eq!(kinds(&tree.children), vec!["BulletList"]);
        assert_eq!(tree.children[0].children.len(), 2);
    }

    #[test]
    fn test_indented_text_continues_item() {
        let tree = parse("- a\n  more\n  lines\n\n  second");
        let item = &tree.children[0].children[0];
        assert_eq!(kinds(&item.children), vec!["Paragraph", "Paragraph"]);
        assert_eq!(
            item.children[0].content,
            vec![InlineSpan::text("more\nlines")]
        );
        assert_eq!(item.children[0].depth, 1);
    }

    #[test]
    fn test_blank_runs_become_capped_empty_paragraphs() {
        let tree = parse("\n\none\n\n\n\ntwo\n\n");
        assert_eq!(
            tree.children,
            vec![
                BlockNode::paragraph(vec![InlineSpan::text("one")]),
                BlockNode::blank(),
                BlockNode::paragraph(vec![InlineSpan::text("two")]),
            ]
        );
    }

    #[test]
    fn test_unterminated_fence_keeps_content() {
        let tree = parse("```\n**not bold**\n  indented");
        assert_eq!(
            tree.children[0].kind,
            BlockKind::CodeBlock {
                language: None,
                lines: vec!["**not bold**".to_string(), "  indented".to_string()],
            }
        );
    }

    #[test]
    fn test_fence_info_never_starts_with_a_backtick() {
        assert_eq!(classify("``` `"), Line::Fence { info: "" });
        assert_eq!(classify("```` `js"), Line::Fence { info: "js" });
        assert_eq!(classify("``` a`b "), Line::Fence { info: "a`b" });

        let rules = FormattingRules::default();
        for source in ["``` `", "```` ` `sh\nls", "``` a`b\nx\n```"] {
            let once = serialize_markdown(&parse(source), &rules);
            let twice = serialize_markdown(&parse(&once), &rules);
            assert_eq!(twice, once, "source: {source:?}");
        }
    }

    #[test]
    fn test_fence_closes_open_list() {
        let tree = parse("- a\n```sh\nls\n```\n- b");
        assert_eq!(kinds(&tree.children), vec!["BulletList", "CodeBlock", "BulletList"]);
    }

    #[test]
    fn test_blockquote_paragraphs() {
        let tree = parse("> one\n> two\n>\n> three");
        let quote = &tree.children[0];
        assert_eq!(quote.kind, BlockKind::Blockquote);
        assert_eq!(quote.children.len(), 2);
        assert_eq!(quote.children[0].content, vec![InlineSpan::text("one\ntwo")]);
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\n\t").is_empty());
    }

    #[test]
    fn test_tab_indentation_counts_one_level() {
        let tree = parse("- a\n\t- b");
        let nested = &tree.children[0].children[0].children[0];
        assert_eq!(nested.depth, 1);
    }

    #[test]
    fn test_literal_fallback_keeps_text() {
        let tree = literal_paragraphs("a\n\n  b ");
        assert_eq!(
            tree.children,
            vec![
                BlockNode::paragraph(vec![InlineSpan::text("a")]),
                BlockNode::paragraph(vec![InlineSpan::text("b")]),
            ]
        );
    }
}
