//! Markdown serialization (document tree → note markdown)
//!
//! Writes the canonical form the parser reads back identically:
//!
//! - list and item indentation is `indent_width × depth` spaces;
//! - bullet and task markers use the configured bullet character, ordered items
//!   are renumbered from 1 in every list;
//! - a blank line separates consecutive paragraphs inside one item, nowhere else
//!   in a list;
//! - top-level empty paragraphs become blank lines, collapsed to
//!   `max_blank_lines`;
//! - trailing whitespace is trimmed, except inside code blocks, which are
//!   written verbatim.
//!
//! Output never ends with a newline.

use super::formatting_rules::FormattingRules;
use super::inline::to_markdown;
use crate::ir::nodes::{BlockKind, BlockNode, DocumentTree, ListKind};

/// Serialize a document tree to note markdown.
///
/// # Panics
///
/// Panics if the tree violates the structural rules checked by
/// [`DocumentTree::validate`]. Trees built by the parsers and the node
/// constructors always pass.
pub fn serialize_markdown(tree: &DocumentTree, rules: &FormattingRules) -> String {
    if let Err(err) = tree.validate() {
        panic!("cannot serialize an invalid document tree: {err}");
    }

    let mut serializer = MarkdownSerializer::new(rules);
    for node in &tree.children {
        serializer.write_block(node);
    }
    serializer.finish()
}

struct OutputLine {
    text: String,
    /// Code block content, exempt from trimming and blank collapsing.
    verbatim: bool,
}

struct MarkdownSerializer<'r> {
    rules: &'r FormattingRules,
    lines: Vec<OutputLine>,
}

impl<'r> MarkdownSerializer<'r> {
    fn new(rules: &'r FormattingRules) -> Self {
        Self {
            rules,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, text: String) {
        self.lines.push(OutputLine {
            text,
            verbatim: false,
        });
    }

    fn push_verbatim(&mut self, text: &str) {
        self.lines.push(OutputLine {
            text: text.to_string(),
            verbatim: true,
        });
    }

    fn write_block(&mut self, node: &BlockNode) {
        match &node.kind {
            BlockKind::Paragraph => {
                if node.is_blank() {
                    self.push(String::new());
                } else {
                    self.write_paragraph(node);
                }
            }
            BlockKind::Heading(level) => {
                let text = to_markdown(&node.content).replace('\n', " ");
                self.push(format!("{} {}", "#".repeat(*level as usize), text));
            }
            BlockKind::BulletList | BlockKind::OrderedList | BlockKind::TaskList => {
                self.write_list(node);
            }
            BlockKind::CodeBlock { language, lines } => {
                self.push(format!("```{}", language.as_deref().unwrap_or("")));
                for line in lines {
                    self.push_verbatim(line);
                }
                self.push("```".to_string());
            }
            BlockKind::Blockquote => self.write_blockquote(node),
            BlockKind::ThematicBreak => self.push("---".to_string()),
            // Items are written by their list; validation rejects stray ones.
            BlockKind::ListItem | BlockKind::TaskItem { .. } => {}
        }
    }

    fn write_paragraph(&mut self, node: &BlockNode) {
        let indent = self.rules.indent(node.depth);
        for line in to_markdown(&node.content).split('\n') {
            self.push(format!("{indent}{line}"));
        }
    }

    fn write_list(&mut self, list: &BlockNode) {
        let Some(kind) = list.kind.list_kind() else {
            return;
        };
        for (index, item) in list.children.iter().enumerate() {
            self.write_item(kind, index + 1, item);
        }
    }

    fn write_item(&mut self, kind: ListKind, number: usize, item: &BlockNode) {
        let marker = match (kind, &item.kind) {
            (ListKind::Ordered, _) => format!("{number}."),
            (ListKind::Task, BlockKind::TaskItem { checked: true }) => {
                format!("{} [x]", self.rules.marker())
            }
            (ListKind::Task, _) => format!("{} [ ]", self.rules.marker()),
            (ListKind::Bullet, _) => self.rules.marker().to_string(),
        };

        let indent = self.rules.indent(item.depth);
        let continuation = self.rules.indent(item.depth + 1);
        let content = to_markdown(&item.content);
        let mut content_lines = content.split('\n');

        match content_lines.next() {
            Some(first) if !first.is_empty() => self.push(format!("{indent}{marker} {first}")),
            _ => self.push(format!("{indent}{marker}")),
        }
        for line in content_lines {
            self.push(format!("{continuation}{line}"));
        }

        let mut previous_was_paragraph = false;
        for child in &item.children {
            match child.kind {
                BlockKind::Paragraph if child.is_blank() => {}
                BlockKind::Paragraph => {
                    if previous_was_paragraph {
                        self.push(String::new());
                    }
                    self.write_paragraph(child);
                    previous_was_paragraph = true;
                }
                _ => {
                    self.write_block(child);
                    previous_was_paragraph = false;
                }
            }
        }
    }

    fn write_blockquote(&mut self, quote: &BlockNode) {
        let mut wrote_any = false;
        for paragraph in quote.children.iter().filter(|p| !p.is_blank()) {
            if wrote_any {
                self.push(">".to_string());
            }
            for line in to_markdown(&paragraph.content).split('\n') {
                self.push(format!("> {line}"));
            }
            wrote_any = true;
        }
        if !wrote_any {
            self.push(">".to_string());
        }
    }

    fn finish(self) -> String {
        let max_blank_lines = self.rules.max_blank_lines;
        let mut kept: Vec<String> = Vec::with_capacity(self.lines.len());
        let mut blank_run = 0;

        for line in self.lines {
            if line.verbatim {
                blank_run = 0;
                kept.push(line.text);
                continue;
            }
            let text = line.text.trim_end();
            if text.is_empty() {
                blank_run += 1;
                if blank_run > max_blank_lines || kept.is_empty() {
                    continue;
                }
            } else {
                blank_run = 0;
            }
            kept.push(text.to_string());
        }

        while kept.last().is_some_and(String::is_empty) {
            kept.pop();
        }

        log::trace!("serialized {} markdown lines", kept.len());
        kept.join("\n")
    }
}
