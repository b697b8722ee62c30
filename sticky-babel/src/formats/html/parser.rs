//! HTML parsing (editor HTML → document tree)
//!
//! Accepts what the rich-text surface emits plus the usual paste debris:
//! wrapper `div`s, `b`/`i` instead of `strong`/`em`, task items rendered as
//! `label` + `input` + `div`. Unknown elements are flattened to their text.
//! Pipeline: HTML string → RcDom → events → tree

use crate::common::flat_to_nested::events_to_tree;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{DocumentTree, InlineSpan, ListKind};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

const BLOCK_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "pre",
    "blockquote",
    "hr",
    "div",
    "section",
    "article",
    "header",
    "footer",
    "main",
    "table",
    "tr",
];

/// Parse an HTML fragment or document into a document tree
pub fn parse_from_html(source: &str) -> Result<DocumentTree, FormatError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);

    let mut reader = HtmlReader {
        events: vec![Event::StartDocument],
    };
    if let Some(body) = find_element(&dom.document, "body") {
        reader.read_blocks(&body);
    }
    reader.events.push(Event::EndDocument);

    Ok(events_to_tree(&reader.events)?)
}

struct HtmlReader {
    events: Vec<Event>,
}

impl HtmlReader {
    /// Reads a run of block-level children; loose inline runs become paragraphs.
    fn read_blocks(&mut self, parent: &Handle) {
        let mut pending = Vec::new();
        for child in children_of(parent) {
            if is_block(&child) {
                self.flush_paragraph(&mut pending);
                self.read_block(&child);
            } else {
                collect_inline(&child, &mut pending);
            }
        }
        self.flush_paragraph(&mut pending);
    }

    fn read_block(&mut self, node: &Handle) {
        let Some(tag) = tag_name(node) else {
            return;
        };
        match tag.as_str() {
            "p" => {
                let spans = inline_content(node);
                self.push_paragraph(spans);
            }
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<u8>().unwrap_or(1);
                self.events.push(Event::StartHeading(level));
                self.push_inlines(inline_content(node));
                self.events.push(Event::EndHeading(level));
            }
            "ul" | "ol" => self.read_list(node, tag == "ol"),
            "pre" => self.read_code(node),
            "blockquote" => self.read_blockquote(node),
            "hr" => self.events.push(Event::ThematicBreak),
            "div" | "section" | "article" | "header" | "footer" | "main" => {
                self.read_blocks(node)
            }
            _ => {
                let spans = inline_content(node);
                if has_text(&spans) {
                    self.push_paragraph(spans);
                }
            }
        }
    }

    fn read_list(&mut self, list: &Handle, ordered: bool) {
        let items: Vec<Handle> = children_of(list)
            .into_iter()
            .filter(|child| tag_name(child).as_deref() == Some("li"))
            .collect();
        if items.is_empty() {
            return;
        }

        let kind = if ordered {
            ListKind::Ordered
        } else if attribute(list, "data-type").as_deref() == Some("taskList")
            || items
                .iter()
                .any(|item| attribute(item, "data-type").as_deref() == Some("taskItem"))
        {
            ListKind::Task
        } else {
            ListKind::Bullet
        };

        self.events.push(Event::StartList(kind));
        for item in &items {
            self.read_item(kind, item);
        }
        self.events.push(Event::EndList);
    }

    fn read_item(&mut self, kind: ListKind, item: &Handle) {
        self.events.push(Event::start_item(kind, is_checked(item)));

        let mut content_taken = false;
        let mut pending = Vec::new();
        for child in item_children(item) {
            match tag_name(&child).as_deref() {
                Some("p") => {
                    self.flush_item_inline(&mut pending, &mut content_taken);
                    let spans = inline_content(&child);
                    if content_taken {
                        self.push_paragraph(spans);
                    } else {
                        self.push_inlines(spans);
                        content_taken = true;
                    }
                }
                Some(tag @ ("ul" | "ol")) => {
                    self.flush_item_inline(&mut pending, &mut content_taken);
                    content_taken = true;
                    self.read_list(&child, tag == "ol");
                }
                Some(_) if is_block(&child) => {
                    self.flush_item_inline(&mut pending, &mut content_taken);
                    content_taken = true;
                    let spans = inline_content(&child);
                    if has_text(&spans) {
                        self.push_paragraph(spans);
                    }
                }
                _ => collect_inline(&child, &mut pending),
            }
        }
        self.flush_item_inline(&mut pending, &mut content_taken);

        self.events.push(Event::end_item(kind));
    }

    /// Leading inline text in an item is its content; later runs are paragraphs.
    fn flush_item_inline(&mut self, pending: &mut Vec<InlineSpan>, content_taken: &mut bool) {
        let spans = trim_edges(std::mem::take(pending));
        if spans.is_empty() {
            return;
        }
        if *content_taken {
            self.push_paragraph(spans);
        } else {
            self.push_inlines(spans);
            *content_taken = true;
        }
    }

    fn read_code(&mut self, pre: &Handle) {
        let language = children_of(pre)
            .iter()
            .filter(|child| tag_name(child).as_deref() == Some("code"))
            .find_map(|code| {
                attribute(code, "class").and_then(|class| {
                    class
                        .split_whitespace()
                        .find_map(|c| c.strip_prefix("language-").map(str::to_string))
                })
            });

        let text = text_content(pre);
        self.events.push(Event::StartCodeBlock(language));
        if !text.is_empty() {
            self.events
                .extend(text.split('\n').map(|line| Event::CodeLine(line.to_string())));
        }
        self.events.push(Event::EndCodeBlock);
    }

    fn read_blockquote(&mut self, quote: &Handle) {
        self.events.push(Event::StartBlockquote);
        let mut pending = Vec::new();
        for child in children_of(quote) {
            if is_block(&child) {
                self.flush_paragraph(&mut pending);
                let spans = inline_content(&child);
                if has_text(&spans) {
                    self.push_paragraph(spans);
                }
            } else {
                collect_inline(&child, &mut pending);
            }
        }
        self.flush_paragraph(&mut pending);
        self.events.push(Event::EndBlockquote);
    }

    fn flush_paragraph(&mut self, pending: &mut Vec<InlineSpan>) {
        let spans = trim_edges(std::mem::take(pending));
        if has_text(&spans) {
            self.push_paragraph(spans);
        }
    }

    fn push_paragraph(&mut self, spans: Vec<InlineSpan>) {
        self.events.push(Event::StartParagraph);
        self.push_inlines(spans);
        self.events.push(Event::EndParagraph);
    }

    fn push_inlines(&mut self, spans: Vec<InlineSpan>) {
        self.events.extend(spans.into_iter().map(Event::Inline));
    }
}

fn inline_content(node: &Handle) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in children_of(node) {
        collect_inline(&child, &mut spans);
    }
    trim_edges(spans)
}

fn collect_inline(node: &Handle, out: &mut Vec<InlineSpan>) {
    match &node.data {
        NodeData::Text { contents } => {
            push_text(out, &contents.borrow().replace('\n', " "));
        }
        NodeData::Element { .. } => {
            let tag = tag_name(node).unwrap_or_default();
            match tag.as_str() {
                "br" => push_text(out, "\n"),
                "input" | "label" => {}
                "strong" | "b" => {
                    let children = inline_children(node);
                    if let [InlineSpan::Italic(inner)] = children.as_slice() {
                        out.push(InlineSpan::BoldItalic(inner.clone()));
                    } else if !children.is_empty() {
                        out.push(InlineSpan::Bold(children));
                    }
                }
                "em" | "i" => {
                    let children = inline_children(node);
                    if let [InlineSpan::Bold(inner)] = children.as_slice() {
                        out.push(InlineSpan::BoldItalic(inner.clone()));
                    } else if !children.is_empty() {
                        out.push(InlineSpan::Italic(children));
                    }
                }
                "code" => {
                    let code = text_content(node);
                    if !code.is_empty() {
                        out.push(InlineSpan::Code(code));
                    }
                }
                "a" => match attribute(node, "href") {
                    Some(href) => out.push(InlineSpan::Link {
                        href,
                        children: inline_children(node),
                    }),
                    None => {
                        for child in children_of(node) {
                            collect_inline(&child, out);
                        }
                    }
                },
                _ => {
                    for child in children_of(node) {
                        collect_inline(&child, out);
                    }
                }
            }
        }
        _ => {}
    }
}

fn inline_children(node: &Handle) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in children_of(node) {
        collect_inline(&child, &mut spans);
    }
    spans
}

fn push_text(spans: &mut Vec<InlineSpan>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(InlineSpan::PlainText(last)) = spans.last_mut() {
        last.push_str(text);
    } else {
        spans.push(InlineSpan::PlainText(text.to_string()));
    }
}

/// Strips whitespace from the outer edges of a run, dropping text emptied by it.
fn trim_edges(mut spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    if let Some(InlineSpan::PlainText(first)) = spans.first_mut() {
        *first = first.trim_start_matches([' ', '\t']).to_string();
    }
    if let Some(InlineSpan::PlainText(last)) = spans.last_mut() {
        *last = last.trim_end_matches([' ', '\t']).to_string();
    }
    spans.retain(|span| !matches!(span, InlineSpan::PlainText(text) if text.is_empty()));
    spans
}

fn has_text(spans: &[InlineSpan]) -> bool {
    !InlineSpan::plain_text(spans).trim().is_empty()
}

fn is_checked(item: &Handle) -> bool {
    match attribute(item, "data-checked") {
        Some(value) => value == "true",
        None => find_element(item, "input").is_some_and(|input| attribute(&input, "checked").is_some()),
    }
}

/// Children of an item with editor wrappers (`div`, `label`, `input`) unwrapped or skipped
fn item_children(item: &Handle) -> Vec<Handle> {
    let mut result = Vec::new();
    for child in children_of(item) {
        match tag_name(&child).as_deref() {
            Some("div") => result.extend(item_children(&child)),
            Some("label") | Some("input") => {}
            _ => result.push(child),
        }
    }
    result
}

fn is_block(node: &Handle) -> bool {
    tag_name(node).is_some_and(|tag| BLOCK_TAGS.contains(&tag.as_str()))
}

fn children_of(node: &Handle) -> Vec<Handle> {
    node.children.borrow().iter().cloned().collect()
}

fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.to_string()),
        _ => None,
    }
}

fn attribute(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    append_text(node, &mut text);
    text
}

fn append_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in node.children.borrow().iter() {
                append_text(child, out);
            }
        }
    }
}

fn find_element(node: &Handle, tag: &str) -> Option<Handle> {
    if tag_name(node).as_deref() == Some(tag) {
        return Some(node.clone());
    }
    node.children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}
