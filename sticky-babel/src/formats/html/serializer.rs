//! HTML serialization (document tree → editor HTML)
//!
//! Produces the fragment the rich-text surface loads: no `<html>` wrapper, no
//! styles, one element per top-level block.
//! Pipeline: tree → events → RcDom → HTML string

use crate::common::nested_to_flat::tree_to_events;
use crate::error::FormatError;
use crate::ir::events::Event;
use crate::ir::nodes::{DocumentTree, InlineSpan, ListKind};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Serialize a document tree to an HTML fragment
pub fn serialize_to_html(tree: &DocumentTree) -> Result<String, FormatError> {
    let events = tree_to_events(tree);
    let container = build_html_dom(&events)?;
    serialize_children(&container)
}

/// Build an element tree from IR events under a detached container node
fn build_html_dom(events: &[Event]) -> Result<Handle, FormatError> {
    let container = create_element("div", vec![]);

    let mut current_parent: Handle = container.clone();
    let mut parent_stack: Vec<Handle> = vec![];

    // Item content goes into a `<p>` inside the `<li>` until the first child block
    let mut inline_target: Option<Handle> = None;

    let mut code_language: Option<String> = None;
    let mut code_lines: Vec<String> = vec![];

    for event in events {
        match event {
            Event::StartDocument | Event::EndDocument => {}

            Event::StartHeading(level) => {
                inline_target = None;
                let heading = create_element(&format!("h{}", (*level).clamp(1, 6)), vec![]);
                push_container(&mut current_parent, &mut parent_stack, heading);
            }

            Event::StartParagraph => {
                inline_target = None;
                let para = create_element("p", vec![]);
                push_container(&mut current_parent, &mut parent_stack, para);
            }

            Event::StartList(kind) => {
                inline_target = None;
                let list = match kind {
                    ListKind::Bullet => create_element("ul", vec![]),
                    ListKind::Ordered => create_element("ol", vec![]),
                    ListKind::Task => create_element("ul", vec![("data-type", "taskList")]),
                };
                push_container(&mut current_parent, &mut parent_stack, list);
            }

            Event::StartListItem | Event::StartTaskItem { .. } => {
                let item = match event {
                    Event::StartTaskItem { checked } => create_element(
                        "li",
                        vec![
                            ("data-type", "taskItem"),
                            ("data-checked", if *checked { "true" } else { "false" }),
                        ],
                    ),
                    _ => create_element("li", vec![]),
                };
                push_container(&mut current_parent, &mut parent_stack, item);

                let content = create_element("p", vec![]);
                current_parent.children.borrow_mut().push(content.clone());
                inline_target = Some(content);
            }

            Event::StartBlockquote => {
                inline_target = None;
                let quote = create_element("blockquote", vec![]);
                push_container(&mut current_parent, &mut parent_stack, quote);
            }

            Event::EndHeading(_)
            | Event::EndParagraph
            | Event::EndList
            | Event::EndListItem
            | Event::EndTaskItem
            | Event::EndBlockquote => {
                inline_target = None;
                current_parent = parent_stack.pop().ok_or_else(|| {
                    FormatError::SerializationError(format!("Unbalanced {event:?}"))
                })?;
            }

            Event::StartCodeBlock(language) => {
                inline_target = None;
                code_language = language.clone();
                code_lines.clear();
            }

            Event::CodeLine(line) => code_lines.push(line.clone()),

            Event::EndCodeBlock => {
                let pre = create_element("pre", vec![]);
                let class = code_language.take().map(|lang| format!("language-{lang}"));
                let code = match &class {
                    Some(class) => create_element("code", vec![("class", class.as_str())]),
                    None => create_element("code", vec![]),
                };
                code.children
                    .borrow_mut()
                    .push(create_text(&code_lines.join("\n")));
                pre.children.borrow_mut().push(code);
                current_parent.children.borrow_mut().push(pre);
                code_lines.clear();
            }

            Event::ThematicBreak => {
                inline_target = None;
                current_parent
                    .children
                    .borrow_mut()
                    .push(create_element("hr", vec![]));
            }

            Event::Inline(span) => {
                let target = inline_target.as_ref().unwrap_or(&current_parent);
                add_inline_to_node(target, span);
            }
        }
    }

    Ok(container)
}

fn push_container(current_parent: &mut Handle, parent_stack: &mut Vec<Handle>, node: Handle) {
    current_parent.children.borrow_mut().push(node.clone());
    parent_stack.push(current_parent.clone());
    *current_parent = node;
}

fn add_inline_to_node(parent: &Handle, span: &InlineSpan) {
    match span {
        InlineSpan::PlainText(text) => {
            for (i, segment) in text.split('\n').enumerate() {
                if i > 0 {
                    parent
                        .children
                        .borrow_mut()
                        .push(create_element("br", vec![]));
                }
                if !segment.is_empty() {
                    parent.children.borrow_mut().push(create_text(segment));
                }
            }
        }

        InlineSpan::Bold(children) => wrap_inline(parent, "strong", children),

        InlineSpan::Italic(children) => wrap_inline(parent, "em", children),

        InlineSpan::BoldItalic(children) => {
            let strong = create_element("strong", vec![]);
            parent.children.borrow_mut().push(strong.clone());
            wrap_inline(&strong, "em", children);
        }

        InlineSpan::Code(code_text) => {
            let code = create_element("code", vec![]);
            code.children.borrow_mut().push(create_text(code_text));
            parent.children.borrow_mut().push(code);
        }

        InlineSpan::Link { href, children } => {
            let anchor = create_element("a", vec![("href", href.as_str())]);
            parent.children.borrow_mut().push(anchor.clone());
            for child in children {
                add_inline_to_node(&anchor, child);
            }
        }
    }
}

fn wrap_inline(parent: &Handle, tag: &str, children: &[InlineSpan]) {
    let element = create_element(tag, vec![]);
    parent.children.borrow_mut().push(element.clone());
    for child in children {
        add_inline_to_node(&element, child);
    }
}

fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

/// Serialize each child of the container, one top-level block per line
fn serialize_children(container: &Handle) -> Result<String, FormatError> {
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let mut blocks = Vec::new();
    for child in container.children.borrow().iter() {
        let mut output = Vec::new();
        let serializable = SerializableHandle::from(child.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
        let html = String::from_utf8(output).map_err(|e| {
            FormatError::SerializationError(format!("UTF-8 conversion failed: {e}"))
        })?;
        blocks.push(html);
    }

    Ok(blocks.join("\n"))
}
