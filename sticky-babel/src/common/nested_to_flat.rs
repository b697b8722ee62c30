//! Flattens a [`DocumentTree`] into the [`Event`] stream writers consume.
//!
//! A block becomes its `Start*` event, its inline spans as `Inline` events,
//! its children in order, then its `End*` event. Code blocks carry their
//! lines as `CodeLine` events and never emit `Inline`. A thematic break is a
//! single event with no closing partner.
//!
//! Feeding the result to [`events_to_tree`](crate::common::flat_to_nested::events_to_tree)
//! gives back an equal tree.

use crate::ir::events::Event;
use crate::ir::nodes::{BlockKind, BlockNode, DocumentTree};

/// Walks `tree` depth first, bracketed by `StartDocument` and `EndDocument`.
pub fn tree_to_events(tree: &DocumentTree) -> Vec<Event> {
    let mut events = vec![Event::StartDocument];
    for child in &tree.children {
        flatten_block(child, &mut events);
    }
    events.push(Event::EndDocument);
    events
}

fn flatten_block(node: &BlockNode, events: &mut Vec<Event>) {
    let end = match &node.kind {
        BlockKind::Paragraph => {
            events.push(Event::StartParagraph);
            Event::EndParagraph
        }
        BlockKind::Heading(level) => {
            events.push(Event::StartHeading(*level));
            Event::EndHeading(*level)
        }
        BlockKind::BulletList | BlockKind::OrderedList | BlockKind::TaskList => {
            if let Some(kind) = node.kind.list_kind() {
                events.push(Event::StartList(kind));
            }
            Event::EndList
        }
        BlockKind::ListItem => {
            events.push(Event::StartListItem);
            Event::EndListItem
        }
        BlockKind::TaskItem { checked } => {
            events.push(Event::StartTaskItem { checked: *checked });
            Event::EndTaskItem
        }
        BlockKind::CodeBlock { language, lines } => {
            events.push(Event::StartCodeBlock(language.clone()));
            events.extend(lines.iter().cloned().map(Event::CodeLine));
            Event::EndCodeBlock
        }
        BlockKind::Blockquote => {
            events.push(Event::StartBlockquote);
            Event::EndBlockquote
        }
        BlockKind::ThematicBreak => {
            events.push(Event::ThematicBreak);
            return;
        }
    };

    events.extend(node.content.iter().cloned().map(Event::Inline));
    for child in &node.children {
        flatten_block(child, events);
    }
    events.push(end);
}
