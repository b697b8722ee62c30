//! Defines the flat event stream representation of a document.

use crate::ir::nodes::{InlineSpan, ListKind};

/// Represents a single event in the document stream.
///
/// Line-oriented readers (the markdown parser, the HTML reader) emit events in
/// document order and leave tree assembly to
/// [`events_to_tree`](crate::common::flat_to_nested::events_to_tree).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartDocument,
    EndDocument,
    StartHeading(u8),
    EndHeading(u8),
    StartParagraph,
    EndParagraph,
    StartList(ListKind),
    EndList,
    StartListItem,
    EndListItem,
    StartTaskItem {
        checked: bool,
    },
    EndTaskItem,
    StartCodeBlock(Option<String>),
    CodeLine(String),
    EndCodeBlock,
    StartBlockquote,
    EndBlockquote,
    ThematicBreak,
    Inline(InlineSpan),
}

impl Event {
    /// The event opening an item of the given list kind.
    pub fn start_item(kind: ListKind, checked: bool) -> Event {
        match kind {
            ListKind::Task => Event::StartTaskItem { checked },
            ListKind::Bullet | ListKind::Ordered => Event::StartListItem,
        }
    }

    /// The event closing an item of the given list kind.
    pub fn end_item(kind: ListKind) -> Event {
        match kind {
            ListKind::Task => Event::EndTaskItem,
            ListKind::Bullet | ListKind::Ordered => Event::EndListItem,
        }
    }
}
