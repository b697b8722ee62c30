//! Rebuilds a [`DocumentTree`] from a flat [`Event`] stream.
//!
//! Readers emit events in document order and never build nodes themselves.
//! [`events_to_tree`] keeps a stack of open blocks: a `Start*` event pushes a
//! block, content events land on the top of the stack, and an `End*` event
//! pops the top and hands it to the block underneath.
//!
//! Depth is assigned on push. A block opened inside a list shares the list's
//! depth, a block opened anywhere else sits one level below its container,
//! and top-level blocks are depth 0. Readers therefore never count indentation
//! into the tree.
//!
//! Nesting is checked while assembling. Task lists hold task items, bullet and
//! ordered lists hold plain items, items hold paragraphs and lists, quotes
//! hold paragraphs. Anything else is reported as a [`ConversionError`].

use crate::ir::events::Event;
use crate::ir::nodes::{BlockKind, BlockNode, DocumentTree, InlineSpan};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// A close event found something else on top of the stack
    #[error("expected {expected} to close, found {found}")]
    Unbalanced { expected: String, found: String },
    /// A block or span was handed to a container that cannot hold it
    #[error("misplaced content: {0}")]
    Misplaced(String),
    /// An event arrived with no open document
    #[error("no open document for {0}")]
    Orphaned(String),
    #[error("events continue after EndDocument")]
    TrailingEvents,
    /// Blocks still open when the document ended
    #[error("{0} block(s) left open at EndDocument")]
    Unterminated(usize),
}

enum Slot {
    Root(Vec<BlockNode>),
    Open(BlockNode),
}

impl Slot {
    fn label(&self) -> &'static str {
        match self {
            Slot::Root(_) => "Document",
            Slot::Open(node) => node.kind.name(),
        }
    }

    fn depth_below(&self) -> usize {
        match self {
            Slot::Root(_) => 0,
            Slot::Open(node) => node.child_depth(),
        }
    }

    fn adopt(&mut self, child: BlockNode) -> Result<(), ConversionError> {
        let parent = match self {
            Slot::Root(_) if child.kind.is_item() => {
                return Err(ConversionError::Misplaced(format!(
                    "{} outside of a list",
                    child.kind.name()
                )))
            }
            Slot::Root(blocks) => {
                blocks.push(child);
                return Ok(());
            }
            Slot::Open(parent) => parent,
        };

        let fits = match &parent.kind {
            BlockKind::TaskList => matches!(child.kind, BlockKind::TaskItem { .. }),
            BlockKind::BulletList | BlockKind::OrderedList => child.kind == BlockKind::ListItem,
            BlockKind::ListItem | BlockKind::TaskItem { .. } => {
                child.kind == BlockKind::Paragraph || child.kind.is_list()
            }
            BlockKind::Blockquote => child.kind == BlockKind::Paragraph,
            leaf => {
                return Err(ConversionError::Misplaced(format!(
                    "{} inside {}",
                    child.kind.name(),
                    leaf.name()
                )))
            }
        };
        if !fits {
            return Err(ConversionError::Misplaced(format!(
                "{} inside {}",
                child.kind.name(),
                parent.kind.name()
            )));
        }
        parent.children.push(child);
        Ok(())
    }
}

struct Assembler {
    stack: Vec<Slot>,
}

impl Assembler {
    fn top(&mut self, what: &str) -> Result<&mut Slot, ConversionError> {
        self.stack
            .last_mut()
            .ok_or_else(|| ConversionError::Orphaned(what.to_string()))
    }

    fn open(&mut self, kind: BlockKind) -> Result<(), ConversionError> {
        let depth = self.top(kind.name())?.depth_below();
        let mut node = BlockNode::new(kind);
        node.depth = depth;
        self.stack.push(Slot::Open(node));
        Ok(())
    }

    /// Pops the top block if `closes` accepts it and attaches it to its container.
    fn close(
        &mut self,
        expected: &str,
        closes: impl Fn(&BlockKind) -> bool,
    ) -> Result<(), ConversionError> {
        let node = match self.stack.pop() {
            Some(Slot::Open(node)) if closes(&node.kind) => node,
            Some(other) => {
                return Err(ConversionError::Unbalanced {
                    expected: expected.to_string(),
                    found: other.label().to_string(),
                })
            }
            None => return Err(ConversionError::Orphaned(expected.to_string())),
        };
        self.top(expected)?.adopt(node)
    }

    fn inline(&mut self, span: &InlineSpan) -> Result<(), ConversionError> {
        match self.top("inline content")? {
            Slot::Open(node) if node.kind.has_content() => {
                node.content.push(span.clone());
                Ok(())
            }
            other => Err(ConversionError::Misplaced(format!(
                "inline content inside {}",
                other.label()
            ))),
        }
    }

    fn code_line(&mut self, line: &str) -> Result<(), ConversionError> {
        match self.top("code line")? {
            Slot::Open(BlockNode {
                kind: BlockKind::CodeBlock { lines, .. },
                ..
            }) => {
                lines.push(line.to_string());
                Ok(())
            }
            other => Err(ConversionError::Misplaced(format!(
                "code line inside {}",
                other.label()
            ))),
        }
    }

    fn finish(mut self) -> Result<DocumentTree, ConversionError> {
        if self.stack.len() > 1 {
            return Err(ConversionError::Unterminated(self.stack.len() - 1));
        }
        match self.stack.pop() {
            Some(Slot::Root(children)) => Ok(DocumentTree { children }),
            _ => Err(ConversionError::Orphaned("EndDocument".to_string())),
        }
    }

    fn apply(&mut self, event: &Event) -> Result<(), ConversionError> {
        match event {
            Event::StartDocument => {
                return Err(ConversionError::Unbalanced {
                    expected: "content or EndDocument".to_string(),
                    found: "StartDocument".to_string(),
                })
            }
            // handled by events_to_tree
            Event::EndDocument => {}

            Event::StartHeading(level) => self.open(BlockKind::Heading(*level))?,
            Event::EndHeading(level) => {
                let level = *level;
                self.close(&format!("Heading({level})"), |kind| {
                    *kind == BlockKind::Heading(level)
                })?
            }

            Event::StartParagraph => self.open(BlockKind::Paragraph)?,
            Event::EndParagraph => self.close("Paragraph", |kind| *kind == BlockKind::Paragraph)?,

            Event::StartList(kind) => self.open(BlockKind::from(*kind))?,
            Event::EndList => self.close("a list", BlockKind::is_list)?,

            Event::StartListItem => self.open(BlockKind::ListItem)?,
            Event::EndListItem => self.close("ListItem", |kind| *kind == BlockKind::ListItem)?,

            Event::StartTaskItem { checked } => {
                self.open(BlockKind::TaskItem { checked: *checked })?
            }
            Event::EndTaskItem => self.close("TaskItem", |kind| {
                matches!(kind, BlockKind::TaskItem { .. })
            })?,

            Event::StartCodeBlock(language) => self.open(BlockKind::CodeBlock {
                language: language.clone(),
                lines: Vec::new(),
            })?,
            Event::CodeLine(line) => self.code_line(line)?,
            Event::EndCodeBlock => self.close("CodeBlock", |kind| {
                matches!(kind, BlockKind::CodeBlock { .. })
            })?,

            Event::StartBlockquote => self.open(BlockKind::Blockquote)?,
            Event::EndBlockquote => {
                self.close("Blockquote", |kind| *kind == BlockKind::Blockquote)?
            }

            Event::ThematicBreak => {
                self.open(BlockKind::ThematicBreak)?;
                self.close("ThematicBreak", |kind| *kind == BlockKind::ThematicBreak)?
            }

            Event::Inline(span) => self.inline(span)?,
        }
        Ok(())
    }
}

/// Assembles `events` into a tree, assigning every block its depth.
///
/// An empty slice is an empty document. Otherwise the stream must open with
/// `StartDocument`, close with `EndDocument` and balance every block in between.
///
/// ```ignore
/// let tree = events_to_tree(&[
///     Event::StartDocument,
///     Event::StartList(ListKind::Task),
///     Event::StartTaskItem { checked: false },
///     Event::Inline(InlineSpan::text("milk")),
///     Event::EndTaskItem,
///     Event::EndList,
///     Event::EndDocument,
/// ])?;
/// assert_eq!(tree.children[0].kind, BlockKind::TaskList);
/// ```
pub fn events_to_tree(events: &[Event]) -> Result<DocumentTree, ConversionError> {
    let (first, rest) = match events.split_first() {
        None => return Ok(DocumentTree::default()),
        Some(split) => split,
    };
    if *first != Event::StartDocument {
        return Err(ConversionError::Unbalanced {
            expected: "StartDocument".to_string(),
            found: format!("{first:?}"),
        });
    }

    let mut assembler = Assembler {
        stack: vec![Slot::Root(Vec::new())],
    };
    for (index, event) in rest.iter().enumerate() {
        if *event == Event::EndDocument {
            if index + 1 < rest.len() {
                return Err(ConversionError::TrailingEvents);
            }
            return assembler.finish();
        }
        assembler.apply(event)?;
    }
    Err(ConversionError::Unterminated(assembler.stack.len()))
}
