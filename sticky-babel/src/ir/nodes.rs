//! Core data structures for the document tree.
//!
//!     A note is held in two shapes: the persisted markdown string and the
//!     [`DocumentTree`] handed to the editing surface. The tree is an ordered
//!     forest of [`BlockNode`]s whose leaves carry [`InlineSpan`]s.
//!
//!     Nesting is structural. A nested list lives inside the item that owns it,
//!     never as an indentation attribute on a flat item, so the depth the parser
//!     reads from indentation and the depth the serializer writes back are the
//!     same number by construction.
//!
//! Depth
//!
//!     Top level nodes have depth 0. Children of a list share the list's depth
//!     (a list is only a grouping of items), children of any other container sit
//!     one level deeper:
//!
//!     ```text
//!     - a                 TaskList(0) > TaskItem(0)
//!       - b               TaskItem(0) > TaskList(1) > TaskItem(1)
//!       continuation      TaskItem(0) > Paragraph(1)
//!     ```

use serde::Serialize;
use thiserror::Error;

/// Inline content of a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InlineSpan {
    PlainText(String),
    Bold(Vec<InlineSpan>),
    Italic(Vec<InlineSpan>),
    BoldItalic(Vec<InlineSpan>),
    /// Inline code never nests further.
    Code(String),
    Link {
        href: String,
        children: Vec<InlineSpan>,
    },
}

impl InlineSpan {
    pub fn text(text: impl Into<String>) -> Self {
        InlineSpan::PlainText(text.into())
    }

    /// Flattens spans into their visible text, dropping all markup.
    pub fn plain_text(spans: &[InlineSpan]) -> String {
        let mut out = String::new();
        for span in spans {
            span.push_plain_text(&mut out);
        }
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            InlineSpan::PlainText(text) | InlineSpan::Code(text) => out.push_str(text),
            InlineSpan::Bold(children)
            | InlineSpan::Italic(children)
            | InlineSpan::BoldItalic(children)
            | InlineSpan::Link { children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// The three list flavours a note can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ListKind {
    Bullet,
    Ordered,
    Task,
}

impl ListKind {
    pub fn name(&self) -> &'static str {
        match self {
            ListKind::Bullet => "BulletList",
            ListKind::Ordered => "OrderedList",
            ListKind::Task => "TaskList",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    BulletList,
    OrderedList,
    TaskList,
    ListItem,
    TaskItem {
        checked: bool,
    },
    /// Raw lines, never inline-formatted.
    CodeBlock {
        language: Option<String>,
        lines: Vec<String>,
    },
    Blockquote,
    ThematicBreak,
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph => "Paragraph",
            BlockKind::Heading(_) => "Heading",
            BlockKind::BulletList => "BulletList",
            BlockKind::OrderedList => "OrderedList",
            BlockKind::TaskList => "TaskList",
            BlockKind::ListItem => "ListItem",
            BlockKind::TaskItem { .. } => "TaskItem",
            BlockKind::CodeBlock { .. } => "CodeBlock",
            BlockKind::Blockquote => "Blockquote",
            BlockKind::ThematicBreak => "ThematicBreak",
        }
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            BlockKind::BulletList => Some(ListKind::Bullet),
            BlockKind::OrderedList => Some(ListKind::Ordered),
            BlockKind::TaskList => Some(ListKind::Task),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        self.list_kind().is_some()
    }

    pub fn is_item(&self) -> bool {
        matches!(self, BlockKind::ListItem | BlockKind::TaskItem { .. })
    }

    /// Whether the node carries inline content of its own.
    pub fn has_content(&self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading(_)
                | BlockKind::ListItem
                | BlockKind::TaskItem { .. }
        )
    }
}

impl From<ListKind> for BlockKind {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Bullet => BlockKind::BulletList,
            ListKind::Ordered => BlockKind::OrderedList,
            ListKind::Task => BlockKind::TaskList,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockNode {
    pub kind: BlockKind,
    pub depth: usize,
    pub content: Vec<InlineSpan>,
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn new(kind: BlockKind) -> Self {
        BlockNode {
            kind,
            depth: 0,
            content: vec![],
            children: vec![],
        }
    }

    pub fn paragraph(content: Vec<InlineSpan>) -> Self {
        BlockNode {
            content,
            ..BlockNode::new(BlockKind::Paragraph)
        }
    }

    /// An empty paragraph, the editor's blank separator line.
    pub fn blank() -> Self {
        BlockNode::new(BlockKind::Paragraph)
    }

    pub fn heading(level: u8, content: Vec<InlineSpan>) -> Self {
        BlockNode {
            content,
            ..BlockNode::new(BlockKind::Heading(level))
        }
    }

    pub fn list(kind: ListKind, items: Vec<BlockNode>) -> Self {
        BlockNode {
            children: items,
            ..BlockNode::new(kind.into())
        }
    }

    pub fn item(content: Vec<InlineSpan>, children: Vec<BlockNode>) -> Self {
        BlockNode {
            content,
            children,
            ..BlockNode::new(BlockKind::ListItem)
        }
    }

    pub fn task_item(checked: bool, content: Vec<InlineSpan>, children: Vec<BlockNode>) -> Self {
        BlockNode {
            content,
            children,
            ..BlockNode::new(BlockKind::TaskItem { checked })
        }
    }

    pub fn code_block(language: Option<String>, lines: Vec<String>) -> Self {
        BlockNode::new(BlockKind::CodeBlock { language, lines })
    }

    pub fn blockquote(paragraphs: Vec<BlockNode>) -> Self {
        BlockNode {
            children: paragraphs,
            ..BlockNode::new(BlockKind::Blockquote)
        }
    }

    pub fn thematic_break() -> Self {
        BlockNode::new(BlockKind::ThematicBreak)
    }

    pub fn is_blank(&self) -> bool {
        self.kind == BlockKind::Paragraph && self.content.is_empty()
    }

    /// Depth handed down to this node's children.
    pub fn child_depth(&self) -> usize {
        if self.kind.is_list() {
            self.depth
        } else {
            self.depth + 1
        }
    }

    fn assign_depth(&mut self, depth: usize) {
        self.depth = depth;
        let child_depth = self.child_depth();
        for child in &mut self.children {
            child.assign_depth(child_depth);
        }
    }

    fn validate(&self, expected_depth: usize) -> Result<(), TreeError> {
        if self.depth != expected_depth {
            return Err(TreeError::DepthMismatch {
                kind: self.kind.name(),
                expected: expected_depth,
                found: self.depth,
            });
        }

        if !self.kind.has_content() && !self.content.is_empty() {
            return Err(TreeError::UnexpectedContent {
                kind: self.kind.name(),
            });
        }

        match &self.kind {
            BlockKind::Heading(level) if !(1..=6).contains(level) => {
                return Err(TreeError::InvalidHeadingLevel(*level));
            }
            BlockKind::Paragraph
            | BlockKind::Heading(_)
            | BlockKind::CodeBlock { .. }
            | BlockKind::ThematicBreak => {
                if !self.children.is_empty() {
                    return Err(TreeError::UnexpectedChildren {
                        kind: self.kind.name(),
                    });
                }
            }
            BlockKind::BulletList | BlockKind::OrderedList | BlockKind::TaskList => {
                let task_list = self.kind == BlockKind::TaskList;
                for child in &self.children {
                    match &child.kind {
                        BlockKind::TaskItem { .. } if task_list => {}
                        BlockKind::ListItem if !task_list => {}
                        other if other.is_item() => {
                            return Err(TreeError::ItemKindMismatch {
                                list: self.kind.name(),
                                item: other.name(),
                            });
                        }
                        other => {
                            return Err(TreeError::NonItemInList {
                                list: self.kind.name(),
                                found: other.name(),
                            });
                        }
                    }
                }
            }
            BlockKind::ListItem | BlockKind::TaskItem { .. } => {
                for child in &self.children {
                    if child.kind != BlockKind::Paragraph && !child.kind.is_list() {
                        return Err(TreeError::InvalidChild {
                            parent: self.kind.name(),
                            found: child.kind.name(),
                        });
                    }
                }
            }
            BlockKind::Blockquote => {
                for child in &self.children {
                    if child.kind != BlockKind::Paragraph {
                        return Err(TreeError::InvalidChild {
                            parent: "Blockquote",
                            found: child.kind.name(),
                        });
                    }
                }
            }
        }

        let child_depth = self.child_depth();
        for child in &self.children {
            child.validate(child_depth)?;
        }
        Ok(())
    }
}

/// The structured form of a note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentTree {
    pub children: Vec<BlockNode>,
}

impl DocumentTree {
    /// Builds a tree and assigns every node its depth from containment.
    pub fn new(children: Vec<BlockNode>) -> Self {
        let mut tree = DocumentTree { children };
        tree.assign_depths();
        tree
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn assign_depths(&mut self) {
        for child in &mut self.children {
            child.assign_depth(0);
        }
    }

    /// Checks the structural invariants every serializable tree must hold.
    pub fn validate(&self) -> Result<(), TreeError> {
        for child in &self.children {
            if child.kind.is_item() {
                return Err(TreeError::ItemOutsideList {
                    item: child.kind.name(),
                });
            }
            child.validate(0)?;
        }
        Ok(())
    }

    /// Pre-order walk over every block in the tree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a BlockNode)) {
        fn walk_node<'a>(node: &'a BlockNode, visit: &mut impl FnMut(&'a BlockNode)) {
            visit(node);
            for child in &node.children {
                walk_node(child, visit);
            }
        }
        for child in &self.children {
            walk_node(child, visit);
        }
    }
}

/// Structural violations found by [`DocumentTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("{item} outside of any list")]
    ItemOutsideList { item: &'static str },
    #[error("{list} cannot hold a {item}")]
    ItemKindMismatch {
        list: &'static str,
        item: &'static str,
    },
    #[error("{list} can only hold list items, found {found}")]
    NonItemInList {
        list: &'static str,
        found: &'static str,
    },
    #[error("{parent} cannot hold a {found}")]
    InvalidChild {
        parent: &'static str,
        found: &'static str,
    },
    #[error("{kind} cannot have children")]
    UnexpectedChildren { kind: &'static str },
    #[error("{kind} cannot carry inline content")]
    UnexpectedContent { kind: &'static str },
    #[error("heading level {0} is outside 1-6")]
    InvalidHeadingLevel(u8),
    #[error("{kind} has depth {found}, expected {expected}")]
    DepthMismatch {
        kind: &'static str,
        expected: usize,
        found: usize,
    },
}
