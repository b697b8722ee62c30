//! Task item queries and the checkbox-toggle edit.
//!
//! Task items are addressed by their document-order index: the n-th task item
//! met in a pre-order walk, nested items included.

use crate::ir::nodes::{BlockKind, BlockNode, DocumentTree};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub done: usize,
    pub total: usize,
}

impl TaskSummary {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done == self.total
    }
}

pub fn task_summary(tree: &DocumentTree) -> TaskSummary {
    let mut summary = TaskSummary::default();
    tree.walk(&mut |node| {
        if let BlockKind::TaskItem { checked } = node.kind {
            summary.total += 1;
            if checked {
                summary.done += 1;
            }
        }
    });
    summary
}

/// Returns a copy of `tree` with the task item at `index` flipped, or `None`
/// if the document has fewer task items.
pub fn toggle_task(tree: &DocumentTree, index: usize) -> Option<DocumentTree> {
    let mut toggled = tree.clone();
    let mut remaining = index;
    toggled
        .children
        .iter_mut()
        .any(|node| toggle_in(node, &mut remaining))
        .then_some(toggled)
}

fn toggle_in(node: &mut BlockNode, remaining: &mut usize) -> bool {
    if let BlockKind::TaskItem { checked } = &mut node.kind {
        if *remaining == 0 {
            *checked = !*checked;
            return true;
        }
        *remaining -= 1;
    }
    node.children
        .iter_mut()
        .any(|child| toggle_in(child, remaining))
}
