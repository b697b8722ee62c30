//! Treeviz formatter for document trees
//!
//! A visual outline of the tree, one node per line, for inspecting what the
//! parsers produced. Serialization only.
//!
//! The format is:
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//! ⧉ Document (3 items)
//! ├─ § H1 Groceries
//! ├─ ☑ 2 items
//! │ ├─ □ [ ] Milk
//! │ └─ □ [x] Bread
//! │   └─ ☰ 1 items
//! │     └─ • whole grain
//! └─ ¶ (blank)

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::{BlockKind, BlockNode, DocumentTree, InlineSpan};

const LABEL_WIDTH: usize = 30;

fn format_node(node: &BlockNode, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    let icon = get_icon(node.kind.name());
    output.push_str(&format!("{prefix}{connector} {icon} {}\n", label(node)));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(&node.children, &child_prefix, output);
}

fn format_children(children: &[BlockNode], prefix: &str, output: &mut String) {
    for (i, child) in children.iter().enumerate() {
        format_node(child, prefix, i == children.len() - 1, output);
    }
}

fn label(node: &BlockNode) -> String {
    let text = first_line(&node.content);
    let full = match &node.kind {
        BlockKind::Paragraph if node.is_blank() => "(blank)".to_string(),
        BlockKind::Paragraph | BlockKind::ListItem => text,
        BlockKind::Heading(level) => format!("H{level} {text}"),
        BlockKind::TaskItem { checked } => {
            format!("[{}] {text}", if *checked { "x" } else { " " })
        }
        BlockKind::BulletList | BlockKind::OrderedList | BlockKind::TaskList => {
            format!("{} items", node.children.len())
        }
        BlockKind::CodeBlock { language, lines } => format!(
            "{} ({} lines)",
            language.as_deref().unwrap_or("code"),
            lines.len()
        ),
        BlockKind::Blockquote => format!("{} paragraphs", node.children.len()),
        BlockKind::ThematicBreak => "---".to_string(),
    };
    truncate(full.trim_end())
}

fn first_line(content: &[InlineSpan]) -> String {
    InlineSpan::plain_text(content)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string()
}

fn truncate(text: &str) -> String {
    if text.chars().count() > LABEL_WIDTH {
        let head: String = text.chars().take(LABEL_WIDTH - 1).collect();
        format!("{head}…")
    } else {
        text.to_string()
    }
}

/// Render a document tree as a treeviz outline
pub fn to_treeviz_str(tree: &DocumentTree) -> String {
    let mut output = format!(
        "{} Document ({} items)\n",
        get_icon("Document"),
        tree.children.len()
    );
    format_children(&tree.children, "", &mut output);
    output
}

/// Format implementation for treeviz format
#[derive(Debug, Clone, Copy, Default)]
pub struct TreevizFormat;

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Outline of the document tree, one icon-tagged line per node"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn serialize(&self, tree: &DocumentTree) -> Result<String, FormatError> {
        Ok(to_treeviz_str(tree))
    }
}
