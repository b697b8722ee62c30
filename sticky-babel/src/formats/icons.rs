//! Icon mapping for the tree visualization format

/// Get the Unicode icon for a block kind name (see [`BlockKind::name`])
///
/// [`BlockKind::name`]: crate::ir::nodes::BlockKind::name
pub fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Document" => "⧉",
        "Heading" => "§",
        "Paragraph" => "¶",
        "BulletList" | "OrderedList" => "☰",
        "TaskList" => "☑",
        "ListItem" => "•",
        "TaskItem" => "□",
        "CodeBlock" => "𝒱",
        "Blockquote" => "\"",
        "ThematicBreak" => "⎯",
        _ => "○",
    }
}
