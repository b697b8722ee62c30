//! Inspection transforms
//!
//! Views of a parsed note for debugging the parser and the editor mapping.
//! Every transform starts from the same DocumentTree, so a surprising result
//! in one view can be cross-checked against the others:
//!
//! - `tree`: outline with icons, one node per line
//! - `tree-json`: the full tree as JSON, depths included
//! - `events`: the flat event stream the writers consume
//! - `html`: the markup handed to the editing surface
//!
//! Example: `sticky inspect note.md events`

use sticky_babel::common::nested_to_flat::tree_to_events;
use sticky_babel::formats::html::serialize_to_html;
use sticky_babel::formats::treeviz::to_treeviz_str;
use sticky_babel::DocumentTree;

/// All available inspect transforms
pub const AVAILABLE_TRANSFORMS: &[&str] = &["tree", "tree-json", "events", "html"];

pub const DEFAULT_TRANSFORM: &str = "tree";

/// Execute a named transform on a parsed note
///
/// # Returns
///
/// The transformed output as a string, or an error message
pub fn execute_transform(tree: &DocumentTree, transform_name: &str) -> Result<String, String> {
    match transform_name {
        "tree" => Ok(to_treeviz_str(tree)),
        "tree-json" => serde_json::to_string_pretty(tree)
            .map(|json| json + "\n")
            .map_err(|e| format!("JSON serialization failed: {e}")),
        "events" => Ok(tree_to_events(tree)
            .iter()
            .map(|event| format!("{event:?}\n"))
            .collect()),
        "html" => serialize_to_html(tree)
            .map(|html| html + "\n")
            .map_err(|e| format!("Transform failed: {e}")),
        _ => Err(format!(
            "Unknown transform '{transform_name}'. Available: {}",
            AVAILABLE_TRANSFORMS.join(", ")
        )),
    }
}
