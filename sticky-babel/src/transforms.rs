//! Whole-string conversions
//!
//! Functional wrappers over the formats for callers that hold strings rather
//! than trees: the persistence layer normalizing a note before writing it, or a
//! shell converting between markdown and editor HTML.

use crate::error::FormatError;
use crate::formats::html::{parse_from_html, serialize_to_html};
use crate::formats::markdown::parser::parse_markdown;
use crate::formats::markdown::serializer::serialize_markdown;
use crate::formats::markdown::FormattingRules;

/// Round-trip transformation with default rules: parse and re-serialize
///
/// # Example
///
/// ```ignore
/// use sticky_babel::transforms::normalize_markdown;
///
/// assert_eq!(normalize_markdown("* [X] done  \n\n\n\ntext\n"), "- [x] done\n\ntext");
/// ```
pub fn normalize_markdown(source: &str) -> String {
    normalize_markdown_with_rules(source, &FormattingRules::default())
}

/// Round-trip transformation with custom formatting rules
pub fn normalize_markdown_with_rules(source: &str, rules: &FormattingRules) -> String {
    serialize_markdown(&parse_markdown(source, rules), rules)
}

/// Whether `source` is already in canonical form under `rules`
pub fn is_normalized(source: &str, rules: &FormattingRules) -> bool {
    normalize_markdown_with_rules(source, rules) == source
}

/// Render note markdown as editor HTML
pub fn markdown_to_html(source: &str, rules: &FormattingRules) -> Result<String, FormatError> {
    serialize_to_html(&parse_markdown(source, rules))
}

/// Convert editor HTML back to canonical note markdown
pub fn html_to_markdown(source: &str, rules: &FormattingRules) -> Result<String, FormatError> {
    let tree = parse_from_html(source)?;
    Ok(serialize_markdown(&tree, rules))
}
