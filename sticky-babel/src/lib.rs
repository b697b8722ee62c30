//! Markdown ↔ rich-text interoperability for sticky notes
//!
//!     Notes are persisted as markdown and edited on a rich-text surface. This crate converts
//!     between the two without drift: parsing what the user typed (including half-typed
//!     checkboxes and unterminated fences), handing the surface a structured document tree, and
//!     writing edits back in one canonical markdown form.
//!
//!     This is a pure lib. It powers the sticky CLI but is shell agnostic: no code here prints,
//!     reads env vars or touches the filesystem.
//!
//! Architecture
//!
//!     Formats never build trees directly. Each format reader emits the flat event stream of
//!     ./ir/events.rs and the common assembler (./common/flat_to_nested.rs) builds the nested
//!     tree, validating list/item kinds and assigning depths. The HTML writer goes the other way
//!     through ./common/nested_to_flat.rs. The markdown writer walks the validated tree
//!     directly, reading each node's depth and its list's kind as it goes.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── bridge.rs               # Last-known markdown, parse/serialize decisions
//!     ├── transforms.rs           # String → string conversions
//!     ├── formats
//!     │   ├── markdown            # Storage format: rules, inline spans, parser, serializer
//!     │   ├── html                # Editing-surface format
//!     │   └── treeviz             # Debug outline
//!     ├── ir                      # Document tree + event stream
//!     └── common                  # Tree assembly, flattening, link and task queries
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so these are
//!     included from tests/lib.rs.
//!
//! Round trips
//!
//!     Markdown normalization is idempotent: serialize(parse(serialize(parse(x)))) ==
//!     serialize(parse(x)). The first cycle may canonicalize (markers, indentation, numbering,
//!     blank runs); every later one is the identity. Both directions read the same
//!     FormattingRules, which is what makes the property hold for non-default rules too.

pub mod bridge;
pub mod error;
pub mod format;
pub mod formats;
pub mod registry;
pub mod transforms;

pub mod common;
pub mod ir;

pub use bridge::{DocumentBridge, EditingSurface};
pub use error::FormatError;
pub use format::Format;
pub use formats::markdown::FormattingRules;
pub use ir::nodes::{BlockKind, BlockNode, DocumentTree, InlineSpan, ListKind};
pub use registry::FormatRegistry;

/// Parse note markdown with the default rules.
pub fn parse(source: &str) -> DocumentTree {
    parse_with_rules(source, &FormattingRules::default())
}

pub fn parse_with_rules(source: &str, rules: &FormattingRules) -> DocumentTree {
    formats::markdown::parser::parse_markdown(source, rules)
}

/// Serialize a tree to note markdown with the default rules.
///
/// # Panics
///
/// Panics on a structurally invalid tree, see [`DocumentTree::validate`].
pub fn serialize(tree: &DocumentTree) -> String {
    serialize_with_rules(tree, &FormattingRules::default())
}

pub fn serialize_with_rules(tree: &DocumentTree, rules: &FormattingRules) -> String {
    formats::markdown::serializer::serialize_markdown(tree, rules)
}
