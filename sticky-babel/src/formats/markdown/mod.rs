//! Note markdown, the storage format
//!
//! Bidirectional conversion between note markdown and the document tree.
//! This is the storage format: every note on disk is markdown, and every edit
//! made on the rich-text surface is written back through the serializer.
//!
//! # Element Mapping Table
//!
//! | Tree node               | Markdown                     | Notes                                   |
//! |-------------------------|------------------------------|-----------------------------------------|
//! | Paragraph               | text lines                   | consecutive lines join with `\n`        |
//! | Paragraph (empty)       | blank line                   | runs capped at `max_blank_lines`        |
//! | Heading(n)              | `#`×n + space + text         | levels 1-6                              |
//! | BulletList / ListItem   | `- item`                     | `*` and `+` read, configured marker written |
//! | OrderedList / ListItem  | `1. item`                    | `1)` read, renumbered from 1 on write   |
//! | TaskList / TaskItem     | `- [ ] todo`, `- [x] done`   | `[X]` read as checked                   |
//! | CodeBlock               | fenced with three backticks  | lines verbatim, info string = language  |
//! | Blockquote              | `> text`                     | `>` alone separates paragraphs          |
//! | ThematicBreak           | `---`                        | `***` and `___` read                    |
//! | Bold / Italic           | `**x**` / `*x*`              |                                         |
//! | BoldItalic              | `***x***`                    |                                         |
//! | Code                    | `` `x` ``                    | opaque, never nested                    |
//! | Link                    | `[text](href)`               | href verbatim, including `note://`      |
//!
//! # Lossy Conversions
//!
//! Normalization is idempotent but not the identity on arbitrary input:
//! - list indentation is snapped to `indent_width` multiples
//! - bullet markers are unified, ordered numbering restarts at 1
//! - blank lines inside lists are dropped, blank runs elsewhere are capped
//! - trailing whitespace outside code blocks is trimmed
//!
//! # Architecture Notes
//!
//! Parsing and serialization share one [`FormattingRules`] value. The parser
//! emits IR events and leaves nesting to the common flat-to-nested assembler,
//! so depth bookkeeping lives in exactly one place.

pub mod formatting_rules;
pub mod inline;
pub mod parser;
pub mod serializer;

pub use formatting_rules::FormattingRules;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::DocumentTree;

/// Format implementation for note markdown
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormat {
    rules: FormattingRules,
}

impl MarkdownFormat {
    pub fn new(rules: FormattingRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &FormattingRules {
        &self.rules
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Sticky note markdown (storage format)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<DocumentTree, FormatError> {
        Ok(parser::parse_markdown(source, &self.rules))
    }

    fn serialize(&self, tree: &DocumentTree) -> Result<String, FormatError> {
        tree.validate()?;
        Ok(serializer::serialize_markdown(tree, &self.rules))
    }
}
