//! Editor HTML
//!
//! This module implements bidirectional conversion between the document tree and
//! the HTML fragments a rich-text editing surface loads and emits.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` pair for both directions:
//! - `html5ever`: browser-grade HTML5 parser, tolerant of pasted markup
//! - `markup5ever_rcdom`: reference-counted DOM the serializer builds into
//!
//! # Element Mapping Table
//!
//! | Tree node        | HTML                                                      | Import Notes                         |
//! |------------------|-----------------------------------------------------------|--------------------------------------|
//! | Paragraph        | `<p>`                                                     | `\n` ↔ `<br>`                        |
//! | Heading(n)       | `<hN>`                                                    |                                      |
//! | BulletList       | `<ul>`                                                    |                                      |
//! | OrderedList      | `<ol>`                                                    |                                      |
//! | TaskList         | `<ul data-type="taskList">`                               | also any `ul` holding a task item    |
//! | ListItem         | `<li><p>content</p>…</li>`                                | leading inline text is content       |
//! | TaskItem         | `<li data-type="taskItem" data-checked="…">`              | falls back to a checked `<input>`    |
//! | CodeBlock        | `<pre><code class="language-x">`                          |                                      |
//! | Blockquote       | `<blockquote><p>…</p></blockquote>`                       | nested blocks flatten to paragraphs  |
//! | ThematicBreak    | `<hr>`                                                    |                                      |
//! | Bold / Italic    | `<strong>` / `<em>`                                       | `<b>` / `<i>` accepted               |
//! | BoldItalic       | `<strong><em>`                                            | either nesting order                 |
//! | Code             | `<code>`                                                  |                                      |
//! | Link             | `<a href>`                                                | `<a>` without href flattens          |
//!
//! # Lossy Conversions
//!
//! - unknown elements (tables, spans, images) keep only their text
//! - whitespace runs inside text are kept, newlines become spaces
//! - blocks nested in blockquotes flatten to paragraphs

mod parser;
mod serializer;

pub use parser::parse_from_html;
pub use serializer::serialize_to_html;

use crate::error::FormatError;
use crate::format::Format;
use crate::ir::nodes::DocumentTree;

/// Format implementation for editor HTML
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlFormat;

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Rich-text editor HTML fragment"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str) -> Result<DocumentTree, FormatError> {
        parse_from_html(source)
    }

    fn serialize(&self, tree: &DocumentTree) -> Result<String, FormatError> {
        tree.validate()?;
        serialize_to_html(tree)
    }
}
