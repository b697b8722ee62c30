//! Name → format lookup
//!
//! Shells never name a concrete format type. They hold a registry, pick a
//! format by name or by file extension, and go through the [`Format`] trait.

use crate::error::FormatError;
use crate::format::Format;
use crate::formats::html::HtmlFormat;
use crate::formats::markdown::{FormattingRules, MarkdownFormat};
use crate::formats::treeviz::TreevizFormat;
use crate::ir::nodes::DocumentTree;
use std::collections::BTreeMap;
use std::path::Path;

/// Formats keyed by name, iterated in name order.
///
/// ```ignore
/// let registry = FormatRegistry::with_defaults();
/// let tree = registry.parse("- [ ] milk", "markdown")?;
/// let html = registry.serialize(&tree, "html")?;
/// ```
pub struct FormatRegistry {
    formats: BTreeMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formats: BTreeMap::new(),
        }
    }

    /// The stock formats: markdown (with default rules), html and treeviz.
    pub fn with_defaults() -> Self {
        Self::with_rules(FormattingRules::default())
    }

    /// The stock formats, markdown reading and writing with `rules`.
    pub fn with_rules(rules: FormattingRules) -> Self {
        let mut registry = Self::new();
        registry.register(MarkdownFormat::new(rules));
        registry.register(HtmlFormat);
        registry.register(TreevizFormat);
        registry
    }

    /// Adds `format` under its name. A format already registered under that name is replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        if self.formats.insert(name.clone(), Box::new(format)).is_some() {
            log::debug!("format '{name}' replaced");
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        match self.formats.get(name) {
            Some(format) => Ok(format.as_ref()),
            None => Err(FormatError::FormatNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.formats.contains_key(name)
    }

    pub fn formats(&self) -> impl Iterator<Item = &dyn Format> {
        self.formats.values().map(|format| format.as_ref())
    }

    pub fn list_formats(&self) -> Vec<String> {
        self.formats.keys().cloned().collect()
    }

    /// Name of the format owning the file's extension, if any.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.formats()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    pub fn parse(&self, source: &str, format: &str) -> Result<DocumentTree, FormatError> {
        let reader = self.get(format)?;
        if !reader.supports_parsing() {
            return Err(FormatError::cannot_parse(format));
        }
        reader.parse(source)
    }

    pub fn serialize(&self, tree: &DocumentTree, format: &str) -> Result<String, FormatError> {
        let writer = self.get(format)?;
        if !writer.supports_serialization() {
            return Err(FormatError::cannot_serialize(format));
        }
        writer.serialize(tree)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
