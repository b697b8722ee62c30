//! The seam every format plugs into.
//!
//! A format reads some text into a [`DocumentTree`], writes a tree back out,
//! or both. Read-only and write-only formats leave the other half at its
//! default, which reports [`FormatError::NotSupported`].

use crate::error::FormatError;
use crate::ir::nodes::DocumentTree;

/// A named, registrable document format.
///
/// ```ignore
/// struct Outline;
///
/// impl Format for Outline {
///     fn name(&self) -> &str {
///         "outline"
///     }
///
///     fn supports_serialization(&self) -> bool {
///         true
///     }
///
///     fn serialize(&self, tree: &DocumentTree) -> Result<String, FormatError> {
///         Ok(format!("{} blocks", tree.children.len()))
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// Registry key, also what `--from`/`--to` take on the command line
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions, without the dot, that select this format when a file is opened
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn supports_parsing(&self) -> bool {
        false
    }

    fn supports_serialization(&self) -> bool {
        false
    }

    fn parse(&self, _source: &str) -> Result<DocumentTree, FormatError> {
        Err(FormatError::cannot_parse(self.name()))
    }

    fn serialize(&self, _tree: &DocumentTree) -> Result<String, FormatError> {
        Err(FormatError::cannot_serialize(self.name()))
    }
}
