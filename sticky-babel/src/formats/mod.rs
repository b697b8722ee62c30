//! Format implementations
//!
//! This module contains all format implementations that convert between
//! the document tree and various text representations.

pub mod html;
pub mod icons;
pub mod markdown;
pub mod treeviz;

pub use html::HtmlFormat;
pub use markdown::{FormattingRules, MarkdownFormat};
pub use treeviz::TreevizFormat;
