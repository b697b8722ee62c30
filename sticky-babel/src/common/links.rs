//! Link classification and collection.
//!
//! Notes link to each other with `note://<id>` hrefs. These travel through
//! markdown and HTML verbatim; this module only reads them.

use crate::ir::nodes::{DocumentTree, InlineSpan};
use serde::Serialize;
use url::Url;

pub const NOTE_SCHEME: &str = "note://";

/// What a link's href points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Another note, by id
    Note { id: String },
    /// An `http` or `https` URL
    External(Url),
    /// Anything else (relative paths, `mailto:`, malformed URLs)
    Other(String),
}

impl LinkTarget {
    pub fn classify(href: &str) -> LinkTarget {
        if let Some(id) = href.strip_prefix(NOTE_SCHEME) {
            if !id.is_empty() {
                return LinkTarget::Note { id: id.to_string() };
            }
            return LinkTarget::Other(href.to_string());
        }
        match Url::parse(href) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => LinkTarget::External(url),
            _ => LinkTarget::Other(href.to_string()),
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, LinkTarget::Note { .. })
    }
}

/// A link found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkRef {
    pub href: String,
    /// The link's visible text, formatting stripped
    pub text: String,
}

impl LinkRef {
    pub fn target(&self) -> LinkTarget {
        LinkTarget::classify(&self.href)
    }
}

/// The href for a link to the note with the given id.
pub fn note_href(id: &str) -> String {
    format!("{NOTE_SCHEME}{id}")
}

/// All links in document order, including links in headings, items and quotes.
pub fn collect_links(tree: &DocumentTree) -> Vec<LinkRef> {
    let mut links = Vec::new();
    tree.walk(&mut |node| collect_from_spans(&node.content, &mut links));
    links
}

/// Ids of the notes this document links to, first occurrence order, without duplicates.
pub fn note_links(tree: &DocumentTree) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for link in collect_links(tree) {
        if let LinkTarget::Note { id } = link.target() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    ids
}

fn collect_from_spans(spans: &[InlineSpan], links: &mut Vec<LinkRef>) {
    for span in spans {
        match span {
            InlineSpan::Link { href, children } => links.push(LinkRef {
                href: href.clone(),
                text: InlineSpan::plain_text(children),
            }),
            InlineSpan::Bold(children)
            | InlineSpan::Italic(children)
            | InlineSpan::BoldItalic(children) => collect_from_spans(children, links),
            InlineSpan::PlainText(_) | InlineSpan::Code(_) => {}
        }
    }
}
