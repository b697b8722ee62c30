//! Markdown format tests
//!
//! Parsing and serialization of note markdown, the normalization round trip,
//! and a CommonMark cross-check of the serialized output.

mod commonmark;
mod export;
mod import;
mod roundtrip;
