//! Format-agnostic logic shared by every format: event stream assembly and
//! flattening, plus read-only queries over finished trees.

pub mod flat_to_nested;
pub mod links;
pub mod nested_to_flat;
pub mod tasks;
