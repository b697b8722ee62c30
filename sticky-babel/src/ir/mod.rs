//! Intermediate representation for sticky notes.
//!
//! This module defines the document tree handed to the editing surface and the
//! flat event stream every format reads and writes through.

pub mod events;
pub mod nodes;
