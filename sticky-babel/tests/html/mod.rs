//! HTML format tests
//!
//! The editing-surface markup: what editors hand back, and the
//! markdown → HTML → markdown round trip.

mod import;
mod roundtrip;
