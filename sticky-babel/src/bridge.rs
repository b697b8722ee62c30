//! Document bridge between persisted markdown and a rich-text editing surface.
//!
//! The bridge owns the single "last known markdown" string and decides, for
//! every event, whether a parse or a serialization is needed:
//!
//! - an external update (file load, sync) equal to the last known markdown is
//!   dropped without parsing; anything else is parsed and loaded wholesale;
//! - a local edit is serialized and compared with the last known markdown, and
//!   only a real difference produces a change notification;
//! - after an external load, a debounced re-validation serializes what the
//!   surface actually holds and silently adopts it. Editors normalize on load
//!   (e.g. dropping an empty trailing item); adopting that form without a
//!   notification is what stops a load from echoing back as an edit.
//!   The loaded value is remembered too, so the same persisted string
//!   delivered again after the adoption is still recognized.
//!
//! Time is passed in by the caller. The bridge never sleeps or spawns.

use crate::formats::markdown::parser::parse_markdown;
use crate::formats::markdown::serializer::serialize_markdown;
use crate::formats::markdown::FormattingRules;
use crate::ir::nodes::DocumentTree;
use serde::Serialize;
use std::time::{Duration, Instant};

/// The editor side of the bridge.
pub trait EditingSurface {
    /// Replace the surface's content wholesale.
    fn load_tree(&mut self, tree: DocumentTree);

    /// The surface's current content.
    fn snapshot(&self) -> DocumentTree;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BridgeState {
    Idle,
    ApplyingExternal,
    Serializing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalOutcome {
    /// Same as the last known markdown; nothing parsed
    Unchanged,
    /// Parsed and loaded into the surface
    Applied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit changed the markdown; persist this value
    Changed(String),
    /// The edit serialized to the last known markdown
    Unchanged,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    pub parses: usize,
    pub serializations: usize,
    pub notifications: usize,
}

pub struct DocumentBridge<S: EditingSurface> {
    surface: S,
    rules: FormattingRules,
    last_known: String,
    /// Persisted value behind the current surface content, until a local edit replaces it
    last_external: Option<String>,
    debounce: Duration,
    revalidate_at: Option<Instant>,
    state: BridgeState,
    stats: BridgeStats,
}

impl<S: EditingSurface> DocumentBridge<S> {
    pub fn new(surface: S, rules: FormattingRules, debounce: Duration) -> Self {
        Self {
            surface,
            rules,
            last_known: String::new(),
            last_external: None,
            debounce,
            revalidate_at: None,
            state: BridgeState::Idle,
            stats: BridgeStats::default(),
        }
    }

    /// Push markdown that changed outside the editor into the surface.
    pub fn apply_external(&mut self, markdown: &str, now: Instant) -> ExternalOutcome {
        debug_assert_eq!(self.state, BridgeState::Idle);
        if markdown == self.last_known || self.last_external.as_deref() == Some(markdown) {
            log::trace!("external update matches what the surface already holds");
            return ExternalOutcome::Unchanged;
        }

        self.transition(BridgeState::ApplyingExternal);
        let tree = parse_markdown(markdown, &self.rules);
        self.stats.parses += 1;
        self.surface.load_tree(tree);
        self.last_known = markdown.to_string();
        self.last_external = Some(markdown.to_string());
        self.revalidate_at = Some(now + self.debounce);
        self.transition(BridgeState::Idle);

        ExternalOutcome::Applied
    }

    /// Serialize an edit made on the surface.
    pub fn local_edit(&mut self, tree: &DocumentTree) -> EditOutcome {
        debug_assert_eq!(self.state, BridgeState::Idle);
        if self.revalidate_at.take().is_some() {
            log::trace!("pending re-validation superseded by local edit");
        }

        self.transition(BridgeState::Serializing);
        let markdown = self.serialize(tree);
        let outcome = if markdown != self.last_known {
            self.last_known = markdown.clone();
            self.last_external = None;
            self.stats.notifications += 1;
            EditOutcome::Changed(markdown)
        } else {
            EditOutcome::Unchanged
        };
        self.transition(BridgeState::Idle);

        outcome
    }

    /// Run the pending re-validation if it is due. Returns true if the
    /// surface's normalized content was adopted as the last known markdown.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.revalidate_at {
            Some(due) if now >= due => {
                self.revalidate_at = None;
            }
            _ => return false,
        }

        self.transition(BridgeState::Serializing);
        let snapshot = self.surface.snapshot();
        let markdown = self.serialize(&snapshot);
        let adopted = markdown != self.last_known;
        if adopted {
            log::debug!("adopting surface-normalized markdown without notification");
            self.last_known = markdown;
        }
        self.transition(BridgeState::Idle);

        adopted
    }

    fn serialize(&mut self, tree: &DocumentTree) -> String {
        self.stats.serializations += 1;
        serialize_markdown(tree, &self.rules)
    }

    fn transition(&mut self, next: BridgeState) {
        log::trace!("bridge {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn last_known(&self) -> &str {
        &self.last_known
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn revalidation_due(&self) -> Option<Instant> {
        self.revalidate_at
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn rules(&self) -> &FormattingRules {
        &self.rules
    }
}
