//! Document bridge behavior
//!
//! A recording editing surface stands in for the editor. It counts loads and,
//! like real editors, may normalize what it is given.

use crate::init_logger;
use sticky_babel::bridge::{BridgeState, EditOutcome, ExternalOutcome};
use sticky_babel::common::tasks::toggle_task;
use sticky_babel::{DocumentBridge, DocumentTree, EditingSurface, FormattingRules};
use std::time::{Duration, Instant};

const DEBOUNCE: Duration = Duration::from_millis(30);

#[derive(Default)]
struct RecordingSurface {
    tree: DocumentTree,
    loads: usize,
    /// Drops empty items on load, the way editors discard placeholder nodes
    drop_empty_items: bool,
}

impl EditingSurface for RecordingSurface {
    fn load_tree(&mut self, mut tree: DocumentTree) {
        if self.drop_empty_items {
            for list in tree.children.iter_mut().filter(|node| node.kind.is_list()) {
                list.children.retain(|item| !item.content.is_empty());
            }
            tree.children.retain(|node| !node.kind.is_list() || !node.children.is_empty());
        }
        self.tree = tree;
        self.loads += 1;
    }

    fn snapshot(&self) -> DocumentTree {
        self.tree.clone()
    }
}

fn bridge(surface: RecordingSurface) -> DocumentBridge<RecordingSurface> {
    init_logger();
    DocumentBridge::new(surface, FormattingRules::default(), DEBOUNCE)
}

#[test]
fn test_external_update_parses_once() {
    let mut bridge = bridge(RecordingSurface::default());
    let now = Instant::now();

    assert_eq!(
        bridge.apply_external("- [ ] a\n- [x] b", now),
        ExternalOutcome::Applied
    );
    assert_eq!(bridge.stats().parses, 1);
    assert_eq!(bridge.surface().loads, 1);
    assert_eq!(bridge.last_known(), "- [ ] a\n- [x] b");
    assert_eq!(bridge.revalidation_due(), Some(now + DEBOUNCE));
    assert_eq!(bridge.state(), BridgeState::Idle);
}

#[test]
fn test_repeated_external_update_is_dropped() {
    let mut bridge = bridge(RecordingSurface::default());
    let now = Instant::now();

    bridge.apply_external("note", now);
    assert_eq!(
        bridge.apply_external("note", now + Duration::from_millis(5)),
        ExternalOutcome::Unchanged
    );
    assert_eq!(bridge.stats().parses, 1);
    assert_eq!(bridge.surface().loads, 1);
}

#[test]
fn test_identical_local_edit_does_not_notify() {
    let mut bridge = bridge(RecordingSurface::default());
    bridge.apply_external("- [ ] a", Instant::now());

    let tree = bridge.surface().snapshot();
    assert_eq!(bridge.local_edit(&tree), EditOutcome::Unchanged);
    assert_eq!(bridge.stats().notifications, 0);
    assert_eq!(bridge.stats().serializations, 1);
}

#[test]
fn test_checkbox_click_notifies_with_new_markdown() {
    let mut bridge = bridge(RecordingSurface::default());
    bridge.apply_external("- [ ] a\n  - [ ] b", Instant::now());

    let clicked = toggle_task(&bridge.surface().snapshot(), 1).unwrap();
    assert_eq!(
        bridge.local_edit(&clicked),
        EditOutcome::Changed("- [ ] a\n  - [x] b".to_string())
    );
    assert_eq!(bridge.last_known(), "- [ ] a\n  - [x] b");
    assert_eq!(bridge.stats().notifications, 1);

    // The write-back arriving from persistence matches and is not re-parsed.
    assert_eq!(
        bridge.apply_external("- [ ] a\n  - [x] b", Instant::now()),
        ExternalOutcome::Unchanged
    );
    assert_eq!(bridge.stats().parses, 1);
}

#[test]
fn test_revalidation_adopts_surface_normalization_silently() {
    let mut bridge = bridge(RecordingSurface {
        drop_empty_items: true,
        ..RecordingSurface::default()
    });
    let start = Instant::now();

    bridge.apply_external("- [ ] keep\n- [ ]", start);
    assert!(!bridge.tick(start + Duration::from_millis(10)));

    assert!(bridge.tick(start + DEBOUNCE));
    assert_eq!(bridge.last_known(), "- [ ] keep");
    assert_eq!(bridge.stats().notifications, 0);
    assert_eq!(bridge.revalidation_due(), None);

    // The normalized form is now the baseline, so the next identical edit is quiet.
    let tree = bridge.surface().snapshot();
    assert_eq!(bridge.local_edit(&tree), EditOutcome::Unchanged);
}

#[test]
fn test_revalidation_without_normalization_keeps_baseline() {
    let mut bridge = bridge(RecordingSurface::default());
    let start = Instant::now();

    bridge.apply_external("* messy   \n\n\n\ntext", start);
    assert!(bridge.tick(start + DEBOUNCE));
    assert_eq!(bridge.last_known(), "- messy\n\ntext");
    assert!(!bridge.tick(start + DEBOUNCE * 2));
}

#[test]
fn test_persisted_value_redelivered_after_revalidation_is_dropped() {
    let mut bridge = bridge(RecordingSurface {
        drop_empty_items: true,
        ..RecordingSurface::default()
    });
    let start = Instant::now();

    bridge.apply_external("* [X] keep\n* [ ]", start);
    assert!(bridge.tick(start + DEBOUNCE));
    assert_eq!(bridge.last_known(), "- [x] keep");

    // A file watcher firing again with the untouched file on disk
    assert_eq!(
        bridge.apply_external("* [X] keep\n* [ ]", start + DEBOUNCE * 2),
        ExternalOutcome::Unchanged
    );
    assert_eq!(bridge.stats().parses, 1);
    assert_eq!(bridge.surface().loads, 1);

    // The adopted form is recognized as well
    assert_eq!(
        bridge.apply_external("- [x] keep", start + DEBOUNCE * 3),
        ExternalOutcome::Unchanged
    );
}

#[test]
fn test_local_edit_supersedes_pending_revalidation() {
    let mut bridge = bridge(RecordingSurface {
        drop_empty_items: true,
        ..RecordingSurface::default()
    });
    let start = Instant::now();

    bridge.apply_external("- [ ] keep\n- [ ]", start);
    let edited = sticky_babel::parse("- [x] keep");
    assert_eq!(
        bridge.local_edit(&edited),
        EditOutcome::Changed("- [x] keep".to_string())
    );

    assert_eq!(bridge.revalidation_due(), None);
    assert!(!bridge.tick(start + DEBOUNCE));
    assert_eq!(bridge.last_known(), "- [x] keep");
}

#[test]
fn test_clearing_the_note() {
    let mut bridge = bridge(RecordingSurface::default());
    bridge.apply_external("text", Instant::now());

    assert_eq!(
        bridge.local_edit(&DocumentTree::default()),
        EditOutcome::Changed(String::new())
    );
    assert_eq!(
        bridge.apply_external("", Instant::now()),
        ExternalOutcome::Unchanged
    );
}
