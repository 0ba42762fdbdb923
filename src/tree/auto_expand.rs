use crate::cache::ChildrenFetchCache;
use crate::tree::store::PageTreeStore;
use leptos::prelude::*;

/// Edge detector for the "create child page" trigger.
///
/// Fires only when the trigger transitions to a *new* non-empty value; a
/// re-render with the same value is a no-op, and observing `None` re-arms the
/// detector. Kept as an explicit state machine so the firing rule does not
/// depend on the host framework's re-render cadence.
#[derive(Clone, Debug, Default)]
pub(crate) struct CreateTriggerTracker {
    last_seen: Option<String>,
}

impl CreateTriggerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the side effect should fire.
    pub fn on_trigger_value_changed(&mut self, new_value: Option<&str>) -> bool {
        match new_value {
            None => {
                self.last_seen = None;
                false
            }
            Some(v) if self.last_seen.as_deref() == Some(v) => false,
            Some(v) => {
                self.last_seen = Some(v.to_string());
                true
            }
        }
    }
}

/// One-shot side effect: when the user initiates "create child page" under
/// `creating_parent_id`, make sure the parent is visible and will re-fetch,
/// so the new placeholder shows up without a full reload.
pub(crate) fn use_auto_expand_on_create(
    tree: PageTreeStore,
    cache: ChildrenFetchCache,
    creating_parent_id: RwSignal<Option<String>>,
    on_expanded: Option<Callback<String>>,
) {
    let tracker = StoredValue::new(CreateTriggerTracker::new());

    Effect::new(move |_| {
        let value = creating_parent_id.get();

        let fired = tracker
            .try_update_value(|t| t.on_trigger_value_changed(value.as_deref()))
            .unwrap_or(false);
        if !fired {
            return;
        }
        let Some(parent_id) = value else {
            return;
        };

        // Foldability may have changed (a leaf is about to gain a child).
        tree.rebuild_tree();

        if let Some(item) = tree.item_instance(&parent_id) {
            if !item.is_expanded() {
                item.expand();
            }
            item.invalidate_children(false);
        }

        // Drop any in-flight fetch for the parent so the next one includes
        // the new placeholder entry.
        cache.invalidate_page_tree_children(Some(std::slice::from_ref(&parent_id)));

        if let Some(cb) = on_expanded {
            cb.run(parent_id);
        }
    });
}
