use leptos::prelude::*;

/// Remote update signal for page trees.
///
/// Any part of the app that mutates the page hierarchy (create/rename/move/
/// delete) notifies this bus after server success; every mounted tree
/// subscribes and revalidates the affected nodes. The bus is an owned value
/// (normally one per `AppState`, provided via context) so independent tree
/// instances in tests can be isolated.
///
/// Non-responsibilities:
/// - deciding *how* to revalidate (see `tree::revalidate`)
/// - in-flight fetch bookkeeping (see `cache::children`)
#[derive(Clone, Copy)]
pub(crate) struct TreeChangeBus {
    /// Monotonic counter: "the tree has changed since you last looked".
    generation: RwSignal<u64>,

    /// `None` means "whole tree invalid"; otherwise the node ids known to
    /// have changed. Replaced, not merged, on every notify.
    last_updated_item_ids: RwSignal<Option<Vec<String>>>,
}

impl TreeChangeBus {
    pub fn new() -> Self {
        Self {
            generation: RwSignal::new(0),
            last_updated_item_ids: RwSignal::new(None),
        }
    }

    /// Record the given ids as changed, then bump the generation.
    ///
    /// The snapshot is written before the generation so a subscriber woken by
    /// the bump never reads a stale id set.
    pub fn notify_update_items(&self, ids: Vec<String>) {
        self.last_updated_item_ids.set(Some(ids));
        self.generation.update(|g| *g += 1);
    }

    /// Mark every mounted tree as fully stale.
    pub fn notify_update_all_trees(&self) {
        self.last_updated_item_ids.set(None);
        self.generation.update(|g| *g += 1);
    }

    /// Tracked read; re-runs the surrounding effect on every notify.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Tracked read of the scope snapshot.
    pub fn last_updated_item_ids(&self) -> Option<Vec<String>> {
        self.last_updated_item_ids.get()
    }

    pub fn generation_untracked(&self) -> u64 {
        self.generation.get_untracked()
    }

    #[allow(dead_code)]
    pub fn last_updated_item_ids_untracked(&self) -> Option<Vec<String>> {
        self.last_updated_item_ids.get_untracked()
    }
}

impl Default for TreeChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_items_bumps_generation_and_records_ids() {
        let bus = TreeChangeBus::new();
        assert_eq!(bus.generation_untracked(), 0);

        bus.notify_update_items(vec!["p1".to_string(), "p2".to_string()]);
        assert_eq!(bus.generation_untracked(), 1);
        assert_eq!(
            bus.last_updated_item_ids_untracked(),
            Some(vec!["p1".to_string(), "p2".to_string()])
        );
    }

    #[test]
    fn test_notify_all_sets_null_scope() {
        let bus = TreeChangeBus::new();
        bus.notify_update_items(vec!["p1".to_string()]);
        bus.notify_update_all_trees();

        assert_eq!(bus.generation_untracked(), 2);
        assert_eq!(bus.last_updated_item_ids_untracked(), None);
    }

    #[test]
    fn test_scope_snapshot_is_last_write_wins() {
        let bus = TreeChangeBus::new();

        // items then all-trees: whole-tree scope wins
        bus.notify_update_items(vec!["x".to_string()]);
        bus.notify_update_all_trees();
        assert_eq!(bus.last_updated_item_ids_untracked(), None);

        // all-trees then items: targeted scope wins
        bus.notify_update_all_trees();
        bus.notify_update_items(vec!["y".to_string()]);
        assert_eq!(
            bus.last_updated_item_ids_untracked(),
            Some(vec!["y".to_string()])
        );
        assert_eq!(bus.generation_untracked(), 4);
    }

    #[test]
    fn test_back_to_back_notifies_are_not_batched() {
        let bus = TreeChangeBus::new();
        bus.notify_update_items(vec!["a".to_string()]);
        bus.notify_update_items(vec!["b".to_string()]);
        assert_eq!(bus.generation_untracked(), 2);
    }
}
