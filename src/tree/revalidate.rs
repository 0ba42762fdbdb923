use crate::state::TreeChangeBus;
use crate::tree::store::PageTreeStore;
use leptos::prelude::*;

/// What a stale subscriber should invalidate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum RevalidationScope {
    /// Invalidate the root's children recursively.
    AllTrees,
    /// Invalidate only the listed nodes' children.
    Items(Vec<String>),
}

/// Per-tree staleness tracking: Fresh while the local generation matches the
/// bus, Stale once the bus moves ahead. `observe` transitions Stale -> Fresh
/// synchronously, so each generation bump yields at most one invalidation
/// pass per subscriber.
#[derive(Clone, Debug)]
pub(crate) struct RevalidationTracker {
    last_seen_generation: u64,
}

impl RevalidationTracker {
    pub fn new(current_generation: u64) -> Self {
        Self {
            last_seen_generation: current_generation,
        }
    }

    /// Returns the scope to apply, or `None` while fresh.
    ///
    /// When several notifies collapsed between checks, only the latest
    /// snapshot applies (last-write-wins). That trades precision for
    /// convergence: an invalidated node re-fetches truth from the server, so
    /// the tree can be over- or under-targeted but never wrong.
    pub fn observe(
        &mut self,
        generation: u64,
        last_updated_item_ids: Option<&[String]>,
    ) -> Option<RevalidationScope> {
        if generation <= self.last_seen_generation {
            return None;
        }

        self.last_seen_generation = generation;
        Some(match last_updated_item_ids {
            None => RevalidationScope::AllTrees,
            Some(ids) => RevalidationScope::Items(ids.to_vec()),
        })
    }
}

/// Apply a scope to one tree. Ids missing from the tree are skipped: the node
/// may have been unmounted or never loaded.
pub(crate) fn apply_revalidation_scope(tree: &PageTreeStore, scope: &RevalidationScope) {
    match scope {
        RevalidationScope::AllTrees => {
            if let Some(root) = tree.item_instance(&tree.root_id()) {
                root.invalidate_children(true);
            }
        }
        RevalidationScope::Items(ids) => {
            for id in ids {
                if let Some(item) = tree.item_instance(id) {
                    item.invalidate_children(false);
                }
            }
        }
    }
}

/// Bind one tree to the change bus: whenever the bus generation moves past
/// this tree's last-seen generation, invalidate the affected nodes and let
/// the host react.
pub(crate) fn use_tree_revalidation(
    bus: TreeChangeBus,
    tree: PageTreeStore,
    on_revalidated: Option<Callback<()>>,
) {
    let tracker = StoredValue::new(RevalidationTracker::new(bus.generation_untracked()));

    Effect::new(move |_| {
        let generation = bus.generation();
        let last_updated = bus.last_updated_item_ids();

        let scope = tracker
            .try_update_value(|t| t.observe(generation, last_updated.as_deref()))
            .flatten();

        if let Some(scope) = scope {
            apply_revalidation_scope(&tree, &scope);
            if let Some(cb) = on_revalidated {
                cb.run(());
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;

    fn page(id: &str, path: &str, descendants: i64) -> Page {
        Page {
            id: id.to_string(),
            path: path.to_string(),
            parent: None,
            descendant_count: descendants,
            is_empty: false,
        }
    }

    #[test]
    fn test_fresh_tracker_observes_nothing() {
        let mut t = RevalidationTracker::new(3);
        assert_eq!(t.observe(3, None), None);
        assert_eq!(t.observe(2, None), None);
    }

    #[test]
    fn test_stale_tracker_yields_scope_exactly_once() {
        let mut t = RevalidationTracker::new(0);

        let scope = t.observe(1, Some(&["p1".to_string()]));
        assert_eq!(
            scope,
            Some(RevalidationScope::Items(vec!["p1".to_string()]))
        );

        // Unchanged generation on the next check: no duplicate pass.
        assert_eq!(t.observe(1, Some(&["p1".to_string()])), None);
    }

    #[test]
    fn test_collapsed_notifies_apply_latest_snapshot_only() {
        let mut t = RevalidationTracker::new(0);

        // Generation jumped by 3 while the subscriber was not looking; only
        // the final snapshot counts.
        let scope = t.observe(3, None);
        assert_eq!(scope, Some(RevalidationScope::AllTrees));
        assert_eq!(t.observe(3, None), None);
    }

    #[test]
    fn test_apply_items_scope_invalidates_only_listed_nodes() {
        let tree = PageTreeStore::new(page("root", "/", 4));
        tree.set_children("root", vec![page("p1", "/p1", 1), page("p2", "/p2", 0)]);
        tree.set_children("p1", vec![page("p1c", "/p1/c", 0)]);

        apply_revalidation_scope(
            &tree,
            &RevalidationScope::Items(vec!["p1".to_string(), "ghost".to_string()]),
        );

        assert_eq!(tree.children_of("p1"), None);
        // Root untouched; unknown ids silently skipped.
        assert!(tree.children_of("root").is_some());
    }

    #[test]
    fn test_apply_all_scope_invalidates_root_recursively() {
        let tree = PageTreeStore::new(page("root", "/", 4));
        tree.set_children("root", vec![page("p1", "/p1", 1)]);
        tree.set_children("p1", vec![page("p1c", "/p1/c", 0)]);

        apply_revalidation_scope(&tree, &RevalidationScope::AllTrees);

        assert_eq!(tree.children_of("root"), None);
        assert_eq!(tree.children_of("p1"), None);
    }

    #[test]
    fn test_tracker_with_bus_end_to_end() {
        let bus = TreeChangeBus::new();
        let mut t = RevalidationTracker::new(bus.generation_untracked());

        bus.notify_update_items(vec!["p1".to_string()]);
        let scope = t.observe(
            bus.generation_untracked(),
            bus.last_updated_item_ids_untracked().as_deref(),
        );
        assert_eq!(
            scope,
            Some(RevalidationScope::Items(vec!["p1".to_string()]))
        );

        // No further notify: subscriber stays fresh.
        let scope = t.observe(
            bus.generation_untracked(),
            bus.last_updated_item_ids_untracked().as_deref(),
        );
        assert_eq!(scope, None);
    }
}
