use crate::models::Page;
use leptos::prelude::*;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Debug)]
pub(crate) struct TreeNode {
    pub page: Page,
    pub expanded: bool,
    pub foldable: bool,

    /// `None` means not loaded yet (or invalidated); the tree widget treats
    /// this as "fetch me on next expansion/render". This marker is the single
    /// source of truth for "does this node need a re-fetch".
    pub children: Option<Vec<String>>,
}

/// Signal-backed page tree. Holds node state (expansion, loaded children)
/// keyed by node identifier; the sync layer orchestrates *when* nodes are
/// invalidated and re-fetched, the store only records it.
#[derive(Clone, Copy)]
pub(crate) struct PageTreeStore {
    nodes: RwSignal<HashMap<String, TreeNode>>,
    root_id: StoredValue<String>,

    /// Node ids to re-expand as they reappear (restored from a previous
    /// session). Consumed opportunistically by `set_children`.
    restore_expanded: StoredValue<Vec<String>>,
}

impl PageTreeStore {
    pub fn new(root: Page) -> Self {
        let root_id = root.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(
            root_id.clone(),
            TreeNode {
                foldable: true,
                expanded: true,
                children: None,
                page: root,
            },
        );

        Self {
            nodes: RwSignal::new(nodes),
            root_id: StoredValue::new(root_id),
            restore_expanded: StoredValue::new(Vec::new()),
        }
    }

    pub fn set_restored_expansion(&self, ids: Vec<String>) {
        self.restore_expanded.set_value(ids);
    }

    pub fn root_id(&self) -> String {
        self.root_id.get_value()
    }

    /// Lookup an item instance. `None` when the node was never loaded or has
    /// been unmounted; callers are expected to skip silently in that case.
    pub fn item_instance(&self, id: &str) -> Option<ItemInstance> {
        if self.nodes.with_untracked(|n| n.contains_key(id)) {
            Some(ItemInstance {
                nodes: self.nodes,
                id: id.to_string(),
            })
        } else {
            None
        }
    }

    /// Install freshly fetched children under `parent_id`.
    ///
    /// Existing child nodes keep their expansion state; nodes no longer
    /// reported by the server drop out of the parent's child list and are
    /// pruned from the node map along with their loaded subtrees. Pruned
    /// expanded nodes rejoin the restore list, so a node that merely became
    /// unreachable during a refresh reopens once it is fetched again.
    pub fn set_children(&self, parent_id: &str, children: Vec<Page>) {
        let restore = self.restore_expanded.get_value();
        let root_id = self.root_id.get_value();

        let mut revive: Vec<String> = Vec::new();

        self.nodes.update(|nodes| {
            if !nodes.contains_key(parent_id) {
                return;
            }

            let mut ids = Vec::with_capacity(children.len());
            for page in children {
                let id = page.id.clone();
                let foldable = page.descendant_count > 0;

                match nodes.get_mut(&id) {
                    Some(existing) => {
                        existing.page = page;
                        existing.foldable = foldable || existing.children.is_some();
                    }
                    None => {
                        let expanded = restore.iter().any(|r| r == &id);
                        nodes.insert(
                            id.clone(),
                            TreeNode {
                                page,
                                expanded,
                                foldable,
                                children: None,
                            },
                        );
                    }
                }
                ids.push(id);
            }

            if let Some(parent) = nodes.get_mut(parent_id) {
                parent.children = Some(ids);
                parent.foldable = true;
            }

            let mut reachable: HashSet<String> = HashSet::new();
            let mut queue = vec![root_id];
            while let Some(id) = queue.pop() {
                if !reachable.insert(id.clone()) {
                    continue;
                }
                if let Some(children) = nodes.get(&id).and_then(|n| n.children.clone()) {
                    queue.extend(children);
                }
            }

            let ghost_ids: Vec<String> = nodes
                .keys()
                .filter(|id| !reachable.contains(*id))
                .cloned()
                .collect();
            for id in ghost_ids {
                if let Some(node) = nodes.remove(&id) {
                    if node.expanded {
                        revive.push(id);
                    }
                }
            }
        });

        if !revive.is_empty() {
            self.restore_expanded.update_value(|r| {
                for id in revive {
                    if !r.iter().any(|x| x == &id) {
                        r.push(id);
                    }
                }
            });
        }
    }

    /// Recompute which nodes are foldable from what is currently known.
    pub fn rebuild_tree(&self) {
        self.nodes.update(|nodes| {
            for node in nodes.values_mut() {
                node.foldable = node.page.descendant_count > 0
                    || node.children.as_ref().is_some_and(|c| !c.is_empty());
            }
        });
    }

    /// Expanded but children unknown: the widget should fetch.
    pub fn needs_fetch(&self, id: &str) -> bool {
        self.nodes
            .with_untracked(|n| n.get(id).is_some_and(|node| node.expanded && node.children.is_none()))
    }

    /// Tracked read for rendering one node.
    pub fn node(&self, id: &str) -> Option<TreeNode> {
        self.nodes.with(|n| n.get(id).cloned())
    }

    /// Tracked read of a node's loaded children ids.
    pub fn children_of(&self, id: &str) -> Option<Vec<String>> {
        self.nodes.with(|n| n.get(id).and_then(|node| node.children.clone()))
    }

    /// Expanded nodes whose children are unknown, i.e. everything a mounted
    /// tree should be fetching right now.
    pub fn stale_expanded_ids(&self) -> Vec<String> {
        self.nodes.with_untracked(|n| {
            let mut ids: Vec<String> = n
                .iter()
                .filter(|(_, node)| node.expanded && node.children.is_none())
                .map(|(id, _)| id.clone())
                .collect();
            ids.sort();
            ids
        })
    }

    pub fn expanded_ids(&self) -> Vec<String> {
        self.nodes.with_untracked(|n| {
            let mut ids: Vec<String> = n
                .iter()
                .filter(|(_, node)| node.expanded)
                .map(|(id, _)| id.clone())
                .collect();
            ids.sort();
            ids
        })
    }
}

/// Handle to one node, exposing the operations the sync layer needs.
#[derive(Clone)]
pub(crate) struct ItemInstance {
    nodes: RwSignal<HashMap<String, TreeNode>>,
    id: String,
}

impl ItemInstance {
    pub fn is_expanded(&self) -> bool {
        self.nodes
            .with_untracked(|n| n.get(&self.id).is_some_and(|node| node.expanded))
    }

    pub fn expand(&self) {
        self.nodes.update(|n| {
            if let Some(node) = n.get_mut(&self.id) {
                node.expanded = true;
            }
        });
    }

    pub fn collapse(&self) {
        self.nodes.update(|n| {
            if let Some(node) = n.get_mut(&self.id) {
                node.expanded = false;
            }
        });
    }

    /// Mark this node's children unknown so the widget re-fetches them.
    /// With `recursive`, every loaded descendant is marked too.
    pub fn invalidate_children(&self, recursive: bool) {
        self.nodes.update(|nodes| {
            let mut targets = vec![self.id.clone()];

            if recursive {
                let mut queue = vec![self.id.clone()];
                while let Some(id) = queue.pop() {
                    if let Some(children) = nodes.get(&id).and_then(|n| n.children.clone()) {
                        for child in children {
                            targets.push(child.clone());
                            queue.push(child);
                        }
                    }
                }
            }

            for id in targets {
                if let Some(node) = nodes.get_mut(&id) {
                    node.children = None;
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(id: &str, path: &str, descendants: i64) -> Page {
        Page {
            id: id.to_string(),
            path: path.to_string(),
            parent: None,
            descendant_count: descendants,
            is_empty: false,
        }
    }

    fn store_with_two_levels() -> PageTreeStore {
        let store = PageTreeStore::new(page("root", "/", 10));
        store.set_children(
            "root",
            vec![page("a", "/a", 2), page("b", "/b", 0)],
        );
        store.set_children("a", vec![page("a1", "/a/a1", 0)]);
        store
    }

    #[test]
    fn test_set_children_links_parent_and_marks_foldable() {
        let store = store_with_two_levels();

        assert_eq!(
            store.children_of("root"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        let a = store.node("a").expect("a should exist");
        assert!(a.foldable);
        let b = store.node("b").expect("b should exist");
        assert!(!b.foldable);
    }

    #[test]
    fn test_invalidate_children_non_recursive() {
        let store = store_with_two_levels();

        store
            .item_instance("a")
            .expect("a should exist")
            .invalidate_children(false);

        assert_eq!(store.children_of("a"), None);
        // Other nodes untouched.
        assert!(store.children_of("root").is_some());
    }

    #[test]
    fn test_invalidate_children_recursive_from_root() {
        let store = store_with_two_levels();

        store
            .item_instance("root")
            .expect("root should exist")
            .invalidate_children(true);

        assert_eq!(store.children_of("root"), None);
        assert_eq!(store.children_of("a"), None);
        // Node state (e.g. expansion) survives; only child lists reset.
        assert!(store.node("a").is_some());
    }

    #[test]
    fn test_needs_fetch_tracks_expansion_and_invalidation() {
        let store = store_with_two_levels();
        let a = store.item_instance("a").expect("a should exist");

        // Loaded and collapsed: no fetch needed.
        assert!(!store.needs_fetch("a"));

        a.expand();
        assert!(!store.needs_fetch("a"));

        a.invalidate_children(false);
        assert!(store.needs_fetch("a"));
    }

    #[test]
    fn test_set_children_preserves_expansion_of_existing_nodes() {
        let store = store_with_two_levels();
        store.item_instance("a").expect("a should exist").expand();

        // Re-install the same children, as a revalidation re-fetch would.
        store.set_children(
            "root",
            vec![page("a", "/a", 2), page("c", "/c", 0)],
        );

        let a = store.node("a").expect("a should exist");
        assert!(a.expanded);
        assert_eq!(
            store.children_of("root"),
            Some(vec!["a".to_string(), "c".to_string()])
        );
    }

    #[test]
    fn test_item_instance_missing_id_is_none() {
        let store = store_with_two_levels();
        assert!(store.item_instance("ghost").is_none());
    }

    #[test]
    fn test_stale_expanded_ids_after_recursive_invalidation() {
        let store = store_with_two_levels();
        store.item_instance("a").expect("a should exist").expand();

        store
            .item_instance("root")
            .expect("root should exist")
            .invalidate_children(true);

        // Root and `a` are expanded with unknown children; collapsed nodes
        // are not re-fetched eagerly.
        assert_eq!(
            store.stale_expanded_ids(),
            vec!["a".to_string(), "root".to_string()]
        );
    }

    #[test]
    fn test_restored_expansion_applies_to_new_nodes() {
        let store = PageTreeStore::new(page("root", "/", 3));
        store.set_restored_expansion(vec!["a".to_string()]);

        store.set_children("root", vec![page("a", "/a", 1), page("b", "/b", 0)]);

        assert!(store.node("a").expect("a should exist").expanded);
        assert!(!store.node("b").expect("b should exist").expanded);
        // The restored-but-unloaded node now needs a fetch.
        assert_eq!(store.stale_expanded_ids(), vec!["a".to_string()]);
    }

    #[test]
    fn test_dropped_children_are_pruned_recursively() {
        let store = store_with_two_levels();

        // Server no longer reports `a`; its loaded subtree goes with it.
        store.set_children("root", vec![page("b", "/b", 0)]);

        assert!(store.node("a").is_none());
        assert!(store.node("a1").is_none());
        assert_eq!(store.children_of("root"), Some(vec!["b".to_string()]));
    }

    #[test]
    fn test_pruned_expanded_node_reopens_when_fetched_again() {
        let store = store_with_two_levels();
        store.item_instance("a").expect("a should exist").expand();
        store.item_instance("a1").expect("a1 should exist").expand();

        // Whole-tree refresh: loaded lists reset, then the root re-fetch
        // lands before `a`'s does.
        store
            .item_instance("root")
            .expect("root should exist")
            .invalidate_children(true);
        store.set_children("root", vec![page("a", "/a", 2)]);

        // `a` survives with its expansion; `a1` is unreachable and no longer
        // haunts the expanded set.
        assert!(store.node("a").expect("a should exist").expanded);
        assert!(store.node("a1").is_none());
        assert!(!store.expanded_ids().contains(&"a1".to_string()));

        // The server still has it: the next fetch brings it back open.
        store.set_children("a", vec![page("a1", "/a/a1", 0)]);
        assert!(store.node("a1").expect("a1 should exist").expanded);
    }

    #[test]
    fn test_rebuild_tree_recomputes_foldability() {
        let store = store_with_two_levels();

        // b gains no descendants; a1 has loaded no children.
        store.rebuild_tree();
        assert!(!store.node("b").expect("b should exist").foldable);
        assert!(store.node("a").expect("a should exist").foldable);
        assert!(!store.node("a1").expect("a1 should exist").foldable);
    }
}
