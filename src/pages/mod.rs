use crate::api::{ApiErrorKind, ApiResult, CreatePageRequest, DeletePageRequest, RenamePageRequest};
use crate::cache::ChildrenFetchCache;
use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Input, Spinner,
};
use crate::models::{ChildrenData, Page};
use crate::state::AppContext;
use crate::storage::{load_expanded_nodes, save_expanded_nodes, save_sidebar_collapsed};
use crate::tree::{
    use_auto_expand_on_create, use_tree_features, use_tree_revalidation, PageTreeStore,
    TreeFeature, TreeFeaturesOptions,
};
use crate::util::normalize_page_path;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// The wiki root is addressed by its path; every other node by page id.
fn root_page() -> Page {
    Page {
        id: "/".to_string(),
        path: "/".to_string(),
        parent: None,
        descendant_count: 1,
        is_empty: false,
    }
}

/// Fetch children for every stale expanded node in one pass. Concurrent
/// triggers for the same node coalesce in the cache, so revalidation and
/// manual expansion can race safely. The requests register eagerly (before
/// the awaiting task is spawned) for the same reason.
fn spawn_stale_fetches(
    tree: PageTreeStore,
    cache: ChildrenFetchCache,
    fetch_error: RwSignal<Option<String>>,
    sync_tick: RwSignal<u64>,
) {
    let mut pending = Vec::new();
    for node_id in tree.stale_expanded_ids() {
        let fut = cache.fetch_and_cache_children(&node_id);
        pending.push(async move { (node_id, fut.await) });
    }
    if pending.is_empty() {
        return;
    }

    spawn_local(async move {
        let results = futures::future::join_all(pending).await;
        apply_fetch_results(tree, results, fetch_error, sync_tick);
    });
}

/// Install the outcome of one fetch pass. The error banner clears only when
/// the whole pass succeeded; one node's success must not hide a sibling's
/// failure. Installed children bump `sync_tick`, which re-runs the loader
/// effect until the visible tree is fully loaded (restored-expanded children
/// may need fetches of their own).
fn apply_fetch_results(
    tree: PageTreeStore,
    results: Vec<(String, ApiResult<ChildrenData>)>,
    fetch_error: RwSignal<Option<String>>,
    sync_tick: RwSignal<u64>,
) {
    let mut any_failed = false;
    let mut any_loaded = false;

    for (node_id, result) in results {
        match result {
            Ok(data) => {
                tree.set_children(&node_id, data.children);
                any_loaded = true;
            }
            Err(e) => {
                any_failed = true;
                let msg = if e.kind == ApiErrorKind::Unauthorized {
                    "Session expired, please sign in again".to_string()
                } else {
                    e.to_string()
                };
                fetch_error.set(Some(msg));
            }
        }
    }

    if !any_failed {
        fetch_error.set(None);
    }
    if any_loaded {
        sync_tick.update(|n| *n += 1);
    }
}

/// Parent id to notify after a mutation on `page_id`, when this tree can
/// target it. Top-level pages report the backend root's persisted id as
/// their parent, which no tree keyed by the synthetic `/` root contains;
/// those fall back to a whole-tree notify (`None`).
fn mutation_notify_parent(tree: PageTreeStore, page_id: &str) -> Option<String> {
    let parent = tree.node(page_id)?.page.parent?;
    if tree.item_instance(&parent).is_some() {
        Some(parent)
    } else {
        None
    }
}

fn toggle_node(tree: PageTreeStore, sync_tick: RwSignal<u64>, id: &str) {
    let Some(item) = tree.item_instance(id) else {
        return;
    };

    if item.is_expanded() {
        item.collapse();
    } else {
        item.expand();
        if tree.needs_fetch(id) {
            sync_tick.update(|n| *n += 1);
        }
    }

    save_expanded_nodes(&tree.expanded_ids());
}

/// Browse tree with renaming enabled.
#[component]
pub fn PageTreeSidebar() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let bus = app_state.0.tree_bus;
    let api_client = app_state.0.api_client;
    let cache = app_state.0.children_cache;
    let creating_parent_id = app_state.0.creating_parent_id;

    let tree = PageTreeStore::new(root_page());
    tree.set_restored_expansion(load_expanded_nodes());

    let fetch_error: RwSignal<Option<String>> = RwSignal::new(None);
    let sync_tick: RwSignal<u64> = RwSignal::new(0);
    let selected_id: RwSignal<Option<String>> = RwSignal::new(None);
    let renaming_id: RwSignal<Option<String>> = RwSignal::new(None);
    let rename_value: RwSignal<String> = RwSignal::new(String::new());

    let features = use_tree_features(Signal::derive(TreeFeaturesOptions::default));

    // Loader: runs on mount (the root starts expanded with unknown children)
    // and again whenever someone requests a sync pass.
    Effect::new(move |_| {
        sync_tick.get();
        spawn_stale_fetches(tree, cache.get_value(), fetch_error, sync_tick);
    });

    // Stale nodes appear whenever the bus invalidates part of this tree;
    // re-fetch them so the view converges on server truth.
    use_tree_revalidation(
        bus,
        tree,
        Some(Callback::new(move |_| {
            sync_tick.update(|n| *n += 1);
        })),
    );

    // "Create child page" flows expand and invalidate the parent before the
    // server round-trip completes, so the placeholder is visible immediately.
    use_auto_expand_on_create(
        tree,
        cache.get_value(),
        creating_parent_id,
        Some(Callback::new(move |_parent_id: String| {
            sync_tick.update(|n| *n += 1);
        })),
    );

    let start_rename = move |id: String, current_name: String| {
        if !features.get_untracked().contains(&TreeFeature::Renaming) {
            return;
        }
        rename_value.set(current_name);
        renaming_id.set(Some(id));
    };

    let commit_rename = move || {
        let Some(id) = renaming_id.get_untracked() else {
            return;
        };
        let new_name = rename_value.get_untracked();
        if new_name.trim().is_empty() {
            renaming_id.set(None);
            return;
        }

        let Some(node) = tree.node(&id) else {
            renaming_id.set(None);
            return;
        };
        let parent_path = node
            .page
            .path
            .rsplit_once('/')
            .map(|(head, _)| head.to_string())
            .unwrap_or_default();
        let new_path = normalize_page_path(&format!("{parent_path}/{new_name}"));
        let parent_id = mutation_notify_parent(tree, &id);

        let client = api_client.get_untracked();
        spawn_local(async move {
            let req = RenamePageRequest {
                page_id: id,
                new_page_path: new_path,
            };
            match client.rename_page(req).await {
                Ok(_) => {
                    renaming_id.set(None);
                    // Mutation contract: notify after server success so every
                    // mounted tree revalidates the affected scope.
                    match parent_id {
                        Some(pid) => bus.notify_update_items(vec![pid]),
                        None => bus.notify_update_all_trees(),
                    }
                }
                Err(e) => {
                    fetch_error.set(Some(e.to_string()));
                    renaming_id.set(None);
                }
            }
        });
    };

    let create_child = move |parent_id: String| {
        let Some(parent) = tree.node(&parent_id) else {
            return;
        };

        // Trigger auto-expand first; the parent opens before the server
        // responds.
        creating_parent_id.set(Some(parent_id.clone()));

        let new_path = normalize_page_path(&format!("{}/untitled", parent.page.path));
        let client = api_client.get_untracked();
        spawn_local(async move {
            let req = CreatePageRequest {
                path: new_path,
                body: None,
            };
            match client.create_page(req).await {
                Ok(resp) => {
                    selected_id.set(Some(resp.page.id));
                    bus.notify_update_items(vec![parent_id]);
                }
                Err(e) => {
                    fetch_error.set(Some(e.to_string()));
                }
            }
            creating_parent_id.set(None);
        });
    };

    let delete_page = move |id: String| {
        let parent_id = mutation_notify_parent(tree, &id);
        let client = api_client.get_untracked();
        spawn_local(async move {
            let req = DeletePageRequest { page_id: id };
            match client.delete_page(req).await {
                Ok(_) => match parent_id {
                    Some(pid) => bus.notify_update_items(vec![pid]),
                    None => bus.notify_update_all_trees(),
                },
                Err(e) => {
                    fetch_error.set(Some(e.to_string()));
                }
            }
        });
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if !features.get_untracked().contains(&TreeFeature::Hotkeys) {
            return;
        }
        let Some(id) = selected_id.get_untracked() else {
            return;
        };

        match ev.key().as_str() {
            "ArrowRight" => {
                ev.prevent_default();
                let collapsed = tree
                    .item_instance(&id)
                    .is_some_and(|item| !item.is_expanded());
                if collapsed {
                    toggle_node(tree, sync_tick, &id);
                }
            }
            "ArrowLeft" => {
                ev.prevent_default();
                let expanded = tree
                    .item_instance(&id)
                    .is_some_and(|item| item.is_expanded());
                if expanded {
                    toggle_node(tree, sync_tick, &id);
                }
            }
            "F2" => {
                ev.prevent_default();
                if let Some(node) = tree.node(&id) {
                    start_rename(id, node.page.name().to_string());
                }
            }
            _ => {}
        }
    };

    let root_id = tree.root_id();

    view! {
        <div class="flex h-full w-64 flex-col gap-2 border-r px-2 py-3" tabindex="0" on:keydown=on_keydown>
            <div class="px-1 text-xs font-medium text-muted-foreground">"Pages"</div>

            <Show when=move || fetch_error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    fetch_error.get().map(|e| view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                        </Alert>
                    })
                }}
            </Show>

            <div class="flex-1 overflow-auto">
                <SidebarNodeRow
                    id=root_id
                    depth=0
                    tree=tree
                    sync_tick=sync_tick
                    selected_id=selected_id
                    renaming_id=renaming_id
                    rename_value=rename_value
                    on_commit_rename=Callback::new(move |_| commit_rename())
                    on_start_rename=Callback::new(move |(id, name)| start_rename(id, name))
                    on_create_child=Callback::new(create_child)
                    on_delete=Callback::new(delete_page)
                />
            </div>
        </div>
    }
}

#[component]
fn SidebarNodeRow(
    id: String,
    depth: usize,
    tree: PageTreeStore,
    sync_tick: RwSignal<u64>,
    selected_id: RwSignal<Option<String>>,
    renaming_id: RwSignal<Option<String>>,
    rename_value: RwSignal<String>,
    on_commit_rename: Callback<()>,
    on_start_rename: Callback<(String, String)>,
    on_create_child: Callback<String>,
    on_delete: Callback<String>,
) -> impl IntoView {
    let id_sv = StoredValue::new(id);

    let on_toggle = Callback::new(move |_: ()| {
        let id = id_sv.get_value();
        toggle_node(tree, sync_tick, &id);
    });

    let indent_px = (depth * 14) as i32;

    view! {
        <div>
            {move || {
                let id = id_sv.get_value();
                let Some(node) = tree.node(&id) else {
                    return ().into_view().into_any();
                };

                let is_selected = selected_id.get().as_deref() == Some(id.as_str());
                let is_renaming = renaming_id.get().as_deref() == Some(id.as_str());
                let is_loading = node.expanded && node.children.is_none();

                let bullet = if node.expanded { "▾" } else { "▸" };
                let name = node.page.name().to_string();

                let id_for_select = id.clone();
                let id_for_rename = id.clone();
                let name_for_rename = name.clone();
                let id_for_create = id.clone();
                let id_for_delete = id.clone();

                let on_submit_rename = move |ev: web_sys::SubmitEvent| {
                    ev.prevent_default();
                    on_commit_rename.run(());
                };

                let children_view = if node.expanded {
                    let kid_ids_sv =
                        StoredValue::new(tree.children_of(&id).unwrap_or_default());

                    view! {
                        <For
                            each=move || kid_ids_sv.get_value()
                            key=|id| id.clone()
                            children=move |child_id| {
                                view! {
                                    <SidebarNodeRow
                                        id=child_id
                                        depth=depth + 1
                                        tree=tree
                                        sync_tick=sync_tick
                                        selected_id=selected_id
                                        renaming_id=renaming_id
                                        rename_value=rename_value
                                        on_commit_rename=on_commit_rename
                                        on_start_rename=on_start_rename
                                        on_create_child=on_create_child
                                        on_delete=on_delete
                                    />
                                }
                            }
                        />
                    }
                    .into_any()
                } else {
                    ().into_view().into_any()
                };

                view! {
                    <div>
                        <div
                            class=if is_selected {
                                "group flex items-center gap-1 rounded-md bg-accent px-1 py-0.5"
                            } else {
                                "group flex items-center gap-1 rounded-md px-1 py-0.5 hover:bg-accent/50"
                            }
                            style=format!("padding-left: {}px", indent_px)
                            on:click=move |_| selected_id.set(Some(id_for_select.clone()))
                        >
                            {if node.foldable {
                                view! {
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Icon
                                        on:click=move |ev: web_sys::MouseEvent| {
                                            ev.stop_propagation();
                                            on_toggle.run(());
                                        }
                                    >
                                        {bullet}
                                    </Button>
                                }
                                .into_any()
                            } else {
                                view! { <span class="w-7"></span> }.into_any()
                            }}

                            {if is_loading {
                                view! { <Spinner /> }.into_any()
                            } else {
                                ().into_view().into_any()
                            }}

                            {if is_renaming {
                                view! {
                                    <form class="flex-1" on:submit=on_submit_rename>
                                        <Input class="h-7" bind_value=rename_value autofocus=true />
                                    </form>
                                }
                                .into_any()
                            } else {
                                view! {
                                    <span
                                        class=if node.page.is_empty {
                                            "flex-1 truncate text-sm italic text-muted-foreground"
                                        } else {
                                            "flex-1 truncate text-sm"
                                        }
                                        on:dblclick=move |_| {
                                            on_start_rename
                                                .run((id_for_rename.clone(), name_for_rename.clone()));
                                        }
                                    >
                                        {name}
                                    </span>
                                    <span class="hidden gap-0.5 group-hover:flex">
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            attr:title="New child page"
                                            on:click=move |ev: web_sys::MouseEvent| {
                                                ev.stop_propagation();
                                                on_create_child.run(id_for_create.clone());
                                            }
                                        >
                                            "+"
                                        </Button>
                                        <Button
                                            variant=ButtonVariant::Ghost
                                            size=ButtonSize::Icon
                                            attr:title="Delete page"
                                            on:click=move |ev: web_sys::MouseEvent| {
                                                ev.stop_propagation();
                                                on_delete.run(id_for_delete.clone());
                                            }
                                        >
                                            "×"
                                        </Button>
                                    </span>
                                }
                                .into_any()
                            }}
                        </div>

                        {children_view}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

/// Multi-select picker tree: checkboxes enabled, renaming disabled.
/// Checked state is owned by this component instance, not process-wide.
#[component]
pub fn PageTreePicker(#[prop(into)] on_confirm: Callback<Vec<String>>) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let bus = app_state.0.tree_bus;
    let cache = app_state.0.children_cache;

    let tree = PageTreeStore::new(root_page());
    let fetch_error: RwSignal<Option<String>> = RwSignal::new(None);
    let sync_tick: RwSignal<u64> = RwSignal::new(0);
    let checked_items: RwSignal<Vec<String>> = RwSignal::new(Vec::new());

    let features = use_tree_features(Signal::derive(|| TreeFeaturesOptions {
        enable_renaming: false,
        enable_checkboxes: true,
    }));

    Effect::new(move |_| {
        sync_tick.get();
        spawn_stale_fetches(tree, cache.get_value(), fetch_error, sync_tick);
    });

    use_tree_revalidation(
        bus,
        tree,
        Some(Callback::new(move |_| {
            sync_tick.update(|n| *n += 1);
        })),
    );

    let toggle_checked = Callback::new(move |id: String| {
        checked_items.update(|items| {
            if let Some(pos) = items.iter().position(|x| x == &id) {
                items.remove(pos);
            } else {
                items.push(id);
            }
        });
    });

    let root_id = tree.root_id();
    let show_checkboxes = move || features.get().contains(&TreeFeature::Checkboxes);

    view! {
        <div class="flex w-72 flex-col gap-2 rounded-lg border p-3">
            <div class="text-sm font-medium">"Select pages"</div>

            <Show when=move || fetch_error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    fetch_error.get().map(|e| view! {
                        <Alert class="border-destructive/30">
                            <AlertDescription class="text-destructive">{e}</AlertDescription>
                        </Alert>
                    })
                }}
            </Show>

            <div class="max-h-80 overflow-auto">
                <Show when=show_checkboxes fallback=|| ().into_view()>
                    <PickerNodeRow
                        id=root_id.clone()
                        depth=0
                        tree=tree
                        sync_tick=sync_tick
                        checked_items=checked_items
                        on_toggle_checked=toggle_checked
                    />
                </Show>
            </div>

            <div class="flex items-center justify-between">
                <span class="text-xs text-muted-foreground">
                    {move || format!("{} selected", checked_items.get().len())}
                </span>
                <Button size=ButtonSize::Sm on:click=move |_| on_confirm.run(checked_items.get_untracked())>
                    "Confirm"
                </Button>
            </div>
        </div>
    }
}

#[component]
fn PickerNodeRow(
    id: String,
    depth: usize,
    tree: PageTreeStore,
    sync_tick: RwSignal<u64>,
    checked_items: RwSignal<Vec<String>>,
    on_toggle_checked: Callback<String>,
) -> impl IntoView {
    let id_sv = StoredValue::new(id);

    let on_toggle = Callback::new(move |_: ()| {
        let id = id_sv.get_value();
        toggle_node(tree, sync_tick, &id);
    });

    let indent_px = (depth * 16) as i32;

    view! {
        <div>
            {move || {
                let id = id_sv.get_value();
                let Some(node) = tree.node(&id) else {
                    return ().into_view().into_any();
                };

                let is_checked = checked_items.get().iter().any(|x| x == &id);
                let bullet = if node.expanded { "▾" } else { "▸" };
                let name = node.page.name().to_string();
                let id_for_check = id.clone();

                let children_view = if node.expanded {
                    let kid_ids_sv =
                        StoredValue::new(tree.children_of(&id).unwrap_or_default());

                    view! {
                        <For
                            each=move || kid_ids_sv.get_value()
                            key=|id| id.clone()
                            children=move |child_id| {
                                view! {
                                    <PickerNodeRow
                                        id=child_id
                                        depth=depth + 1
                                        tree=tree
                                        sync_tick=sync_tick
                                        checked_items=checked_items
                                        on_toggle_checked=on_toggle_checked
                                    />
                                }
                            }
                        />
                    }
                    .into_any()
                } else {
                    ().into_view().into_any()
                };

                view! {
                    <div>
                        <div
                            class="flex items-center gap-1 rounded-md px-1 py-0.5 hover:bg-accent/50"
                            style=format!("padding-left: {}px", indent_px)
                        >
                            {if node.foldable {
                                view! {
                                    <Button
                                        variant=ButtonVariant::Ghost
                                        size=ButtonSize::Icon
                                        on:click=move |_| on_toggle.run(())
                                    >
                                        {bullet}
                                    </Button>
                                }
                                .into_any()
                            } else {
                                view! { <span class="w-7"></span> }.into_any()
                            }}

                            <input
                                type="checkbox"
                                class="size-4 accent-primary"
                                prop:checked=is_checked
                                on:change=move |_| on_toggle_checked.run(id_for_check.clone())
                            />

                            <span class="flex-1 truncate text-sm">{name}</span>
                        </div>

                        {children_view}
                    </div>
                }
                .into_any()
            }}
        </div>
    }
}

/// Home layout: browse sidebar plus a bulk-action panel built on the picker.
#[component]
pub fn WikiHomePage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let bus = app_state.0.tree_bus;
    let api_client = app_state.0.api_client;
    let sidebar_collapsed = app_state.0.sidebar_collapsed;

    let picker_open: RwSignal<bool> = RwSignal::new(false);
    let bulk_error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_toggle_sidebar = move |_| {
        sidebar_collapsed.update(|v| *v = !*v);
        save_sidebar_collapsed(sidebar_collapsed.get_untracked());
    };

    let on_bulk_delete = Callback::new(move |ids: Vec<String>| {
        picker_open.set(false);
        if ids.is_empty() {
            return;
        }

        let client = api_client.get_untracked();
        spawn_local(async move {
            let mut any_failed = false;
            for id in &ids {
                let req = DeletePageRequest { page_id: id.clone() };
                if let Err(e) = client.delete_page(req).await {
                    any_failed = true;
                    bulk_error.set(Some(e.to_string()));
                }
            }
            if !any_failed {
                bulk_error.set(None);
            }

            // A bulk delete can remove whole subtrees; parents are not
            // tracked per item here, so mark everything stale.
            bus.notify_update_all_trees();
        });
    });

    view! {
        <div class="flex min-h-screen bg-background">
            <Show when=move || !sidebar_collapsed.get() fallback=|| ().into_view()>
                <PageTreeSidebar />
            </Show>

            <div class="flex-1 px-6 py-4">
                <div class="mb-3 flex items-center gap-2">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title="Toggle sidebar"
                        on:click=on_toggle_sidebar
                    >
                        "≡"
                    </Button>
                    <h1 class="flex-1 text-lg font-semibold">"Wiki"</h1>
                    <Button
                        variant=ButtonVariant::Outline
                        size=ButtonSize::Sm
                        on:click=move |_| picker_open.update(|v| *v = !*v)
                    >
                        {move || if picker_open.get() { "Close picker" } else { "Bulk actions" }}
                    </Button>
                </div>

                <Show when=move || bulk_error.get().is_some() fallback=|| ().into_view()>
                    {move || {
                        bulk_error.get().map(|e| view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive">{e}</AlertDescription>
                            </Alert>
                        })
                    }}
                </Show>

                <Show when=move || picker_open.get() fallback=|| ().into_view()>
                    <PageTreePicker on_confirm=on_bulk_delete />
                </Show>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn page(id: &str, path: &str, parent: Option<&str>, descendants: i64) -> Page {
        Page {
            id: id.to_string(),
            path: path.to_string(),
            parent: parent.map(str::to_string),
            descendant_count: descendants,
            is_empty: false,
        }
    }

    #[test]
    fn test_top_level_mutation_scope_falls_back_to_whole_tree() {
        let tree = PageTreeStore::new(root_page());
        // Top-level pages carry the backend root's persisted id as parent,
        // which is not a node in a tree rooted at the synthetic "/".
        tree.set_children(
            "/",
            vec![page("p1", "/alpha", Some("64b0f00d1a2b3c"), 0)],
        );

        assert_eq!(mutation_notify_parent(tree, "p1"), None);
    }

    #[test]
    fn test_nested_mutation_scope_targets_known_parent() {
        let tree = PageTreeStore::new(root_page());
        tree.set_children("/", vec![page("p1", "/alpha", Some("64b0f00d1a2b3c"), 1)]);
        tree.set_children("p1", vec![page("p2", "/alpha/beta", Some("p1"), 0)]);

        assert_eq!(mutation_notify_parent(tree, "p2"), Some("p1".to_string()));
        // Unknown pages cannot be targeted either.
        assert_eq!(mutation_notify_parent(tree, "ghost"), None);
    }

    #[test]
    fn test_failed_sibling_keeps_error_visible_in_same_pass() {
        let tree = PageTreeStore::new(root_page());
        tree.set_children(
            "/",
            vec![page("p1", "/alpha", None, 1), page("p2", "/beta", None, 1)],
        );
        let fetch_error: RwSignal<Option<String>> = RwSignal::new(None);
        let sync_tick: RwSignal<u64> = RwSignal::new(0);

        apply_fetch_results(
            tree,
            vec![
                ("p1".to_string(), Err(ApiError::input("boom"))),
                ("p2".to_string(), Ok(ChildrenData { children: vec![] })),
            ],
            fetch_error,
            sync_tick,
        );

        assert_eq!(fetch_error.get_untracked(), Some("boom".to_string()));
        // The successful node still advances the loader.
        assert_eq!(sync_tick.get_untracked(), 1);
    }

    #[test]
    fn test_clean_pass_clears_previous_error() {
        let tree = PageTreeStore::new(root_page());
        tree.set_children("/", vec![page("p1", "/alpha", None, 1)]);
        let fetch_error: RwSignal<Option<String>> = RwSignal::new(Some("old failure".to_string()));
        let sync_tick: RwSignal<u64> = RwSignal::new(0);

        apply_fetch_results(
            tree,
            vec![("p1".to_string(), Ok(ChildrenData { children: vec![] }))],
            fetch_error,
            sync_tick,
        );

        assert_eq!(fetch_error.get_untracked(), None);
        assert_eq!(sync_tick.get_untracked(), 1);
    }
}
