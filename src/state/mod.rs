pub(crate) mod tree_bus;

pub(crate) use tree_bus::TreeChangeBus;

use crate::api::ApiClient;
use crate::cache::{ChildrenFetchCache, ChildrenFetcher};
use crate::storage::load_sidebar_collapsed;
use futures::FutureExt;
use leptos::prelude::*;
use std::rc::Rc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Remote update signal shared by every mounted tree.
    pub tree_bus: TreeChangeBus,

    /// Deduplicating children fetcher, wired to the current api client.
    ///
    /// The cache is `Rc`-based, so it lives in arena-local storage: the
    /// handle is shareable through context, the value itself is only touched
    /// on the UI thread (effects and `spawn_local`).
    pub children_cache: StoredValue<ChildrenFetchCache, LocalStorage>,

    /// Set by "create child page" flows; drives auto-expand (see
    /// `tree::auto_expand`). Cleared once the creation flow finishes.
    pub creating_parent_id: RwSignal<Option<String>>,

    /// Global UI state.
    pub sidebar_collapsed: RwSignal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let api_client = RwSignal::new(ApiClient::load_from_storage());

        let fetcher: ChildrenFetcher = Rc::new(move |id: String| {
            // Snapshot the client at request time so a token refresh mid-session
            // applies to subsequent fetches.
            let client = api_client.get_untracked();
            async move { client.get_page_children(&id).await }.boxed_local()
        });

        Self {
            api_client,
            tree_bus: TreeChangeBus::new(),
            children_cache: StoredValue::new_local(ChildrenFetchCache::new(fetcher)),
            creating_parent_id: RwSignal::new(None),
            sidebar_collapsed: RwSignal::new(load_sidebar_collapsed()),
        }
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

#[cfg(test)]
mod tests {
    use super::*;

    // `provide_context`/`expect_context` require this bound; the cache handle
    // must stay shareable even though the cache itself is Rc-based.
    #[test]
    fn test_app_context_satisfies_context_api_bounds() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState>();
        assert_send_sync::<AppContext>();
    }
}
