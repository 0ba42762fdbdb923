use crate::api::{ApiError, ApiResult};
use crate::models::ChildrenData;
use futures::future::{LocalBoxFuture, Shared};
use futures::FutureExt;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

type SharedChildrenFuture = Shared<LocalBoxFuture<'static, ApiResult<ChildrenData>>>;

/// The function that actually issues the children request. Injected so the
/// cache is testable without a backend; production wires it to
/// `ApiClient::get_page_children`.
pub(crate) type ChildrenFetcher =
    Rc<dyn Fn(String) -> LocalBoxFuture<'static, ApiResult<ChildrenData>>>;

struct PendingFetch {
    /// Identifies this fetch so its self-removal on settle cannot clobber a
    /// newer entry installed for the same node after an invalidation.
    token: u64,
    future: SharedChildrenFuture,
}

/// Deduplicating per-node children fetcher.
///
/// Coalesces concurrent fetches for the same node id into one shared request;
/// this layer governs in-flight deduplication only, not long-term
/// memoization — resolved children live in the tree store.
#[derive(Clone)]
pub(crate) struct ChildrenFetchCache {
    fetcher: ChildrenFetcher,
    pending: Rc<RefCell<HashMap<String, PendingFetch>>>,
    next_token: Rc<Cell<u64>>,
}

impl ChildrenFetchCache {
    pub fn new(fetcher: ChildrenFetcher) -> Self {
        Self {
            fetcher,
            pending: Rc::new(RefCell::new(HashMap::new())),
            next_token: Rc::new(Cell::new(0)),
        }
    }

    /// Fetch `node_id`'s children, coalescing with any fetch already in
    /// flight for the same id. Every coalesced caller receives the same
    /// resolved value or the same error; once the request settles the entry
    /// is dropped so the next call issues a fresh request.
    ///
    /// The request starts (and registers) before the returned future is first
    /// polled, so two calls made back to back coalesce even if neither has
    /// been awaited yet.
    pub fn fetch_and_cache_children(
        &self,
        node_id: &str,
    ) -> LocalBoxFuture<'static, ApiResult<ChildrenData>> {
        if node_id.trim().is_empty() {
            let err = ApiError::input("node id must not be empty");
            return futures::future::ready(Err(err)).boxed_local();
        }

        self.pending_or_start(node_id).boxed_local()
    }

    fn pending_or_start(&self, node_id: &str) -> SharedChildrenFuture {
        let mut pending = self.pending.borrow_mut();

        if let Some(p) = pending.get(node_id) {
            return p.future.clone();
        }

        let token = self.next_token.get();
        self.next_token.set(token.wrapping_add(1));

        let id = node_id.to_string();
        let inner = (self.fetcher)(id.clone());
        let map = Rc::clone(&self.pending);

        let future = async move {
            let out = inner.await;
            // Success or failure, free the slot so a retry is possible.
            let mut map = map.borrow_mut();
            if map.get(&id).is_some_and(|p| p.token == token) {
                map.remove(&id);
            }
            out
        }
        .boxed_local()
        .shared();

        pending.insert(node_id.to_string(), PendingFetch {
            token,
            future: future.clone(),
        });

        future
    }

    /// Drop pending entries: all of them when `ids` is `None`, otherwise only
    /// the listed ones. Does not cancel the underlying requests; a fetch
    /// removed here simply no longer coalesces with future calls.
    pub fn invalidate_page_tree_children(&self, ids: Option<&[String]>) {
        let mut pending = self.pending.borrow_mut();
        match ids {
            None => pending.clear(),
            Some(ids) => {
                for id in ids {
                    pending.remove(id);
                }
            }
        }
    }

    #[cfg(test)]
    fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }
}
