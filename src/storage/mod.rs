use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "wikitree_token";
pub(crate) const SIDEBAR_COLLAPSED_KEY: &str = "wikitree_sidebar_collapsed";

/// Expanded node ids are persisted so a reload restores the tree shape.
pub(crate) const EXPANDED_NODES_KEY: &str = "wikitree_expanded_nodes";

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(key: &str) -> Option<T> {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
    let json = storage.get_item(key).ok().flatten()?;
    serde_json::from_str(&json).ok()
}

pub(crate) fn save_json_to_storage<T: Serialize>(key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.set_item(key, &json);
        }
    }
}

pub(crate) fn load_sidebar_collapsed() -> bool {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .and_then(|s| s.get_item(SIDEBAR_COLLAPSED_KEY).ok().flatten())
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false)
}

pub(crate) fn save_sidebar_collapsed(collapsed: bool) {
    if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        let _ = storage.set_item(SIDEBAR_COLLAPSED_KEY, if collapsed { "1" } else { "0" });
    }
}

pub(crate) fn load_expanded_nodes() -> Vec<String> {
    load_json_from_storage::<Vec<String>>(EXPANDED_NODES_KEY).unwrap_or_default()
}

pub(crate) fn save_expanded_nodes(ids: &[String]) {
    save_json_to_storage(EXPANDED_NODES_KEY, &ids);
}
