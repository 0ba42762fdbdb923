use serde::{Deserialize, Serialize};

/// A single page node in the hierarchical wiki tree.
///
/// The backend addresses pages either by persisted id or by path; both are
/// valid node identifiers in one tree instance.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Page {
    #[serde(rename = "_id")]
    pub id: String,

    pub path: String,

    /// Parent page id. `None` for the root page.
    #[serde(default)]
    pub parent: Option<String>,

    #[serde(rename = "descendantCount", default)]
    pub descendant_count: i64,

    /// An "empty" page is a placeholder created for an ancestor path that has
    /// no body of its own yet.
    #[serde(rename = "isEmpty", default)]
    pub is_empty: bool,
}

impl Page {
    /// Last path segment, used as the display name in tree rows. The root
    /// path (and any path ending in `/`) falls back to the full path.
    pub fn name(&self) -> &str {
        match self.path.rsplit('/').next() {
            Some(seg) if !seg.is_empty() => seg,
            _ => &self.path,
        }
    }
}

/// Response body of the children listing endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ChildrenData {
    pub children: Vec<Page>,
}
