pub(crate) mod children;

pub(crate) use children::{ChildrenFetchCache, ChildrenFetcher};
