pub(crate) mod auto_expand;
pub(crate) mod features;
pub(crate) mod revalidate;
pub(crate) mod store;

pub(crate) use auto_expand::use_auto_expand_on_create;
pub(crate) use features::{use_tree_features, TreeFeature, TreeFeaturesOptions};
pub(crate) use revalidate::use_tree_revalidation;
pub(crate) use store::PageTreeStore;
