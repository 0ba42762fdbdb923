use leptos::prelude::*;

/// Capability modules applied to a tree widget, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TreeFeature {
    AsyncDataLoader,
    Selection,
    Hotkeys,
    Renaming,
    Checkboxes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TreeFeaturesOptions {
    pub enable_renaming: bool,
    pub enable_checkboxes: bool,
}

impl Default for TreeFeaturesOptions {
    fn default() -> Self {
        Self {
            enable_renaming: true,
            enable_checkboxes: false,
        }
    }
}

/// Compose the capability list for a tree widget. Order is significant: the
/// widget applies capabilities in list order, and renaming/checkboxes compose
/// after the base three.
pub(crate) fn compose_tree_features(opts: TreeFeaturesOptions) -> Vec<TreeFeature> {
    let mut features = vec![
        TreeFeature::AsyncDataLoader,
        TreeFeature::Selection,
        TreeFeature::Hotkeys,
    ];

    if opts.enable_renaming {
        features.push(TreeFeature::Renaming);
    }
    if opts.enable_checkboxes {
        features.push(TreeFeature::Checkboxes);
    }

    features
}

/// Memoized variant for components: recomputes only when the flags change.
pub(crate) fn use_tree_features(opts: Signal<TreeFeaturesOptions>) -> Memo<Vec<TreeFeature>> {
    Memo::new(move |_| compose_tree_features(opts.get()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_include_renaming_but_not_checkboxes() {
        let features = compose_tree_features(TreeFeaturesOptions::default());
        assert_eq!(
            features,
            vec![
                TreeFeature::AsyncDataLoader,
                TreeFeature::Selection,
                TreeFeature::Hotkeys,
                TreeFeature::Renaming,
            ]
        );
    }

    #[test]
    fn test_checkbox_tree_swaps_renaming_for_checkboxes() {
        let features = compose_tree_features(TreeFeaturesOptions {
            enable_renaming: false,
            enable_checkboxes: true,
        });
        assert_eq!(
            features,
            vec![
                TreeFeature::AsyncDataLoader,
                TreeFeature::Selection,
                TreeFeature::Hotkeys,
                TreeFeature::Checkboxes,
            ]
        );
    }

    #[test]
    fn test_both_optional_features_keep_order() {
        let features = compose_tree_features(TreeFeaturesOptions {
            enable_renaming: true,
            enable_checkboxes: true,
        });
        // Renaming composes before checkboxes.
        assert_eq!(
            &features[3..],
            &[TreeFeature::Renaming, TreeFeature::Checkboxes]
        );
    }
}
