use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use pipkit_core::PackageName;
use pipkit_registry::PackageSource;
use pipkit_tree::FileTree;

use crate::PackageManager;

impl<S: PackageSource + ?Sized, W: FileTree> PackageManager<'_, S, W> {
    /// Fuzzy subsequence search over every package this manager has handled,
    /// including uninstalled ones. Best score first; ties keep history order.
    pub fn local_search(&self, term: &str) -> Vec<PackageName> {
        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .state
            .history
            .iter()
            .enumerate()
            .filter_map(|(position, name)| {
                matcher
                    .fuzzy_match(name.as_str(), term)
                    .map(|score| (score, position, name))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|left, right| right.0.cmp(&left.0).then(left.1.cmp(&right.1)));

        let limit = self.config.search_limit.unwrap_or(usize::MAX);
        scored
            .into_iter()
            .take(limit)
            .map(|(_, _, name)| name.clone())
            .collect()
    }
}
