use indexmap::IndexSet;
use pipkit_core::PackageName;

/// In-memory tracking sets. Insertion order is kept for stable listings
/// and error reporting; membership is the contract.
#[derive(Debug, Clone, Default)]
pub(crate) struct ManagerState {
    pub(crate) explicit: IndexSet<PackageName>,
    pub(crate) materialized: IndexSet<PackageName>,
    /// Every requested or materialized name; never shrinks.
    pub(crate) history: IndexSet<PackageName>,
}

impl ManagerState {
    pub(crate) fn record_history<'a>(&mut self, names: impl IntoIterator<Item = &'a PackageName>) {
        for name in names {
            if !self.history.contains(name) {
                self.history.insert(name.clone());
            }
        }
    }
}
