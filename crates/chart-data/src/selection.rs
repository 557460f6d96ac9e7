// File: crates/chart-data/src/selection.rs
// Summary: Named selection overlays holding item identifiers independent of data values.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// Selection id -> set of item ids. Unknown ids are never an error:
/// queries answer `false`, removals are no-ops.
#[derive(Clone, Debug)]
pub struct SelectionOverlay<I> {
    selections: FxHashMap<String, FxHashSet<I>>,
}

impl<I> Default for SelectionOverlay<I> {
    fn default() -> Self {
        Self { selections: FxHashMap::default() }
    }
}

impl<I: Eq + Hash + Clone> SelectionOverlay<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, selection_id: &str, item: I) {
        self.selections.entry(selection_id.to_string()).or_default().insert(item);
    }

    /// Remove `item` from the named selection; returns whether it was selected.
    pub fn unselect<Q>(&mut self, selection_id: &str, item: &Q) -> bool
    where
        I: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.selections.get_mut(selection_id).is_some_and(|set| set.remove(item))
    }

    pub fn is_selected<Q>(&self, selection_id: &str, item: &Q) -> bool
    where
        I: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.selections.get(selection_id).is_some_and(|set| set.contains(item))
    }

    /// Drop the whole named overlay. Other overlays are untouched.
    pub fn clear_selection(&mut self, selection_id: &str) {
        self.selections.remove(selection_id);
    }

    /// Items recorded under `selection_id`, in no particular order.
    pub fn selected_items(&self, selection_id: &str) -> Vec<I> {
        self.selections
            .get(selection_id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids of every overlay currently present, sorted.
    pub fn selection_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.selections.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Keep only items for which `keep` returns true, across all overlays.
    pub fn retain(&mut self, mut keep: impl FnMut(&I) -> bool) {
        for set in self.selections.values_mut() {
            set.retain(|item| keep(item));
        }
    }

    pub fn clear_all(&mut self) {
        self.selections.clear();
    }
}
