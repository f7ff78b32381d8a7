use super::scorer;
use crate::action::ActionId;
use crate::index::ActionStore;
use std::cmp::Ordering;
use tracing::trace;

/// A matching action and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedAction {
    pub id: ActionId,
    pub score: u64,
}

/// Score every active action and order the matches.
///
/// Ordering is score descending, then last use descending, then key ascending
/// so equal inputs always produce the same list. An empty query matches nothing.
#[must_use]
pub fn rank(store: &ActionStore, query: &str) -> Vec<RankedAction> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<(RankedAction, u64, &str)> = store
        .iter()
        .filter(|(_, action)| action.active)
        .filter_map(|(id, action)| {
            scorer::score(action, query)
                .map(|score| (RankedAction { id, score }, action.last_used, action.key.as_str()))
        })
        .collect();

    matches.sort_by(|a, b| compare(a, b));

    trace!("Ranked {} matches for {:?}", matches.len(), query);
    matches.into_iter().map(|(ranked, _, _)| ranked).collect()
}

fn compare(a: &(RankedAction, u64, &str), b: &(RankedAction, u64, &str)) -> Ordering {
    b.0.score
        .cmp(&a.0.score)
        .then_with(|| b.1.cmp(&a.1))
        .then_with(|| a.2.cmp(b.2))
}

/// Ranked results with a cursor that wraps at both ends.
#[derive(Debug, Clone, Default)]
pub struct ResultList {
    items: Vec<RankedAction>,
    selection: usize,
}

impl ResultList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-rank against `query`, resetting the cursor to the top.
    pub fn refilter(&mut self, store: &ActionStore, query: &str) {
        self.items = rank(store, query);
        self.selection = 0;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selection = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[RankedAction] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RankedAction> {
        self.items.get(index)
    }

    #[must_use]
    pub fn selection(&self) -> usize {
        self.selection
    }

    #[must_use]
    pub fn selected(&self) -> Option<&RankedAction> {
        self.items.get(self.selection)
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selection = (self.selection + 1) % self.items.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.items.is_empty() {
            let len = self.items.len();
            self.selection = (self.selection + len - 1) % len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionFields, Runner};

    fn fields(name: &str) -> ActionFields {
        ActionFields {
            display_name: name.to_string(),
            match_hint: String::new(),
            icon_ref: String::new(),
            source_time: 0,
            runner: Runner::RunCommand {
                command: name.to_lowercase(),
            },
        }
    }

    #[test]
    fn test_rank_empty_query() {
        let mut store = ActionStore::new();
        store.upsert("cmd:a", fields("Alpha"));
        assert!(rank(&store, "").is_empty());
    }

    #[test]
    fn test_rank_skips_inactive() {
        let mut store = ActionStore::new();
        let id = store.upsert("cmd:a", fields("Alpha"));
        store.deactivate(id);
        assert!(rank(&store, "alp").is_empty());
    }

    #[test]
    fn test_rank_ties_broken_by_last_used() {
        let mut store = ActionStore::new();
        let old = store.upsert("cmd:1", fields("Editor"));
        let new = store.upsert("cmd:2", fields("Editor"));
        store.restore_usage("cmd:1", "", 10);
        store.restore_usage("cmd:2", "", 20);

        let ids: Vec<_> = rank(&store, "edit").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![new, old]);
    }

    #[test]
    fn test_rank_full_tie_broken_by_key() {
        let mut store = ActionStore::new();
        let b = store.upsert("cmd:b", fields("Same"));
        let a = store.upsert("cmd:a", fields("Same"));
        let ids: Vec<_> = rank(&store, "same").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn test_result_list_wraps() {
        let mut store = ActionStore::new();
        store.upsert("cmd:a", fields("Item A"));
        store.upsert("cmd:b", fields("Item B"));
        store.upsert("cmd:c", fields("Item C"));

        let mut list = ResultList::new();
        list.refilter(&store, "item");
        assert_eq!(list.len(), 3);
        assert_eq!(list.selection(), 0);

        list.select_previous();
        assert_eq!(list.selection(), 2);
        list.select_next();
        assert_eq!(list.selection(), 0);
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selection(), 0);
    }

    #[test]
    fn test_result_list_refilter_resets_cursor() {
        let mut store = ActionStore::new();
        store.upsert("cmd:a", fields("Item A"));
        store.upsert("cmd:b", fields("Item B"));

        let mut list = ResultList::new();
        list.refilter(&store, "item");
        list.select_next();
        assert_eq!(list.selection(), 1);
        list.refilter(&store, "item");
        assert_eq!(list.selection(), 0);
    }

    #[test]
    fn test_result_list_empty_navigation() {
        let mut list = ResultList::new();
        list.select_next();
        list.select_previous();
        assert_eq!(list.selection(), 0);
        assert!(list.selected().is_none());
    }
}
