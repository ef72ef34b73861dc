use super::models::{Item, ItemId, ListId, Priority, PriorityFilter, TodoList};
use chrono::Utc;
use log::{debug, warn};
use std::collections::HashSet;

/// Hands out creation-timestamp identifiers, never reusing one.
#[derive(Debug, Clone)]
struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    fn seeded(lists: &[TodoList]) -> Self {
        let last = lists
            .iter()
            .flat_map(|list| std::iter::once(list.id).chain(list.items.iter().map(|item| item.id)))
            .max()
            .unwrap_or(0);
        Self { last }
    }

    /// `None` once the id space above the largest known id is used up.
    fn next_id(&mut self) -> Option<i64> {
        let floor = self.last.checked_add(1)?;
        self.last = Utc::now().timestamp_millis().max(floor);
        Some(self.last)
    }
}

/// The list collection plus the transient state bound to it: active list,
/// priority filter and the bulk-completion selection.
///
/// Mutators return `true` when the list collection changed and must be
/// written back to storage.
#[derive(Debug, Clone)]
pub struct ListStore {
    lists: Vec<TodoList>,
    active_list_id: Option<ListId>,
    filter: PriorityFilter,
    selection: HashSet<ItemId>,
    ids: IdGenerator,
}

impl ListStore {
    pub fn new(lists: Vec<TodoList>) -> Self {
        let active_list_id = lists.first().map(|list| list.id);
        let ids = IdGenerator::seeded(&lists);
        Self {
            lists,
            active_list_id,
            filter: PriorityFilter::All,
            selection: HashSet::new(),
            ids,
        }
    }

    pub fn lists(&self) -> &[TodoList] {
        &self.lists
    }

    pub fn active_list_id(&self) -> Option<ListId> {
        self.active_list_id
    }

    pub fn active_list(&self) -> Option<&TodoList> {
        let id = self.active_list_id?;
        self.lists.iter().find(|list| list.id == id)
    }

    fn active_list_mut(&mut self) -> Option<&mut TodoList> {
        let id = self.active_list_id?;
        self.lists.iter_mut().find(|list| list.id == id)
    }

    pub fn filter(&self) -> PriorityFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: PriorityFilter) {
        self.filter = filter;
    }

    pub fn selection(&self) -> &HashSet<ItemId> {
        &self.selection
    }

    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selection.contains(&id)
    }

    pub fn create_list(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        let Some(id) = self.ids.next_id() else {
            warn!("no list id left after {}", self.ids.last);
            return false;
        };
        self.lists.insert(0, TodoList::new(id, name.to_string()));
        self.active_list_id = Some(id);
        self.selection.clear();
        debug!("created list {} ({})", id, name);
        true
    }

    /// Makes an existing list the active one. Returns `false` for unknown ids
    /// and for the list that is already active.
    pub fn select_list(&mut self, id: ListId) -> bool {
        if self.active_list_id == Some(id) || !self.lists.iter().any(|list| list.id == id) {
            return false;
        }
        self.active_list_id = Some(id);
        self.selection.clear();
        true
    }

    pub fn add_item(&mut self, text: &str, priority: Priority) -> bool {
        let text = text.trim();
        if text.is_empty() || self.active_list().is_none() {
            return false;
        }

        let Some(id) = self.ids.next_id() else {
            warn!("no item id left after {}", self.ids.last);
            return false;
        };
        if let Some(list) = self.active_list_mut() {
            list.items.insert(0, Item::new(id, text.to_string(), priority));
            debug!("added item {} to list {}", id, list.id);
        }
        true
    }

    pub fn delete_item(&mut self, id: ItemId) -> bool {
        let Some(list) = self.active_list_mut() else {
            return false;
        };
        let Some(position) = list.items.iter().position(|item| item.id == id) else {
            return false;
        };
        list.items.remove(position);
        self.selection.remove(&id);
        debug!("deleted item {}", id);
        true
    }

    /// Removes every item of the active list whose id is in `selection`,
    /// then clears the store's selection.
    pub fn complete_selected(&mut self, selection: &HashSet<ItemId>) -> bool {
        let Some(list) = self.active_list_mut() else {
            return false;
        };
        let before = list.items.len();
        list.items.retain(|item| !selection.contains(&item.id));
        debug!("completed {} selected item(s)", before - list.items.len());
        self.selection.clear();
        true
    }

    pub fn complete_current_selection(&mut self) -> bool {
        let selection = std::mem::take(&mut self.selection);
        self.complete_selected(&selection)
    }

    pub fn complete_all(&mut self) -> bool {
        let Some(list) = self.active_list_mut() else {
            return false;
        };
        debug!("completed all {} item(s) of list {}", list.items.len(), list.id);
        list.items.clear();
        self.selection.clear();
        true
    }

    /// Flips the selection state of an item of the active list and returns
    /// whether it is now selected.
    pub fn toggle_select(&mut self, id: ItemId) -> bool {
        let in_active_list = self.active_list().is_some_and(|list| list.contains(id));
        if !in_active_list {
            return false;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
        self.selection.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::view;

    fn store_with_list(name: &str) -> ListStore {
        let mut store = ListStore::new(Vec::new());
        assert!(store.create_list(name));
        store
    }

    fn item_ids(store: &ListStore) -> Vec<ItemId> {
        store
            .active_list()
            .map(|list| list.items.iter().map(|item| item.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_new_store_activates_first_list() {
        let lists = vec![
            TodoList::new(20, "Récente".to_string()),
            TodoList::new(10, "Ancienne".to_string()),
        ];
        let store = ListStore::new(lists);
        assert_eq!(store.active_list_id(), Some(20));

        let empty = ListStore::new(Vec::new());
        assert!(empty.active_list().is_none());
    }

    #[test]
    fn test_create_list_prepends_and_activates() {
        let mut store = store_with_list("Travail");
        assert!(store.create_list("  Courses  "));

        assert_eq!(store.lists().len(), 2);
        assert_eq!(store.lists()[0].name, "Courses");
        assert_eq!(store.active_list().unwrap().name, "Courses");
        assert_ne!(store.lists()[0].id, store.lists()[1].id);
    }

    #[test]
    fn test_create_list_whitespace_name_is_noop() {
        let mut store = store_with_list("Travail");
        let before = store.lists().to_vec();

        assert!(!store.create_list("   "));
        assert!(!store.create_list(""));
        assert_eq!(store.lists(), before.as_slice());
    }

    #[test]
    fn test_add_item_prepends() {
        let mut store = store_with_list("Courses");
        assert!(store.add_item("Lait", Priority::Medium));
        assert!(store.add_item("Oeufs", Priority::Urgent));

        let list = store.active_list().unwrap();
        assert_eq!(list.items[0].text, "Oeufs");
        assert_eq!(list.items[1].text, "Lait");
    }

    #[test]
    fn test_add_item_empty_text_is_noop() {
        let mut store = store_with_list("Courses");
        store.add_item("Lait", Priority::Low);
        let before = item_ids(&store);

        assert!(!store.add_item("", Priority::Low));
        assert!(!store.add_item(" \t ", Priority::Urgent));
        assert_eq!(item_ids(&store), before);
    }

    #[test]
    fn test_add_item_without_active_list_is_noop() {
        let mut store = ListStore::new(Vec::new());
        assert!(!store.add_item("Lait", Priority::Medium));
        assert!(store.lists().is_empty());
    }

    #[test]
    fn test_item_ids_stay_unique() {
        let mut store = store_with_list("Courses");
        for round in 0..50 {
            store.add_item(&format!("item {}", round), Priority::Medium);
            if round % 3 == 0 {
                let first = item_ids(&store)[0];
                store.delete_item(first);
            }
        }

        let ids = item_ids(&store);
        let unique: HashSet<ItemId> = ids.iter().copied().collect();
        assert_eq!(ids.len(), unique.len());
    }

    #[test]
    fn test_ids_do_not_collide_with_loaded_ids() {
        let far_future = Utc::now().timestamp_millis() + 1_000_000;
        let mut list = TodoList::new(far_future, "Chargée".to_string());
        list.items.push(Item::new(far_future + 1, "Vieux".to_string(), Priority::Low));
        let mut store = ListStore::new(vec![list]);

        store.add_item("Neuf", Priority::Low);
        assert_eq!(item_ids(&store), vec![far_future + 2, far_future + 1]);
    }

    #[test]
    fn test_exhausted_ids_make_creation_a_noop() {
        let mut list = TodoList::new(i64::MAX, "Pleine".to_string());
        list.items.push(Item::new(i64::MAX - 1, "Vieux".to_string(), Priority::Low));
        let mut store = ListStore::new(vec![list]);

        assert!(!store.add_item("Neuf", Priority::Low));
        assert!(!store.create_list("Autre"));
        assert_eq!(store.lists().len(), 1);
        assert_eq!(item_ids(&store), vec![i64::MAX - 1]);
    }

    #[test]
    fn test_delete_item() {
        let mut store = store_with_list("Courses");
        store.add_item("Lait", Priority::Medium);
        store.add_item("Pain", Priority::Low);
        let ids = item_ids(&store);

        assert!(store.delete_item(ids[1]));
        assert_eq!(item_ids(&store), vec![ids[0]]);
        assert!(!store.delete_item(ids[1]));
    }

    #[test]
    fn test_delete_item_prunes_selection() {
        let mut store = store_with_list("Courses");
        store.add_item("Lait", Priority::Medium);
        let id = item_ids(&store)[0];

        store.toggle_select(id);
        store.delete_item(id);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_complete_selected_removes_exactly_those_items() {
        let mut store = store_with_list("Courses");
        for text in ["a", "b", "c", "d"] {
            store.add_item(text, Priority::Medium);
        }
        let ids = item_ids(&store);
        store.toggle_select(ids[2]);

        let chosen: HashSet<ItemId> = [ids[0], ids[1], 424242].into_iter().collect();
        assert!(store.complete_selected(&chosen));

        assert_eq!(item_ids(&store), vec![ids[2], ids[3]]);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_complete_current_selection() {
        let mut store = store_with_list("Courses");
        store.add_item("a", Priority::Medium);
        store.add_item("b", Priority::Low);
        let ids = item_ids(&store);

        store.toggle_select(ids[1]);
        assert!(store.complete_current_selection());
        assert_eq!(item_ids(&store), vec![ids[0]]);
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_complete_all() {
        let mut store = store_with_list("Courses");
        for text in ["a", "b", "c"] {
            store.add_item(text, Priority::Urgent);
        }
        let first = item_ids(&store)[0];
        store.toggle_select(first);

        assert!(store.complete_all());
        assert!(store.active_list().unwrap().items.is_empty());
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_complete_without_active_list_is_noop() {
        let mut store = ListStore::new(Vec::new());
        assert!(!store.complete_all());
        assert!(!store.complete_selected(&HashSet::from([1])));
    }

    #[test]
    fn test_toggle_select_twice_is_identity() {
        let mut store = store_with_list("Courses");
        store.add_item("a", Priority::Medium);
        store.add_item("b", Priority::Medium);
        let ids = item_ids(&store);
        store.toggle_select(ids[0]);
        let original = store.selection().clone();

        assert!(store.toggle_select(ids[1]));
        assert!(!store.toggle_select(ids[1]));
        assert_eq!(store.selection(), &original);
    }

    #[test]
    fn test_toggle_select_ignores_foreign_ids() {
        let mut store = store_with_list("Courses");
        assert!(!store.toggle_select(99));
        assert!(store.selection().is_empty());
    }

    #[test]
    fn test_select_list_clears_selection() {
        let mut store = store_with_list("Travail");
        let work = store.active_list_id().unwrap();
        store.add_item("Rapport", Priority::Urgent);
        store.create_list("Courses");
        store.select_list(work);
        let id = item_ids(&store)[0];
        store.toggle_select(id);

        let groceries = store.lists()[0].id;
        assert!(store.select_list(groceries));
        assert!(store.selection().is_empty());
        assert!(!store.select_list(groceries));
        assert!(!store.select_list(-1));
    }

    #[test]
    fn test_groceries_end_to_end() {
        let mut store = ListStore::new(Vec::new());
        store.create_list("Groceries");
        store.add_item("Milk", Priority::Medium);
        store.add_item("Eggs", Priority::Urgent);
        store.set_filter(PriorityFilter::Only(Priority::Urgent));

        let list = store.active_list().unwrap();
        let shown: Vec<&str> = view::filtered_items(list, store.filter())
            .iter()
            .map(|item| item.text.as_str())
            .collect();
        assert_eq!(shown, vec!["Eggs"]);

        let counts = view::counts(list);
        assert_eq!(counts.total, 2);
        assert_eq!(counts.urgent, 1);
    }
}
