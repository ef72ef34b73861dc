use super::models::{Counts, Item, Priority, PriorityFilter, TodoList};

/// Items of `list` matching `filter`, in list order.
pub fn filtered_items(list: &TodoList, filter: PriorityFilter) -> Vec<&Item> {
    list.items
        .iter()
        .filter(|item| filter.matches(item.priority))
        .collect()
}

/// Counts are always taken over the unfiltered items.
pub fn counts(list: &TodoList) -> Counts {
    let mut counts = Counts {
        total: list.items.len(),
        ..Counts::default()
    };
    for item in &list.items {
        match item.priority {
            Priority::Urgent => counts.urgent += 1,
            Priority::Medium => counts.medium += 1,
            Priority::Low => counts.low += 1,
        }
    }
    counts
}
