use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ListId = i64;
pub type ItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Urgente")]
    Urgent,
    #[default]
    #[serde(rename = "Moyenne")]
    Medium,
    #[serde(rename = "Basse")]
    Low,
}

impl Priority {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Urgent => "Urgente",
            Self::Medium => "Moyenne",
            Self::Low => "Basse",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Urgent => Self::Medium,
            Self::Medium => Self::Low,
            Self::Low => Self::Urgent,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urgente" | "urgent" => Ok(Self::Urgent),
            "moyenne" | "medium" => Ok(Self::Medium),
            "basse" | "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown priority '{}' (expected Urgente, Moyenne or Basse)",
                other
            )),
        }
    }
}

/// Which items of the active list are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == priority,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Only(Priority::Urgent),
            Self::Only(Priority::Low) => Self::All,
            Self::Only(p) => Self::Only(p.next()),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "Tous",
            Self::Only(p) => p.label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub priority: Priority,
}

impl Item {
    pub fn new(id: ItemId, text: String, priority: Priority) -> Self {
        Self { id, text, priority }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    #[serde(alias = "todos")]
    pub items: Vec<Item>,
}

impl TodoList {
    pub fn new(id: ListId, name: String) -> Self {
        Self {
            id,
            name,
            items: Vec::new(),
        }
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }
}

/// Item counts over an unfiltered list, shown on the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    pub total: usize,
    pub urgent: usize,
    pub medium: usize,
    pub low: usize,
}

impl Counts {
    pub fn for_priority(&self, priority: Priority) -> usize {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    pub fn for_filter(&self, filter: PriorityFilter) -> usize {
        match filter {
            PriorityFilter::All => self.total,
            PriorityFilter::Only(p) => self.for_priority(p),
        }
    }
}
