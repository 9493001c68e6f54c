//! Producer-side filter predicates.
//!
//! Filters run on the producer thread, before an item ever reaches the
//! cache; rejected items are dropped without being submitted.

use crate::item::{ItemStatus, ProbeItem};

/// Whether items matching a filter's criteria are kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Keep only items that match every criterion.
    Include,
    /// Drop items that match every criterion.
    Exclude,
}

/// A single condition matched against an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// The item has this collection status.
    Status(ItemStatus),
    /// The item kind equals this name.
    NameIs(String),
    /// Some entry named `name` has exactly this `value`.
    EntryEquals { name: String, value: String },
}

impl Criterion {
    fn matches(&self, item: &ProbeItem) -> bool {
        match self {
            Self::Status(status) => item.status == *status,
            Self::NameIs(name) => item.name == *name,
            Self::EntryEquals { name, value } => item
                .entries
                .iter()
                .any(|entry| entry.name == *name && entry.value == *value),
        }
    }
}

/// Predicate deciding whether an item survives collection.
#[derive(Debug, Clone)]
pub struct Filter {
    pub action: FilterAction,
    pub criteria: Vec<Criterion>,
}

impl Filter {
    /// Filter keeping only items that match every criterion.
    pub fn include(criteria: Vec<Criterion>) -> Self {
        Self {
            action: FilterAction::Include,
            criteria,
        }
    }

    /// Filter dropping items that match every criterion.
    pub fn exclude(criteria: Vec<Criterion>) -> Self {
        Self {
            action: FilterAction::Exclude,
            criteria,
        }
    }

    /// True if the item passes this filter.
    pub fn keeps(&self, item: &ProbeItem) -> bool {
        let matched = self.criteria.iter().all(|criterion| criterion.matches(item));
        match self.action {
            FilterAction::Include => matched,
            FilterAction::Exclude => !matched,
        }
    }
}

/// True if the item passes every filter in `filters`.
pub fn accepted(filters: &[Filter], item: &ProbeItem) -> bool {
    filters.iter().all(|filter| filter.keeps(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package_item(name: &str, arch: &str) -> ProbeItem {
        ProbeItem::new("package_item", ItemStatus::Exists)
            .with_entry("name", name)
            .with_entry("arch", arch)
    }

    #[test]
    fn test_include_requires_all_criteria() {
        let filter = Filter::include(vec![
            Criterion::NameIs("package_item".to_string()),
            Criterion::EntryEquals {
                name: "arch".to_string(),
                value: "x86_64".to_string(),
            },
        ]);

        assert!(filter.keeps(&package_item("openssl", "x86_64")));
        assert!(!filter.keeps(&package_item("openssl", "aarch64")));
    }

    #[test]
    fn test_exclude_drops_matching_items() {
        let filter = Filter::exclude(vec![Criterion::Status(ItemStatus::Error)]);

        assert!(filter.keeps(&package_item("openssl", "x86_64")));
        assert!(!filter.keeps(&ProbeItem::new("package_item", ItemStatus::Error)));
    }

    #[test]
    fn test_accepted_chains_filters() {
        let filters = vec![
            Filter::exclude(vec![Criterion::Status(ItemStatus::Error)]),
            Filter::include(vec![Criterion::NameIs("package_item".to_string())]),
        ];

        assert!(accepted(&filters, &package_item("zlib", "x86_64")));
        assert!(!accepted(&filters, &ProbeItem::new("file_item", ItemStatus::Exists)));
    }

    #[test]
    fn test_empty_filter_list_accepts_everything() {
        assert!(accepted(&[], &package_item("bash", "x86_64")));
    }
}
