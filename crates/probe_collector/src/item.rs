//! The concrete probe result item collected by this boundary.

use itemcache::{ItemContent, ItemId};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::Xxh3;

/// Collection status of a probe result item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    /// The probed object exists on the target system.
    Exists,
    /// The probed object does not exist.
    DoesNotExist,
    /// The probe chose not to collect the object.
    NotCollected,
    /// The probe hit an error while collecting.
    Error,
}

/// One named value inside a probe result item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub name: String,
    pub value: String,
}

impl ItemEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Structured result item produced by a probe scan.
///
/// Content identity covers `name`, `status`, and `entries`; the `id` field
/// is assigned by the cache during collection and never participates in
/// the fingerprint or equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeItem {
    /// Item kind, e.g. `file_item` or `package_item`.
    pub name: String,
    pub status: ItemStatus,
    /// Ordered child entries.
    pub entries: Vec<ItemEntry>,
    /// Unique identifier assigned at collection; absent until collected.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<String>,
}

impl ProbeItem {
    /// Creates an item with no entries.
    pub fn new(name: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            name: name.into(),
            status,
            entries: Vec::new(),
            id: None,
        }
    }

    /// Builder-style entry append.
    pub fn with_entry(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(ItemEntry::new(name, value));
        self
    }

    /// Appends an entry in place.
    pub fn push_entry(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push(ItemEntry::new(name, value));
    }
}

impl ItemContent for ProbeItem {
    fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.update(self.name.as_bytes());
        hasher.update(&[self.status as u8]);
        for entry in &self.entries {
            // Length-prefix each field so entry boundaries stay unambiguous.
            hasher.update(&(entry.name.len() as u64).to_le_bytes());
            hasher.update(entry.name.as_bytes());
            hasher.update(&(entry.value.len() as u64).to_le_bytes());
            hasher.update(entry.value.as_bytes());
        }
        hasher.digest()
    }

    fn content_eq(&self, other: &Self) -> bool {
        self.name == other.name && self.status == other.status && self.entries == other.entries
    }

    fn set_id(&mut self, id: ItemId) {
        self.id = Some(id.into_string());
    }
}
