use crate::catalog::{ProductRecord, RecordId};
use serde::{Deserialize, Deserializer, Serialize};

/// Items that can be placed in a [`SelectionPair`].
pub trait Selectable {
    /// Key deciding whether two items are the same selection.
    fn selection_key(&self) -> String;
}

impl Selectable for ProductRecord {
    fn selection_key(&self) -> String {
        self.id.to_string()
    }
}

impl Selectable for RecordId {
    fn selection_key(&self) -> String {
        self.to_string()
    }
}

/// What a [`SelectionPair::toggle`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    /// Added, pushing the oldest selection out.
    AddedEvicting,
    Removed,
}

/// Up to two selected items, oldest first.
///
/// Selecting a third item evicts the oldest one; selecting an item that is
/// already present deselects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SelectionPair<T> {
    items: Vec<T>,
}

impl<T> Default for SelectionPair<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> SelectionPair<T> {
    pub const CAPACITY: usize = 2;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn second(&self) -> Option<&T> {
        self.items.get(1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Both slots are filled.
    pub fn is_complete(&self) -> bool {
        self.items.len() == Self::CAPACITY
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Selectable> SelectionPair<T> {
    pub fn contains(&self, item: &impl Selectable) -> bool {
        let key = item.selection_key();
        self.items.iter().any(|i| i.selection_key() == key)
    }

    /// Select `item`, or deselect it if it is already selected.
    pub fn toggle(&mut self, item: T) -> Toggle {
        let key = item.selection_key();
        if let Some(pos) = self.items.iter().position(|i| i.selection_key() == key) {
            self.items.remove(pos);
            return Toggle::Removed;
        }
        self.items.push(item);
        if self.items.len() > Self::CAPACITY {
            self.items.remove(0);
            Toggle::AddedEvicting
        } else {
            Toggle::Added
        }
    }

    /// Build a pair from items in selection order.
    pub fn from_selections(items: impl IntoIterator<Item = T>) -> Self {
        let mut pair = Self::new();
        for item in items {
            pair.toggle(item);
        }
        pair
    }
}

// Replays the stored order so a hand-edited file can't break the size limit.
impl<'de, T: Deserialize<'de> + Selectable> Deserialize<'de> for SelectionPair<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<T>::deserialize(deserializer).map(Self::from_selections)
    }
}

impl SelectionPair<ProductRecord> {
    /// Ids of the selected products, oldest first.
    pub fn ids(&self) -> SelectionPair<RecordId> {
        SelectionPair {
            items: self.items.iter().map(|p| p.id.clone()).collect(),
        }
    }
}
