//! Collection-typed cells
//!
//! Portfolios, train pools and certificate holdings are collections. They
//! are tracked as ordinary [`StateCell`]s over persistent `im` collections:
//!
//! | Alias | Value type | Typical use |
//! |-------|------------|-------------|
//! | [`SetState<T>`] | `im::OrdSet<T>` | Companies a player has sold this round |
//! | [`ListState<T>`] | `im::Vector<T>` | Trains in the pool, in purchase order |
//! | [`MultimapState<K, V>`] | `im::OrdMap<K, OrdSet<V>>` | Tokens per hex |
//!
//! Every helper builds the next snapshot from the current one and hands it
//! to [`StateCell::update`]. The old snapshot stays alive inside the change
//! record; structural sharing keeps that cheap. A helper that would not
//! alter the collection (adding a present member, removing an absent one)
//! records nothing.

use crate::cell::StateCell;
use im::{OrdMap, OrdSet, Vector};
use railstate_core::{StateResult, StateValue};

/// A tracked ordered set
pub type SetState<T> = StateCell<OrdSet<T>>;

/// A tracked list
pub type ListState<T> = StateCell<Vector<T>>;

/// A tracked multimap: each key maps to a set of values
pub type MultimapState<K, V> = StateCell<OrdMap<K, OrdSet<V>>>;

// =============================================================================
// SetState
// =============================================================================

impl<T: StateValue + Ord> StateCell<OrdSet<T>> {
    /// Add a member; `false` if it was already present
    pub fn add(&self, member: T) -> StateResult<bool> {
        self.update(|set| set.update(member))
    }

    /// Remove a member; `false` if it was absent
    pub fn remove(&self, member: &T) -> StateResult<bool> {
        self.update(|set| set.without(member))
    }

    /// Remove every member
    pub fn clear(&self) -> StateResult<bool> {
        self.set(OrdSet::new())
    }

    /// Check membership
    pub fn contains(&self, member: &T) -> bool {
        self.with_value(|set| set.contains(member))
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.with_value(|set| set.len())
    }

    /// Check if the set is empty
    pub fn is_empty(&self) -> bool {
        self.with_value(|set| set.is_empty())
    }
}

// =============================================================================
// ListState
// =============================================================================

impl<T: StateValue> StateCell<Vector<T>> {
    /// Append an element
    pub fn push(&self, element: T) -> StateResult<bool> {
        self.update(|list| {
            let mut next = list.clone();
            next.push_back(element);
            next
        })
    }

    /// Remove and return the element at `index`
    ///
    /// Returns `None` and records nothing if `index` is out of range.
    pub fn remove_at(&self, index: usize) -> StateResult<Option<T>> {
        let mut removed = None;
        self.update(|list| {
            if index >= list.len() {
                return list.clone();
            }
            let mut next = list.clone();
            removed = Some(next.remove(index));
            next
        })?;
        Ok(removed)
    }

    /// Remove the first element equal to `element`
    pub fn remove(&self, element: &T) -> StateResult<bool> {
        self.update(|list| match list.index_of(element) {
            Some(index) => {
                let mut next = list.clone();
                next.remove(index);
                next
            }
            None => list.clone(),
        })
    }

    /// Remove every element
    pub fn clear(&self) -> StateResult<bool> {
        self.set(Vector::new())
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Option<T> {
        self.with_value(|list| list.get(index).cloned())
    }

    /// Check if any element equals `element`
    pub fn contains(&self, element: &T) -> bool {
        self.with_value(|list| list.contains(element))
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.with_value(|list| list.len())
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.with_value(|list| list.is_empty())
    }
}

// =============================================================================
// MultimapState
// =============================================================================

impl<K, V> StateCell<OrdMap<K, OrdSet<V>>>
where
    K: StateValue + Ord,
    V: StateValue + Ord,
{
    /// Add `value` under `key`; `false` if the entry already existed
    pub fn put(&self, key: K, value: V) -> StateResult<bool> {
        self.update(|map| {
            let values = map.get(&key).cloned().unwrap_or_default().update(value);
            map.update(key, values)
        })
    }

    /// Remove one entry; `false` if it was absent
    ///
    /// A key whose last value is removed disappears from the map.
    pub fn remove(&self, key: &K, value: &V) -> StateResult<bool> {
        self.update(|map| match map.get(key) {
            Some(values) if values.contains(value) => {
                let values = values.without(value);
                if values.is_empty() {
                    map.without(key)
                } else {
                    map.update(key.clone(), values)
                }
            }
            _ => map.clone(),
        })
    }

    /// Remove every value under `key` and return them
    pub fn remove_all(&self, key: &K) -> StateResult<OrdSet<V>> {
        let mut removed = OrdSet::new();
        self.update(|map| match map.extract(key) {
            Some((values, next)) => {
                removed = values;
                next
            }
            None => map.clone(),
        })?;
        Ok(removed)
    }

    /// Values under `key` (empty if none)
    pub fn get(&self, key: &K) -> OrdSet<V> {
        self.with_value(|map| map.get(key).cloned().unwrap_or_default())
    }

    /// Check if `key` maps to `value`
    pub fn contains_entry(&self, key: &K, value: &V) -> bool {
        self.with_value(|map| map.get(key).is_some_and(|values| values.contains(value)))
    }

    /// Check if `key` has any value
    pub fn contains_key(&self, key: &K) -> bool {
        self.with_value(|map| map.contains_key(key))
    }

    /// Keys with at least one value, in order
    pub fn keys(&self) -> Vec<K> {
        self.with_value(|map| map.keys().cloned().collect())
    }

    /// Total number of entries across all keys
    pub fn size(&self) -> usize {
        self.with_value(|map| map.values().map(|values| values.len()).sum())
    }
}
