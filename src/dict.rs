use alloc::collections::BTreeMap;

use tracing::{debug, trace};

use crate::clock::{Clock, Timestamp};
use crate::{Crdt, DeltaCrdt};

/// The latest value added for a key, with the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddRecord<V> {
    value: V,
    timestamp: Timestamp,
}

impl<V> AddRecord<V> {
    /// Create a record for `value` added at `timestamp`.
    pub fn new(value: V, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }

    /// The added value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// When the value was added.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Take the value out of the record.
    pub fn into_value(self) -> V {
        self.value
    }
}

/// A last-write-wins element dictionary (LWW-Element-Dictionary).
///
/// Each key carries at most one add record `(value, timestamp)` and at most
/// one remove record `timestamp`. Both are overwritten, never accumulated,
/// and never deleted: a removal is a tombstone that coexists with the add
/// record it shadows.
///
/// A key is present when it has an add record and either no remove record
/// or a remove record no later than the add. Ties between an add and a
/// remove go to the add.
///
/// Merging takes the later record per key in each of the two maps
/// independently. When two add records for a key carry the same timestamp,
/// the incoming one (the argument of [`merge`](Crdt::merge)) wins, so merge
/// order only matters for exact add-timestamp ties.
///
/// # Example
///
/// ```
/// use lww_dict::prelude::*;
///
/// let mut r1 = LWWDict::new();
/// r1.add_with_timestamp("color", "red", Timestamp::from_secs(10));
///
/// let mut r2 = LWWDict::new();
/// r2.remove_with_timestamp("color", Timestamp::from_secs(12));
/// r2.add_with_timestamp("size", "xl", Timestamp::from_secs(11));
///
/// r1.merge(&r2);
/// assert_eq!(r1.lookup(&"color"), None); // removed after it was added
/// assert_eq!(r1.lookup(&"size"), Some(&"xl"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LWWDict<K: Ord + Clone, V: Clone> {
    adds: BTreeMap<K, AddRecord<V>>,
    removes: BTreeMap<K, Timestamp>,
}

impl<K: Ord + Clone, V: Clone> LWWDict<K, V> {
    /// Create a new empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adds: BTreeMap::new(),
            removes: BTreeMap::new(),
        }
    }

    /// Rebuild a replica from its add and remove maps.
    ///
    /// This is the receiving end of whatever transport carries replica
    /// state between processes.
    pub fn from_parts(
        adds: BTreeMap<K, AddRecord<V>>,
        removes: BTreeMap<K, Timestamp>,
    ) -> Self {
        Self { adds, removes }
    }

    /// Split the replica into its add and remove maps.
    pub fn into_parts(self) -> (BTreeMap<K, AddRecord<V>>, BTreeMap<K, Timestamp>) {
        (self.adds, self.removes)
    }

    /// Add `value` under `key`, stamped with the current system time.
    ///
    /// This method requires the `std` feature. In `no_std` environments, use
    /// [`LWWDict::add_with_timestamp`] or [`LWWDict::add_with_clock`].
    #[cfg(feature = "std")]
    pub fn add(&mut self, key: K, value: V) {
        self.add_with_timestamp(key, value, Timestamp::now());
    }

    /// Add `value` under `key`, stamped by `clock`.
    pub fn add_with_clock(&mut self, key: K, value: V, clock: &mut impl Clock) {
        self.add_with_timestamp(key, value, clock.now());
    }

    /// Add `value` under `key` at an explicit timestamp.
    ///
    /// Replaces any previous add record for the key, whatever its
    /// timestamp. The caller is responsible for supplying timestamps that
    /// order sensibly against other replicas.
    pub fn add_with_timestamp(&mut self, key: K, value: V, timestamp: Timestamp) {
        trace!(%timestamp, "add");
        self.adds.insert(key, AddRecord::new(value, timestamp));
    }

    /// Remove `key`, stamped with the current system time.
    ///
    /// This method requires the `std` feature.
    #[cfg(feature = "std")]
    pub fn remove(&mut self, key: K) {
        self.remove_with_timestamp(key, Timestamp::now());
    }

    /// Remove `key`, stamped by `clock`.
    pub fn remove_with_clock(&mut self, key: K, clock: &mut impl Clock) {
        self.remove_with_timestamp(key, clock.now());
    }

    /// Remove `key` at an explicit timestamp.
    ///
    /// Replaces any previous remove record for the key. The key does not
    /// need to have been added; an early removal still shadows any add
    /// that is not later than it.
    pub fn remove_with_timestamp(&mut self, key: K, timestamp: Timestamp) {
        trace!(%timestamp, "remove");
        self.removes.insert(key, timestamp);
    }

    /// Change the value of `key`, stamped with the current system time.
    ///
    /// See [`LWWDict::update_with_timestamp`] for when this applies.
    /// This method requires the `std` feature.
    #[cfg(feature = "std")]
    pub fn update(&mut self, key: K, value: V) -> bool {
        self.update_with_timestamp(key, value, Timestamp::now())
    }

    /// Change the value of `key`, stamped by `clock`.
    ///
    /// The clock is only read when the update applies.
    pub fn update_with_clock(&mut self, key: K, value: V, clock: &mut impl Clock) -> bool {
        if !self.accepts_update(&key) {
            trace!(applied = false, "update");
            return false;
        }
        self.update_with_timestamp(key, value, clock.now())
    }

    /// Change the value of `key` at an explicit timestamp.
    ///
    /// Applies only when the key has an add record and has never been
    /// removed, whatever the remove timestamp was. Otherwise nothing
    /// changes: an update neither inserts a new key nor revives a removed
    /// one. Returns `true` if the update applied.
    pub fn update_with_timestamp(&mut self, key: K, value: V, timestamp: Timestamp) -> bool {
        let applied = self.accepts_update(&key);
        trace!(%timestamp, applied, "update");
        if applied {
            self.adds.insert(key, AddRecord::new(value, timestamp));
        }
        applied
    }

    pub(crate) fn accepts_update(&self, key: &K) -> bool {
        self.adds.contains_key(key) && !self.removes.contains_key(key)
    }

    /// Get the live value for `key`, or `None` if the key is not present.
    #[must_use]
    pub fn lookup(&self, key: &K) -> Option<&V> {
        let added = self.adds.get(key)?;
        match self.removes.get(key) {
            Some(removed) if added.timestamp < *removed => None,
            _ => Some(&added.value),
        }
    }

    /// Check whether `key` is present.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of present keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check whether no key is present.
    ///
    /// A dictionary can be empty and still hold tombstones.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterate over present keys and their values, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.adds.iter().filter_map(|(key, added)| {
            match self.removes.get(key) {
                Some(removed) if added.timestamp < *removed => None,
                _ => Some((key, &added.value)),
            }
        })
    }

    /// Iterate over present keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Iterate over present values, in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// The add record for `key`, whether or not the key is present.
    #[must_use]
    pub fn add_record(&self, key: &K) -> Option<&AddRecord<V>> {
        self.adds.get(key)
    }

    /// The remove timestamp for `key`, if it was ever removed.
    #[must_use]
    pub fn remove_timestamp(&self, key: &K) -> Option<Timestamp> {
        self.removes.get(key).copied()
    }

    /// All add records, including shadowed ones.
    #[must_use]
    pub fn adds(&self) -> &BTreeMap<K, AddRecord<V>> {
        &self.adds
    }

    /// All remove records.
    #[must_use]
    pub fn removes(&self) -> &BTreeMap<K, Timestamp> {
        &self.removes
    }

    /// Fold in one add record, keeping the later of the two.
    /// On a timestamp tie the incoming record wins.
    pub(crate) fn absorb_add(&mut self, key: &K, incoming: &AddRecord<V>) -> bool {
        match self.adds.get_mut(key) {
            Some(current) if current.timestamp > incoming.timestamp => false,
            Some(current) => {
                *current = incoming.clone();
                true
            }
            None => {
                self.adds.insert(key.clone(), incoming.clone());
                true
            }
        }
    }

    /// Fold in one remove record, keeping the later of the two.
    pub(crate) fn absorb_remove(&mut self, key: &K, incoming: Timestamp) -> bool {
        match self.removes.get_mut(key) {
            Some(current) if *current >= incoming => false,
            Some(current) => {
                *current = incoming;
                true
            }
            None => {
                self.removes.insert(key.clone(), incoming);
                true
            }
        }
    }

    fn absorb(
        &mut self,
        adds: &BTreeMap<K, AddRecord<V>>,
        removes: &BTreeMap<K, Timestamp>,
    ) -> (usize, usize) {
        let mut adds_changed = 0;
        for (key, incoming) in adds {
            if self.absorb_add(key, incoming) {
                adds_changed += 1;
            }
        }
        let mut removes_changed = 0;
        for (key, &incoming) in removes {
            if self.absorb_remove(key, incoming) {
                removes_changed += 1;
            }
        }
        (adds_changed, removes_changed)
    }
}

impl<K: Ord + Clone, V: Clone> Default for LWWDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Crdt for LWWDict<K, V> {
    fn merge(&mut self, other: &Self) {
        let (adds, removes) = self.absorb(&other.adds, &other.removes);
        debug!(adds, removes, "merged replica state");
    }
}

/// The records one [`LWWDict`] holds that another lacks.
///
/// Produced by [`DeltaCrdt::delta`] and consumed by
/// [`DeltaCrdt::apply_delta`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LWWDictDelta<K: Ord + Clone, V: Clone> {
    adds: BTreeMap<K, AddRecord<V>>,
    removes: BTreeMap<K, Timestamp>,
}

impl<K: Ord + Clone, V: Clone> LWWDictDelta<K, V> {
    /// Number of records carried.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adds.len() + self.removes.len()
    }

    /// Check whether the delta carries nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.removes.is_empty()
    }

    /// Add records carried by this delta.
    #[must_use]
    pub fn adds(&self) -> &BTreeMap<K, AddRecord<V>> {
        &self.adds
    }

    /// Remove records carried by this delta.
    #[must_use]
    pub fn removes(&self) -> &BTreeMap<K, Timestamp> {
        &self.removes
    }
}

impl<K: Ord + Clone, V: Clone + PartialEq> DeltaCrdt for LWWDict<K, V> {
    type Delta = LWWDictDelta<K, V>;

    fn delta(&self, other: &Self) -> LWWDictDelta<K, V> {
        // An equal-timestamp record with a different value still changes
        // `other`, since the incoming side wins add ties.
        let adds = self
            .adds
            .iter()
            .filter(|(key, ours)| match other.adds.get(*key) {
                Some(theirs) => {
                    ours.timestamp > theirs.timestamp
                        || (ours.timestamp == theirs.timestamp && ours.value != theirs.value)
                }
                None => true,
            })
            .map(|(key, ours)| (key.clone(), ours.clone()))
            .collect();

        let removes = self
            .removes
            .iter()
            .filter(|(key, ours)| other.removes.get(*key).map_or(true, |theirs| *ours > theirs))
            .map(|(key, &ours)| (key.clone(), ours))
            .collect();

        LWWDictDelta { adds, removes }
    }

    fn apply_delta(&mut self, delta: &LWWDictDelta<K, V>) {
        let (adds, removes) = self.absorb(&delta.adds, &delta.removes);
        debug!(adds, removes, "applied delta");
    }
}

impl<K: Ord + Clone, V: Clone> FromIterator<(K, V, Timestamp)> for LWWDict<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V, Timestamp)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

impl<K: Ord + Clone, V: Clone> Extend<(K, V, Timestamp)> for LWWDict<K, V> {
    fn extend<I: IntoIterator<Item = (K, V, Timestamp)>>(&mut self, iter: I) {
        for (key, value, timestamp) in iter {
            self.add_with_timestamp(key, value, timestamp);
        }
    }
}
