//! Operation-based replication for event sourcing.
//!
//! Op-based CRDTs produce **operations** (events) that can be:
//! - Persisted as an append-only event log
//! - Broadcast to other replicas for synchronization
//! - Replayed to reconstruct state
//!
//! A [`DictOp`] is folded into an [`LWWDict`] with the same rules as a
//! state merge of a single record, so a log can be replayed in any order,
//! with duplicates, and still converge.
//!
//! # Example
//!
//! ```
//! use lww_dict::events::{DictOp, OpCrdt};
//! use lww_dict::prelude::*;
//!
//! let log = vec![
//!     DictOp::remove("k", Timestamp::from_secs(12)),
//!     DictOp::add("k", 20, Timestamp::from_secs(10)),
//!     DictOp::add("j", 7, Timestamp::from_secs(11)),
//! ];
//!
//! let mut replica = LWWDict::new();
//! for op in &log {
//!     replica.apply_op(op);
//! }
//! assert_eq!(replica.lookup(&"k"), None);
//! assert_eq!(replica.lookup(&"j"), Some(&7));
//! ```

use tracing::trace;

use crate::clock::Timestamp;
use crate::dict::AddRecord;
use crate::{Crdt, LWWDict};

/// A CRDT that can express its mutations as discrete operations.
///
/// Unlike state-based CRDTs (which merge full state), op-based CRDTs
/// exchange individual operations. Each operation is an event that
/// can be persisted, broadcast, and replayed.
pub trait OpCrdt: Crdt {
    /// The operation type this CRDT produces.
    type Op;

    /// Apply an operation to the current state.
    ///
    /// For convergence, `apply_op` must be commutative and idempotent.
    fn apply_op(&mut self, op: &Self::Op);
}

/// A single mutation of an [`LWWDict`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DictOp<K, V> {
    /// `value` was added under `key`.
    Add {
        /// Affected key.
        key: K,
        /// Added value.
        value: V,
        /// When the add happened.
        timestamp: Timestamp,
    },
    /// `key` was removed.
    Remove {
        /// Affected key.
        key: K,
        /// When the removal happened.
        timestamp: Timestamp,
    },
}

impl<K, V> DictOp<K, V> {
    /// An add of `value` under `key`.
    pub fn add(key: K, value: V, timestamp: Timestamp) -> Self {
        Self::Add {
            key,
            value,
            timestamp,
        }
    }

    /// A removal of `key`.
    pub fn remove(key: K, timestamp: Timestamp) -> Self {
        Self::Remove { key, timestamp }
    }

    /// The key this operation touches.
    pub fn key(&self) -> &K {
        match self {
            Self::Add { key, .. } | Self::Remove { key, .. } => key,
        }
    }

    /// When this operation happened.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Add { timestamp, .. } | Self::Remove { timestamp, .. } => *timestamp,
        }
    }
}

impl<K: Ord + Clone, V: Clone> LWWDict<K, V> {
    /// Turn an update into an operation, if the update would apply.
    ///
    /// Updates only apply to keys that were added and never removed (see
    /// [`LWWDict::update_with_timestamp`]); that check is local to this
    /// replica, so once it passes the update travels as a plain
    /// [`DictOp::Add`]. The replica itself is not modified.
    pub fn update_op(&self, key: K, value: V, timestamp: Timestamp) -> Option<DictOp<K, V>> {
        self.accepts_update(&key)
            .then(|| DictOp::add(key, value, timestamp))
    }
}

impl<K: Ord + Clone, V: Clone> OpCrdt for LWWDict<K, V> {
    type Op = DictOp<K, V>;

    fn apply_op(&mut self, op: &DictOp<K, V>) {
        let changed = match op {
            DictOp::Add {
                key,
                value,
                timestamp,
            } => self.absorb_add(key, &AddRecord::new(value.clone(), *timestamp)),
            DictOp::Remove { key, timestamp } => self.absorb_remove(key, *timestamp),
        };
        trace!(timestamp = %op.timestamp(), changed, "applied op");
    }
}
