/// Core trait for state-based CRDTs.
///
/// A CRDT (Conflict-free Replicated Data Type) guarantees that concurrent
/// updates on different replicas will converge to the same state after merging,
/// without requiring coordination.
///
/// # Properties
///
/// All implementations must satisfy:
/// - **Commutativity:** `a.merge(b) == b.merge(a)`
/// - **Associativity:** `a.merge(b.merge(c)) == a.merge(b).merge(c)`
/// - **Idempotency:** `a.merge(a) == a`
///
/// Implementations may document a deterministic tie-break that makes
/// commutativity hold only up to equal-timestamp conflicts.
pub trait Crdt {
    /// Merge another replica's state into this one.
    ///
    /// After merging, `self` contains the least upper bound of both states.
    fn merge(&mut self, other: &Self);

    /// Return the merge of `self` and `other` as a new value.
    ///
    /// Neither input is modified. Prefer this form when replica snapshots
    /// are shared, so a merge can never alias a state someone else holds.
    #[must_use]
    fn merged(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}

/// Extension trait for delta-state CRDTs.
///
/// Delta-state CRDTs can produce compact deltas representing only the
/// changes between two states. Instead of transferring the full state,
/// replicas exchange small deltas.
///
/// # Example
///
/// ```
/// use lww_dict::prelude::*;
///
/// let mut a = LWWDict::new();
/// a.add_with_timestamp("k", 1, Timestamp::from_secs(10));
/// a.add_with_timestamp("j", 2, Timestamp::from_secs(10));
///
/// let mut b = LWWDict::new();
/// b.add_with_timestamp("j", 2, Timestamp::from_secs(10));
///
/// // Only "k" is news to b
/// let delta = a.delta(&b);
/// assert_eq!(delta.len(), 1);
///
/// b.apply_delta(&delta);
/// assert_eq!(a, b);
/// ```
pub trait DeltaCrdt: Crdt {
    /// The type of delta produced by this CRDT.
    type Delta;

    /// Generate a delta containing changes in `self` that `other` does not have.
    ///
    /// The returned delta is the minimal set of information needed to bring
    /// a replica at state `other` up to date with `self`.
    fn delta(&self, other: &Self) -> Self::Delta;

    /// Apply a delta to this replica's state.
    ///
    /// This is equivalent to merging the state that produced the delta.
    fn apply_delta(&mut self, delta: &Self::Delta);
}
