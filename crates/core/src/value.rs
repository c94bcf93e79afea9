//! Value bound for tracked cells

use std::fmt::Debug;

/// Types a `StateCell` may hold
///
/// A value must support equality (so no-op writes can be skipped) and
/// cheap whole-value snapshots (`Clone`). Container-typed state uses
/// persistent collections so that a snapshot shares structure with its
/// predecessor instead of copying it.
///
/// Blanket-implemented for every qualifying type; there is nothing to
/// implement by hand.
pub trait StateValue: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T> StateValue for T where T: Clone + PartialEq + Debug + Send + Sync + 'static {}
