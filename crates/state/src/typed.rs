//! Scalar cell aliases
//!
//! Game entities mostly track flags, counters and labels. These aliases
//! name the common cases and add the obvious helpers; every helper is a
//! whole-value replacement through [`StateCell::update`].

use crate::cell::StateCell;
use railstate_core::{StateError, StateResult};

/// A tracked flag (company floated, private closed)
pub type BooleanState = StateCell<bool>;

/// A tracked counter (cash, step number, share price index)
pub type IntegerState = StateCell<i64>;

/// A tracked label (par slot marker, last train bought)
pub type StringState = StateCell<String>;

impl StateCell<bool> {
    /// Flip the flag; always records a change
    pub fn toggle(&self) -> StateResult<bool> {
        self.update(|v| !v)
    }
}

impl StateCell<i64> {
    /// Add `delta` (which may be negative)
    ///
    /// Adding zero records nothing.
    ///
    /// # Errors
    ///
    /// Returns `Overflow` if the sum leaves the `i64` range; the value is
    /// left untouched and nothing is recorded.
    pub fn add(&self, delta: i64) -> StateResult<bool> {
        self.try_update(|v| {
            v.checked_add(delta).ok_or_else(|| StateError::Overflow {
                state: self.key().clone(),
            })
        })
    }
}

impl StateCell<String> {
    /// Append `text` to the current value
    pub fn append(&self, text: &str) -> StateResult<bool> {
        self.update(|v| {
            let mut next = v.clone();
            next.push_str(text);
            next
        })
    }
}
