//! Value-count bounds for arguments.

use serde::{Deserialize, Serialize};

/// Minimum and maximum number of values a symbol accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Arity {
    pub min: usize,
    pub max: usize,
}

impl Arity {
    /// Upper bound used for "any number of values".
    pub const MANY: usize = usize::MAX;

    pub const ZERO: Arity = Arity { min: 0, max: 0 };
    pub const ZERO_OR_ONE: Arity = Arity { min: 0, max: 1 };
    pub const EXACTLY_ONE: Arity = Arity { min: 1, max: 1 };
    pub const ZERO_OR_MORE: Arity = Arity {
        min: 0,
        max: Self::MANY,
    };
    pub const ONE_OR_MORE: Arity = Arity {
        min: 1,
        max: Self::MANY,
    };

    /// Bounds are clamped so that `max >= min`.
    pub fn new(min: usize, max: usize) -> Self {
        Self {
            min,
            max: max.max(min),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == Self::MANY
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

impl Default for Arity {
    fn default() -> Self {
        Self::EXACTLY_ONE
    }
}
