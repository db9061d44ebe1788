use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound of a quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Bound {
    Finite(u32),
    Infinite,
}

impl Bound {
    pub fn value(&self) -> Option<u32> {
        match self {
            Bound::Finite(n) => Some(*n),
            Bound::Infinite => None,
        }
    }

    /// Whether `count` does not exceed this bound.
    pub fn admits(&self, count: u32) -> bool {
        match self {
            Bound::Finite(n) => count <= *n,
            Bound::Infinite => true,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Finite(n) => write!(f, "{}", n),
            Bound::Infinite => write!(f, "∞"),
        }
    }
}

/// Repetition bounds `{min, max}`. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quantifier {
    pub min: u32,
    pub max: Bound,
}

impl Quantifier {
    pub const ONE: Quantifier = Quantifier {
        min: 1,
        max: Bound::Finite(1),
    };
    pub const ZERO_OR_ONE: Quantifier = Quantifier {
        min: 0,
        max: Bound::Finite(1),
    };
    pub const ZERO_OR_MORE: Quantifier = Quantifier {
        min: 0,
        max: Bound::Infinite,
    };
    pub const ONE_OR_MORE: Quantifier = Quantifier {
        min: 1,
        max: Bound::Infinite,
    };

    pub fn exactly(n: u32) -> Self {
        Self {
            min: n,
            max: Bound::Finite(n),
        }
    }

    pub fn at_least(min: u32) -> Self {
        Self {
            min,
            max: Bound::Infinite,
        }
    }

    /// `{min,max}`, or `None` when `min > max`.
    pub fn bounded(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self {
            min,
            max: Bound::Finite(max),
        })
    }

    pub fn is_default(&self) -> bool {
        *self == Self::ONE
    }

    pub fn is_optional(&self) -> bool {
        self.min == 0
    }

    /// Whether exactly `count` repetitions satisfy the bounds.
    pub fn allows(&self, count: u32) -> bool {
        count >= self.min && self.max.admits(count)
    }

    /// Whether another repetition may follow `count` repetitions.
    pub fn allows_more(&self, count: u32) -> bool {
        self.max.admits(count.saturating_add(1))
    }
}

impl Default for Quantifier {
    fn default() -> Self {
        Self::ONE
    }
}

/// Canonical suffix notation: `""`, `?`, `*`, `+`, `{n}`, `{n,}` or `{n,m}`.
impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (1, Bound::Finite(1)) => Ok(()),
            (0, Bound::Finite(1)) => write!(f, "?"),
            (0, Bound::Infinite) => write!(f, "*"),
            (1, Bound::Infinite) => write!(f, "+"),
            (min, Bound::Infinite) => write!(f, "{{{},}}", min),
            (min, Bound::Finite(max)) if min == max => write!(f, "{{{}}}", min),
            (min, Bound::Finite(max)) => write!(f, "{{{},{}}}", min, max),
        }
    }
}
