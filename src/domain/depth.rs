use serde::{Deserialize, Serialize};

/// Signed bound on how far a hierarchy walk may travel from the target
/// terms.
///
/// - `0`: only direct references to a target term match.
/// - positive: references to *descendants* of a target term match, up to
///   this many child-links away.
/// - negative: references to *ancestors* of a target term match, up to
///   `|depth|` parent-links away.
///
/// The magnitude is a ceiling, not an exact distance: a reference at any
/// hierarchy distance `k <= |depth|` from a target matches.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Depth(i32);

impl Depth {
    /// Exact matching only: no hierarchy traversal.
    pub const ZERO: Self = Self(0);

    /// Wraps a signed depth value.
    #[must_use]
    pub const fn new(levels: i32) -> Self {
        Self(levels)
    }

    /// Returns the signed depth value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Number of hierarchy levels the walk may descend or ascend.
    #[must_use]
    pub const fn levels(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Direction of the walk, or `None` when the depth is zero.
    #[must_use]
    pub const fn traversal(self) -> Option<Traversal> {
        if self.0 > 0 {
            Some(Traversal::Descendants)
        } else if self.0 < 0 {
            Some(Traversal::Ancestors)
        } else {
            None
        }
    }
}

impl From<i32> for Depth {
    fn from(levels: i32) -> Self {
        Self(levels)
    }
}

/// Direction a depth-bounded walk moves through the hierarchy, relative to
/// the target terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    /// Widen the target set to include descendant terms (positive depth).
    ///
    /// Filtering for "fruit" at depth 1 also matches entities tagged
    /// "apple" when apple's parent is fruit.
    Descendants,
    /// Widen the target set to include ancestor terms (negative depth).
    ///
    /// Filtering for "apple" at depth -1 also matches entities tagged
    /// "fruit".
    Ancestors,
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(0, None; "zero has no traversal")]
    #[test_case(1, Some(Traversal::Descendants); "one walks to descendants")]
    #[test_case(5, Some(Traversal::Descendants); "five walks to descendants")]
    #[test_case(-1, Some(Traversal::Ancestors); "minus one walks to ancestors")]
    #[test_case(-5, Some(Traversal::Ancestors); "minus five walks to ancestors")]
    fn traversal_follows_sign(levels: i32, expected: Option<Traversal>) {
        assert_eq!(Depth::new(levels).traversal(), expected);
    }

    #[test_case(0, 0; "zero")]
    #[test_case(3, 3; "positive three")]
    #[test_case(-3, 3; "negative three")]
    #[test_case(i32::MIN, 2_147_483_648; "i32 min")]
    fn levels_is_magnitude(levels: i32, expected: u32) {
        assert_eq!(Depth::new(levels).levels(), expected);
    }

    #[test]
    fn zero_is_default() {
        assert_eq!(Depth::default(), Depth::ZERO);
    }
}
