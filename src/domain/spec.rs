use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::domain::{Depth, TermId};

/// How multiple target terms combine.
///
/// Matching is always a logical OR across target terms — an entity
/// reference points at a single term, so requiring two different terms of
/// one column is unsatisfiable. The mode only selects the query operator
/// (`=` vs `IN`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Exactly one target term; rendered as an equality test.
    Single,
    /// One or more target terms; rendered as a set-membership test.
    AnyOf,
}

/// Policy applied when the request supplies zero filter values.
///
/// The original system's two handlers silently diverged here: one skipped
/// filtering entirely, the other produced no result. Callers must pick a
/// policy explicitly; zero values is never an error and never a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPolicy {
    /// Skip filtering: every entity matches.
    MatchAll,
    /// Degenerate filter: no entity matches.
    MatchNone,
}

/// A validated filter configuration: non-empty target terms, a signed
/// depth, and a match mode.
///
/// Construction is the only validation point; a `FilterSpec` in hand is
/// always evaluable. The component is stateless — build one per
/// evaluation and discard it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    targets: NonEmpty<TermId>,
    depth: Depth,
    mode: MatchMode,
}

impl FilterSpec {
    /// Creates a filter spec with an explicit match mode.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError::SingleModeRequiresOneTarget`] when
    /// [`MatchMode::Single`] is combined with more than one target.
    pub fn new(
        targets: NonEmpty<TermId>,
        depth: Depth,
        mode: MatchMode,
    ) -> Result<Self, SpecError> {
        if mode == MatchMode::Single && targets.len() > 1 {
            return Err(SpecError::SingleModeRequiresOneTarget {
                count: targets.len(),
            });
        }
        Ok(Self {
            targets,
            depth,
            mode,
        })
    }

    /// Creates a filter spec, deriving the match mode from the number of
    /// targets the way the original handlers did (`=` for one value, `IN`
    /// for several).
    #[must_use]
    pub fn any_of(targets: NonEmpty<TermId>, depth: Depth) -> Self {
        let mode = if targets.len() == 1 {
            MatchMode::Single
        } else {
            MatchMode::AnyOf
        };
        Self {
            targets,
            depth,
            mode,
        }
    }

    /// The target terms. Guaranteed non-empty.
    #[must_use]
    pub const fn targets(&self) -> &NonEmpty<TermId> {
        &self.targets
    }

    /// The signed traversal bound.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// The match mode.
    #[must_use]
    pub const fn mode(&self) -> MatchMode {
        self.mode
    }
}

/// A filter resolved from raw request values and an [`EmptyPolicy`].
///
/// Separates the "no values supplied" outcomes from a concrete,
/// evaluable spec so downstream code can never forget the empty case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFilter {
    /// No filtering is applied; every entity matches.
    MatchAll,
    /// No entity matches.
    MatchNone,
    /// A concrete filter to evaluate.
    Filtered(FilterSpec),
}

impl ResolvedFilter {
    /// Resolves raw term values into a filter.
    ///
    /// Duplicate values are collapsed. An empty slice resolves to the
    /// supplied policy's variant; otherwise the result is a
    /// [`FilterSpec`] with the mode derived from the value count.
    #[must_use]
    pub fn from_values(values: &[TermId], depth: Depth, policy: EmptyPolicy) -> Self {
        let mut deduped: Vec<TermId> = Vec::with_capacity(values.len());
        for &value in values {
            if !deduped.contains(&value) {
                deduped.push(value);
            }
        }

        NonEmpty::from_vec(deduped).map_or_else(
            || match policy {
                EmptyPolicy::MatchAll => Self::MatchAll,
                EmptyPolicy::MatchNone => Self::MatchNone,
            },
            |targets| Self::Filtered(FilterSpec::any_of(targets, depth)),
        )
    }
}

/// Errors detected when constructing a filter spec.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SpecError {
    /// [`MatchMode::Single`] was combined with several target terms.
    #[error("single match mode requires exactly one target term, got {count}")]
    SingleModeRequiresOneTarget {
        /// Number of targets supplied.
        count: usize,
    },
}

#[cfg(test)]
mod tests {
    use nonempty::nonempty;

    use super::*;

    #[test]
    fn single_mode_rejects_multiple_targets() {
        let err = FilterSpec::new(
            nonempty![TermId::new(1), TermId::new(2)],
            Depth::ZERO,
            MatchMode::Single,
        )
        .unwrap_err();
        assert_eq!(err, SpecError::SingleModeRequiresOneTarget { count: 2 });
    }

    #[test]
    fn any_of_derives_mode_from_target_count() {
        let one = FilterSpec::any_of(nonempty![TermId::new(1)], Depth::ZERO);
        assert_eq!(one.mode(), MatchMode::Single);

        let two = FilterSpec::any_of(nonempty![TermId::new(1), TermId::new(2)], Depth::ZERO);
        assert_eq!(two.mode(), MatchMode::AnyOf);
    }

    #[test]
    fn empty_values_follow_policy() {
        assert_eq!(
            ResolvedFilter::from_values(&[], Depth::ZERO, EmptyPolicy::MatchAll),
            ResolvedFilter::MatchAll
        );
        assert_eq!(
            ResolvedFilter::from_values(&[], Depth::ZERO, EmptyPolicy::MatchNone),
            ResolvedFilter::MatchNone
        );
    }

    #[test]
    fn resolved_filter_deduplicates_values() {
        let values = [TermId::new(3), TermId::new(3), TermId::new(5)];
        let ResolvedFilter::Filtered(spec) =
            ResolvedFilter::from_values(&values, Depth::new(1), EmptyPolicy::MatchNone)
        else {
            panic!("expected a concrete filter");
        };
        assert_eq!(
            spec.targets().clone().into_iter().collect::<Vec<_>>(),
            vec![TermId::new(3), TermId::new(5)]
        );
        assert_eq!(spec.mode(), MatchMode::AnyOf);
        assert_eq!(spec.depth(), Depth::new(1));
    }
}
