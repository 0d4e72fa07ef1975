//! In-memory evaluation of the hierarchical filter.
//!
//! Equivalent to the SQL rendering in [`crate::query::sql`]: the target
//! term set is widened through the taxonomy graph by a depth-bounded
//! breadth-first walk, then the reference rows are scanned for membership.

use std::collections::{BTreeSet, HashSet};

use tracing::instrument;

use crate::{
    domain::{EntityId, FilterSpec, ResolvedFilter, Taxonomy, TermId},
    storage::{ReferenceIndex, StorageError, TermSource},
};

/// The entities selected by a resolved filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Filtering was skipped; every entity matches.
    All,
    /// No entity matches.
    None,
    /// The distinct entities matching the filter.
    Entities(BTreeSet<EntityId>),
}

impl Selection {
    /// Whether the given entity is in the selection.
    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        match self {
            Self::All => true,
            Self::None => false,
            Self::Entities(entities) => entities.contains(&entity),
        }
    }
}

/// A per-evaluation matcher over loaded data.
///
/// Holds the widened term set so repeated membership tests do not repeat
/// the hierarchy walk. Build one per filter evaluation and discard it.
#[derive(Debug)]
pub struct Matcher<'a> {
    references: &'a ReferenceIndex,
    expanded: HashSet<TermId>,
}

impl<'a> Matcher<'a> {
    /// Expands the filter's targets through the taxonomy and prepares a
    /// matcher over the given reference rows.
    #[must_use]
    pub fn new(taxonomy: &Taxonomy, references: &'a ReferenceIndex, spec: &FilterSpec) -> Self {
        let expanded = taxonomy.expand(spec.targets().iter().copied(), spec.depth());
        Self {
            references,
            expanded,
        }
    }

    /// The widened term set the filter matches against.
    #[must_use]
    pub const fn expanded_terms(&self) -> &HashSet<TermId> {
        &self.expanded
    }

    /// Whether the entity references any matching term.
    #[must_use]
    pub fn matches(&self, entity: EntityId) -> bool {
        self.references
            .terms_for(entity)
            .any(|term| self.expanded.contains(&term))
    }

    /// All distinct matching entities.
    #[must_use]
    pub fn entities(&self) -> BTreeSet<EntityId> {
        self.references.entities_referencing(&self.expanded)
    }
}

/// Evaluates a filter spec against loaded hierarchy and reference data.
#[instrument(skip(taxonomy, references, spec))]
#[must_use]
pub fn matching_entities(
    taxonomy: &Taxonomy,
    references: &ReferenceIndex,
    spec: &FilterSpec,
) -> BTreeSet<EntityId> {
    Matcher::new(taxonomy, references, spec).entities()
}

/// Evaluates a resolved filter against a backing store.
///
/// Loads the hierarchy and reference rows from the source and runs the
/// matcher. The load happens once per evaluation; nothing is cached.
///
/// # Errors
///
/// Propagates any [`StorageError`] from the source unretried. The
/// degenerate [`ResolvedFilter::MatchAll`]/[`ResolvedFilter::MatchNone`]
/// variants do not touch the store.
pub fn evaluate<S: TermSource + ?Sized>(
    source: &S,
    filter: &ResolvedFilter,
) -> Result<Selection, StorageError> {
    match filter {
        ResolvedFilter::MatchAll => Ok(Selection::All),
        ResolvedFilter::MatchNone => Ok(Selection::None),
        ResolvedFilter::Filtered(spec) => {
            let taxonomy = source.hierarchy()?;
            let references = source.references()?;
            Ok(Selection::Entities(matching_entities(
                &taxonomy,
                &references,
                spec,
            )))
        }
    }
}
