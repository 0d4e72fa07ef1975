use std::collections::{BTreeSet, HashSet};

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::domain::{EntityId, TermId};

/// A loaded set of entity→term reference rows.
///
/// One row per tagging of an entity with a term; an entity may appear in
/// any number of rows. The index is read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceIndex {
    rows: Vec<(EntityId, TermId)>,
}

impl ReferenceIndex {
    /// Creates an empty index.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Builds an index from reference rows.
    pub fn from_rows(rows: impl IntoIterator<Item = (EntityId, TermId)>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
        }
    }

    /// Appends a reference row.
    pub fn push(&mut self, entity: EntityId, term: TermId) {
        self.rows.push((entity, term));
    }

    /// Number of reference rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the index holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over all reference rows.
    pub fn rows(&self) -> impl Iterator<Item = (EntityId, TermId)> + '_ {
        self.rows.iter().copied()
    }

    /// Terms referenced by the given entity.
    pub fn terms_for(&self, entity: EntityId) -> impl Iterator<Item = TermId> + '_ {
        self.rows
            .iter()
            .filter(move |(e, _)| *e == entity)
            .map(|(_, t)| *t)
    }

    /// Distinct entities referencing any of the given terms.
    #[must_use]
    pub fn entities_referencing(&self, terms: &HashSet<TermId>) -> BTreeSet<EntityId> {
        self.rows
            .par_iter()
            .filter(|(_, term)| terms.contains(term))
            .map(|(entity, _)| *entity)
            .collect()
    }
}

impl FromIterator<(EntityId, TermId)> for ReferenceIndex {
    fn from_iter<I: IntoIterator<Item = (EntityId, TermId)>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eid(raw: u64) -> EntityId {
        EntityId::new(raw)
    }

    fn tid(raw: u64) -> TermId {
        TermId::new(raw)
    }

    #[test]
    fn finds_distinct_entities_for_term_set() {
        let index = ReferenceIndex::from_rows([
            (eid(1), tid(10)),
            (eid(1), tid(11)),
            (eid(2), tid(11)),
            (eid(3), tid(12)),
        ]);

        let matched = index.entities_referencing(&HashSet::from([tid(11)]));
        assert_eq!(matched, BTreeSet::from([eid(1), eid(2)]));
    }

    #[test]
    fn entity_matching_several_terms_appears_once() {
        let index = ReferenceIndex::from_rows([(eid(1), tid(10)), (eid(1), tid(11))]);

        let matched = index.entities_referencing(&HashSet::from([tid(10), tid(11)]));
        assert_eq!(matched, BTreeSet::from([eid(1)]));
    }

    #[test]
    fn empty_term_set_matches_nothing() {
        let index = ReferenceIndex::from_rows([(eid(1), tid(10))]);
        assert!(index.entities_referencing(&HashSet::new()).is_empty());
    }

    #[test]
    fn lists_terms_for_an_entity() {
        let index = ReferenceIndex::from_rows([
            (eid(1), tid(10)),
            (eid(2), tid(11)),
            (eid(1), tid(12)),
        ]);

        let mut terms: Vec<_> = index.terms_for(eid(1)).collect();
        terms.sort_unstable();
        assert_eq!(terms, vec![tid(10), tid(12)]);
        assert_eq!(index.terms_for(eid(9)).count(), 0);
    }
}
