use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

use crate::{
    domain::{Taxonomy, TermId},
    storage::ReferenceIndex,
};

/// Fallback label used when a term's name cannot be resolved.
pub const NO_NAME_LABEL: &str = "No name";

/// Errors raised by a backing term store.
///
/// Storage failures are hard failures of the current evaluation: they are
/// propagated to the caller without retries or partial results.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing data store could not be reached.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
    /// The backing data store returned malformed data.
    #[error("backing store returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only source of hierarchy edges, reference rows, and term names.
///
/// The library ships [`InMemorySource`]; callers backed by a database
/// implement this trait and surface transport failures as
/// [`StorageError::Unavailable`].
pub trait TermSource {
    /// Loads the full hierarchy edge set.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot supply the
    /// hierarchy.
    fn hierarchy(&self) -> Result<Taxonomy, StorageError>;

    /// Loads the entity→term reference rows.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot supply the
    /// reference rows.
    fn references(&self) -> Result<ReferenceIndex, StorageError>;

    /// Resolves a term's display name. `Ok(None)` means the term does not
    /// exist; that is not a storage failure.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing store cannot be
    /// queried.
    fn term_name(&self, term: TermId) -> Result<Option<String>, StorageError>;
}

/// Resolves the display label for an active filter value.
///
/// An unresolvable term is recovered locally by substituting
/// [`NO_NAME_LABEL`]; only storage failures propagate.
///
/// # Errors
///
/// Returns a [`StorageError`] when the source cannot be queried.
pub fn display_label<S: TermSource + ?Sized>(
    source: &S,
    term: TermId,
) -> Result<String, StorageError> {
    Ok(source.term_name(term)?.unwrap_or_else(|| {
        warn!(%term, "term has no resolvable name");
        NO_NAME_LABEL.to_string()
    }))
}

/// A [`TermSource`] over data already loaded into memory.
///
/// Never unavailable; useful for tests and for callers that materialize
/// their hierarchy and reference rows up front.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    taxonomy: Taxonomy,
    references: ReferenceIndex,
    names: HashMap<TermId, String>,
}

impl InMemorySource {
    /// Creates a source over the given hierarchy and reference rows.
    #[must_use]
    pub fn new(taxonomy: Taxonomy, references: ReferenceIndex) -> Self {
        Self {
            taxonomy,
            references,
            names: HashMap::new(),
        }
    }

    /// Registers a display name for a term.
    pub fn set_term_name(&mut self, term: TermId, name: impl Into<String>) {
        self.names.insert(term, name.into());
    }
}

impl TermSource for InMemorySource {
    fn hierarchy(&self) -> Result<Taxonomy, StorageError> {
        Ok(self.taxonomy.clone())
    }

    fn references(&self) -> Result<ReferenceIndex, StorageError> {
        Ok(self.references.clone())
    }

    fn term_name(&self, term: TermId) -> Result<Option<String>, StorageError> {
        Ok(self.names.get(&term).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_registered_term_name() {
        let mut source = InMemorySource::default();
        source.set_term_name(TermId::new(1), "fruit");

        assert_eq!(display_label(&source, TermId::new(1)).unwrap(), "fruit");
    }

    #[test]
    fn unresolved_term_falls_back_to_no_name() {
        let source = InMemorySource::default();

        assert_eq!(
            display_label(&source, TermId::new(7)).unwrap(),
            NO_NAME_LABEL
        );
    }

    #[test]
    fn storage_failure_propagates_from_label_lookup() {
        struct Broken;

        impl TermSource for Broken {
            fn hierarchy(&self) -> Result<Taxonomy, StorageError> {
                Err(StorageError::Unavailable("connection refused".to_string()))
            }

            fn references(&self) -> Result<ReferenceIndex, StorageError> {
                Err(StorageError::Unavailable("connection refused".to_string()))
            }

            fn term_name(&self, _term: TermId) -> Result<Option<String>, StorageError> {
                Err(StorageError::Unavailable("connection refused".to_string()))
            }
        }

        assert!(matches!(
            display_label(&Broken, TermId::new(1)),
            Err(StorageError::Unavailable(_))
        ));
    }
}
