//! Hierarchical taxonomy filtering for entity listings.
//!
//! Given a set of target term identifiers, a signed depth, and a
//! description of an entity→term reference table, this crate produces a
//! predicate over entity identifiers: "this entity references one of the
//! target terms, or a term within `depth` hierarchy levels of one".
//! Positive depth widens matching to descendants of the targets, negative
//! depth to ancestors, and the magnitude is always a ceiling — a match at
//! any level up to the bound counts.
//!
//! The predicate is available as a parameterized SQL subquery
//! ([`query::sql`]) or as an in-memory matcher over loaded hierarchy and
//! reference data ([`query::matcher`]); the two are equivalent.

pub mod domain;
pub use domain::{
    Depth, EmptyPolicy, EntityId, FilterSpec, HandlerOptions, MachineName, MatchMode,
    ResolvedFilter, Taxonomy, TermId, Traversal, parse_term_values,
};

pub mod query;
pub use query::{Selection, SqlFragment, TableNames, build_subquery, evaluate, matching_entities};

/// Read-only access to hierarchy, reference, and term-name data.
pub mod storage;
pub use storage::{InMemorySource, ReferenceIndex, StorageError, TermSource};
