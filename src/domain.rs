//! Domain models for hierarchical taxonomy filtering.
//!
//! This module contains the core domain types: term and entity
//! identifiers, the signed traversal depth, the filter specification, the
//! taxonomy hierarchy, and the handler configuration.

/// Raw request-value parsing.
pub mod argument;
pub use argument::{ArgumentError, parse_term_values};

mod config;
pub use config::{HandlerOptions, InvalidMachineNameError, MachineName, OptionsError};

mod depth;
pub use depth::{Depth, Traversal};

/// Filter specification and empty-value policy.
pub mod spec;
pub use spec::{EmptyPolicy, FilterSpec, MatchMode, ResolvedFilter, SpecError};

/// Taxonomy hierarchy graph and depth-bounded expansion.
pub mod taxonomy;
pub use taxonomy::Taxonomy;

mod term;
pub use term::{EntityId, ParseTermIdError, TermId};
