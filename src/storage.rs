//! Read-only access to the data a filter evaluation needs.
//!
//! The filter owns no data: hierarchy edges, reference rows, and term
//! names all come from a backing store behind the [`TermSource`] seam.

mod reference;
mod source;

pub use reference::ReferenceIndex;
pub use source::{InMemorySource, NO_NAME_LABEL, StorageError, TermSource, display_label};
