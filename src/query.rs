//! The two output surfaces of the filter: a composable SQL subquery and an
//! in-memory matcher. Both implement the same semantics; see the module
//! docs for which to reach for.

/// In-memory evaluation.
pub mod matcher;
pub use matcher::{Matcher, Selection, evaluate, matching_entities};

/// SQL subquery rendering.
pub mod sql;
pub use sql::{SqlError, SqlFragment, TableNames, build_subquery};
