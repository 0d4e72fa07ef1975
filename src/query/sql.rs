//! SQL rendering of the hierarchical filter.
//!
//! The filter becomes a subquery over the reference table with one
//! hierarchy-table join per depth level, unrolled. The subquery selects
//! entity identifiers and is meant to be embedded as a membership test
//! (`entity_col IN (<subquery>)`) in a larger selection.
//!
//! All table and column identifiers are explicit parameters, validated at
//! construction; nothing is derived from shared query state.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::domain::{FilterSpec, HandlerOptions, MatchMode, TermId, Traversal};

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new("^[A-Za-z_][A-Za-z0-9_]*$").expect("valid pattern"))
}

fn validate_identifier(name: &str) -> Result<(), SqlError> {
    if identifier_pattern().is_match(name) {
        Ok(())
    } else {
        Err(SqlError::InvalidIdentifier(name.to_string()))
    }
}

/// Validates a column reference, optionally qualified with a table alias
/// (`entity_id` or `m.mid`).
fn validate_column_reference(reference: &str) -> Result<(), SqlError> {
    match reference.split_once('.') {
        Some((alias, column)) => {
            validate_identifier(alias)?;
            validate_identifier(column)
        }
        None => validate_identifier(reference),
    }
}

/// The physical identifiers the subquery is rendered against.
///
/// Only the reference table and its term column vary per deployment; the
/// hierarchy table and its columns default to the conventional names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    reference_table: String,
    reference_column: String,
    entity_column: String,
    hierarchy_table: String,
    term_column: String,
    parent_column: String,
}

impl TableNames {
    /// Creates table names for the given reference table and term column,
    /// with default names for everything else (`entity_id`,
    /// `taxonomy_term_hierarchy`, `tid`, `parent`).
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidIdentifier`] if either name is not a
    /// bare SQL identifier.
    pub fn new(reference_table: &str, reference_column: &str) -> Result<Self, SqlError> {
        validate_identifier(reference_table)?;
        validate_identifier(reference_column)?;
        Ok(Self {
            reference_table: reference_table.to_string(),
            reference_column: reference_column.to_string(),
            entity_column: "entity_id".to_string(),
            hierarchy_table: "taxonomy_term_hierarchy".to_string(),
            term_column: "tid".to_string(),
            parent_column: "parent".to_string(),
        })
    }

    /// Derives table names from validated handler options.
    ///
    /// Machine names only produce characters that are legal in
    /// identifiers, so this cannot fail.
    #[must_use]
    pub fn from_options(options: &HandlerOptions) -> Self {
        Self {
            reference_table: options.reference_table(),
            reference_column: options.reference_column(),
            entity_column: "entity_id".to_string(),
            hierarchy_table: "taxonomy_term_hierarchy".to_string(),
            term_column: "tid".to_string(),
            parent_column: "parent".to_string(),
        }
    }

    /// Overrides the entity identifier column of the reference table.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidIdentifier`] if the name is not a bare
    /// SQL identifier.
    pub fn with_entity_column(mut self, name: &str) -> Result<Self, SqlError> {
        validate_identifier(name)?;
        self.entity_column = name.to_string();
        Ok(self)
    }

    /// Overrides the hierarchy table and its (term, parent) columns.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidIdentifier`] if any name is not a bare
    /// SQL identifier.
    pub fn with_hierarchy(
        mut self,
        table: &str,
        term_column: &str,
        parent_column: &str,
    ) -> Result<Self, SqlError> {
        validate_identifier(table)?;
        validate_identifier(term_column)?;
        validate_identifier(parent_column)?;
        self.hierarchy_table = table.to_string();
        self.term_column = term_column.to_string();
        self.parent_column = parent_column.to_string();
        Ok(self)
    }
}

/// A rendered subquery with its positional parameters.
///
/// `sql` contains one `?` placeholder per element of `params`, in order.
/// The target terms repeat once per hierarchy level because the membership
/// condition is ORed in at every level, not just the last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFragment {
    sql: String,
    params: Vec<TermId>,
}

impl SqlFragment {
    /// The subquery text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind parameters, in placeholder order.
    #[must_use]
    pub fn params(&self) -> &[TermId] {
        &self.params
    }

    /// Renders the outer membership predicate the caller ANDs into its
    /// selection: `<entity_reference> IN (<subquery>)`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::InvalidIdentifier`] if `entity_reference` is
    /// not a column name, optionally qualified with a single alias.
    pub fn membership(&self, entity_reference: &str) -> Result<String, SqlError> {
        validate_column_reference(entity_reference)?;
        Ok(format!("{entity_reference} IN ({})", self.sql))
    }
}

/// Renders the hierarchical filter as an unrolled join-chain subquery.
///
/// The base condition matches direct references to a target term. Each
/// depth level adds one `LEFT JOIN` against the hierarchy table — walking
/// parent-ward for positive depth, child-ward for negative — and ORs in a
/// target-membership condition for that level. A reference at any
/// hierarchy distance up to `|depth|` therefore matches.
#[must_use]
pub fn build_subquery(tables: &TableNames, spec: &FilterSpec) -> SqlFragment {
    let targets: Vec<TermId> = spec.targets().iter().copied().collect();
    let operator = render_operator(spec.mode(), targets.len());

    let mut sql = format!(
        "SELECT t0.{} FROM {} AS t0",
        tables.entity_column, tables.reference_table
    );
    let mut conditions = vec![format!(
        "t0.{} {operator}",
        tables.reference_column
    )];
    let mut params = targets.clone();

    match spec.depth().traversal() {
        // Positive depth: the referenced term's ancestors are compared
        // against the targets, so entities tagged with a descendant of a
        // target match. h0 resolves the referenced term's own hierarchy
        // row; conditions start at h1.
        Some(Traversal::Descendants) => {
            sql.push_str(&format!(
                " LEFT JOIN {} AS h0 ON h0.{} = t0.{}",
                tables.hierarchy_table, tables.term_column, tables.reference_column
            ));
            let mut last = "h0".to_string();
            for level in 1..=spec.depth().levels() {
                let alias = format!("h{level}");
                sql.push_str(&format!(
                    " LEFT JOIN {} AS {alias} ON {last}.{} = {alias}.{}",
                    tables.hierarchy_table, tables.parent_column, tables.term_column
                ));
                conditions.push(format!("{alias}.{} {operator}", tables.term_column));
                params.extend_from_slice(&targets);
                last = alias;
            }
        }
        // Negative depth: the referenced term's descendants are compared
        // against the targets, so entities tagged with an ancestor of a
        // target match. The first join hangs directly off the reference
        // column.
        Some(Traversal::Ancestors) => {
            let mut last_term = format!("t0.{}", tables.reference_column);
            for level in 1..=spec.depth().levels() {
                let alias = format!("h{level}");
                sql.push_str(&format!(
                    " LEFT JOIN {} AS {alias} ON {alias}.{} = {last_term}",
                    tables.hierarchy_table, tables.parent_column
                ));
                conditions.push(format!("{alias}.{} {operator}", tables.term_column));
                params.extend_from_slice(&targets);
                last_term = format!("{alias}.{}", tables.term_column);
            }
        }
        None => {}
    }

    sql.push_str(" WHERE (");
    sql.push_str(&conditions.join(" OR "));
    sql.push(')');

    debug!(levels = spec.depth().levels(), params = params.len(), "rendered subquery");
    SqlFragment { sql, params }
}

fn render_operator(mode: MatchMode, count: usize) -> String {
    match mode {
        MatchMode::Single => "= ?".to_string(),
        MatchMode::AnyOf => {
            let placeholders = vec!["?"; count].join(", ");
            format!("IN ({placeholders})")
        }
    }
}

/// Errors detected while rendering SQL.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SqlError {
    /// A table or column name is not a legal SQL identifier.
    #[error("invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),
}
