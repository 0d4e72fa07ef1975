//! In-memory taxonomy hierarchy.
//!
//! The [`Taxonomy`] knows nothing about how terms are stored or what
//! entities reference them. It holds the hierarchy edge set — one edge per
//! (child, parent) row — and answers depth-bounded reachability questions
//! over it.

use std::collections::HashSet;

use petgraph::{Direction, graphmap::DiGraphMap};
use tracing::{debug, instrument};

use crate::domain::{Depth, TermId, Traversal};

/// The term hierarchy as an adjacency structure.
///
/// Nodes are term identifiers, edges point from child to parent. A term may
/// have any number of parents and children; diamonds and even cycles in
/// pathological data are tolerated (traversal tracks visited terms).
#[derive(Debug, Clone, Default)]
pub struct Taxonomy {
    /// Hierarchy graph. Edges point child → parent.
    graph: DiGraphMap<TermId, ()>,
}

impl Taxonomy {
    /// Creates an empty taxonomy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a taxonomy with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(terms: usize, edges: usize) -> Self {
        Self {
            graph: DiGraphMap::with_capacity(terms, edges),
        }
    }

    /// Builds a taxonomy from (child, parent) hierarchy rows.
    pub fn from_edges(edges: impl IntoIterator<Item = (TermId, TermId)>) -> Self {
        let mut taxonomy = Self::new();
        for (child, parent) in edges {
            taxonomy.add_edge(child, parent);
        }
        taxonomy
    }

    /// Registers a term with no relationships. Idempotent.
    pub fn add_term(&mut self, term: TermId) {
        self.graph.add_node(term);
    }

    /// Records that `parent` is a parent of `child`. Idempotent; both terms
    /// are created if missing.
    pub fn add_edge(&mut self, child: TermId, parent: TermId) {
        self.graph.add_edge(child, parent, ());
    }

    /// Whether the term appears in the hierarchy.
    #[must_use]
    pub fn contains(&self, term: TermId) -> bool {
        self.graph.contains_node(term)
    }

    /// Number of known terms.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of hierarchy edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Direct parents of a term.
    pub fn parents(&self, term: TermId) -> impl Iterator<Item = TermId> + '_ {
        // Outgoing edges point to parents
        if self.graph.contains_node(term) {
            Some(self.graph.neighbors_directed(term, Direction::Outgoing))
        } else {
            None
        }
        .into_iter()
        .flatten()
    }

    /// Direct children of a term.
    pub fn children(&self, term: TermId) -> impl Iterator<Item = TermId> + '_ {
        // Incoming edges are from children
        if self.graph.contains_node(term) {
            Some(self.graph.neighbors_directed(term, Direction::Incoming))
        } else {
            None
        }
        .into_iter()
        .flatten()
    }

    /// Widens a seed term set through the hierarchy, bounded by `depth`.
    ///
    /// Breadth-first expansion: positive depth collects descendants of the
    /// seeds, negative depth collects ancestors, zero returns the seeds
    /// unchanged. Terms reached at *every* level up to the bound are
    /// included — the depth is a ceiling, not an exact distance. Seeds
    /// absent from the hierarchy are retained (a direct reference to them
    /// still counts as a match).
    ///
    /// The walk stops early once a level produces no new terms, so an
    /// oversized depth costs nothing beyond the hierarchy's real depth.
    #[instrument(skip(self, seeds))]
    pub fn expand(&self, seeds: impl IntoIterator<Item = TermId>, depth: Depth) -> HashSet<TermId> {
        let mut matched: HashSet<TermId> = seeds.into_iter().collect();

        let Some(traversal) = depth.traversal() else {
            return matched;
        };

        let mut frontier: Vec<TermId> = matched.iter().copied().collect();
        let mut next = Vec::new();

        for level in 1..=depth.levels() {
            for term in frontier.drain(..) {
                match traversal {
                    Traversal::Descendants => {
                        for child in self.children(term) {
                            if matched.insert(child) {
                                next.push(child);
                            }
                        }
                    }
                    Traversal::Ancestors => {
                        for parent in self.parents(term) {
                            if matched.insert(parent) {
                                next.push(parent);
                            }
                        }
                    }
                }
            }

            if next.is_empty() {
                debug!(level, "expansion frontier exhausted");
                break;
            }
            std::mem::swap(&mut frontier, &mut next);
        }

        debug!(terms = matched.len(), "expansion complete");
        matched
    }
}
