//! Catalog-aware sanity checks on a freshly parsed graph.

pub mod rules;

use crate::catalog::ProcessCatalog;
use crate::error::CompileResult;
use crate::ir::ProcessGraph;

/// Run the graph-level rules in order and return the first violation.
pub fn validate_pipeline(graph: &ProcessGraph, catalog: &ProcessCatalog) -> CompileResult<()> {
    rules::s005_no_immediate_repetition(graph, catalog)
}
