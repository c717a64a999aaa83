//! Sanity rules (S002, S005). Syntax rules S001, S003 and S004 live in the
//! parser because they are decided token by token.

use crate::catalog::ProcessCatalog;
use crate::error::{CompileResult, CompilerError};
use crate::ir::ProcessGraph;

/// Every name must exist in the catalog. Checked as each name is read.
pub fn s002_known_process(catalog: &ProcessCatalog, name: &str) -> CompileResult<()> {
    if catalog.contains(name) {
        return Ok(());
    }
    Err(CompilerError::validate(
        "S002",
        format!("Unknown process '{name}'"),
        Some(name.to_string()),
    ))
}

/// A non-repeatable process may not feed directly into itself, whether inside
/// a lane or across a stage boundary.
pub fn s005_no_immediate_repetition(
    graph: &ProcessGraph,
    catalog: &ProcessCatalog,
) -> CompileResult<()> {
    for edge in graph.edges() {
        if edge.producer.name != edge.consumer.name {
            continue;
        }
        let repeatable = catalog
            .lookup(&edge.producer.name)
            .is_some_and(|m| m.repeatable);
        if !repeatable {
            return Err(CompilerError::validate(
                "S005",
                format!(
                    "Process '{}' cannot directly follow itself ('{}' → '{}')",
                    edge.producer.name,
                    edge.producer.id(),
                    edge.consumer.id()
                ),
                Some(edge.producer.name.clone()),
            ));
        }
    }
    Ok(())
}
