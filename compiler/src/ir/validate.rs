//! Resolved-graph invariant validation.
//!
//! Runs between dependency resolution and codegen. Anything reported here
//! means the parser or resolver let a broken graph through, so callers turn
//! these into internal errors rather than user-facing sanity errors.

use std::collections::HashSet;

use crate::catalog::ProcessCatalog;
use crate::ir::types::*;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
    /// Identifier of the offending occurrence, if applicable.
    pub process_id: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.process_id {
            Some(id) => write!(f, "[{}] {} (at process '{}')", self.code, self.message, id),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// Validate a resolved graph against all invariants. Returns all errors found.
pub fn validate_resolved(graph: &ProcessGraph, catalog: &ProcessCatalog) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_non_empty(graph, &mut errors);
    validate_unique_ids(graph, &mut errors);
    validate_known_processes(graph, catalog, &mut errors);
    validate_adjacent_types(graph, catalog, &mut errors);

    errors
}

// ---------------------------------------------------------------------------
// Invariant: at least one stage, and no empty stage or lane
// ---------------------------------------------------------------------------

fn validate_non_empty(graph: &ProcessGraph, errors: &mut Vec<ValidationError>) {
    if graph.stages.is_empty() {
        errors.push(ValidationError {
            code: "G001",
            message: "Graph must contain at least one stage".into(),
            process_id: None,
        });
    }
    for (i, stage) in graph.stages.iter().enumerate() {
        if stage.lanes.is_empty() {
            errors.push(ValidationError {
                code: "G002",
                message: format!("Stage {} has no lanes", i + 1),
                process_id: None,
            });
        }
        for (l, lane) in stage.lanes.iter().enumerate() {
            if lane.processes.is_empty() {
                errors.push(ValidationError {
                    code: "G002",
                    message: format!("Lane {} of stage {} has no processes", l + 1, i + 1),
                    process_id: None,
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: occurrence identifiers are unique
// ---------------------------------------------------------------------------

fn validate_unique_ids(graph: &ProcessGraph, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for process in graph.processes() {
        let id = process.id();
        if !seen.insert(id.clone()) {
            errors.push(ValidationError {
                code: "G003",
                message: format!("Duplicate process identifier '{id}'"),
                process_id: Some(id),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: every occurrence names a catalog entry
// ---------------------------------------------------------------------------

fn validate_known_processes(
    graph: &ProcessGraph,
    catalog: &ProcessCatalog,
    errors: &mut Vec<ValidationError>,
) {
    for process in graph.processes() {
        if !catalog.contains(&process.name) {
            errors.push(ValidationError {
                code: "G004",
                message: format!("Process '{}' is not in the catalog", process.name),
                process_id: Some(process.id()),
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant: every producer output is accepted by its consumer
// ---------------------------------------------------------------------------

fn validate_adjacent_types(
    graph: &ProcessGraph,
    catalog: &ProcessCatalog,
    errors: &mut Vec<ValidationError>,
) {
    for edge in graph.edges() {
        let (Some(producer), Some(consumer)) = (
            catalog.lookup(&edge.producer.name),
            catalog.lookup(&edge.consumer.name),
        ) else {
            // Reported by G004.
            continue;
        };
        if !consumer.accepts(&producer.output) {
            errors.push(ValidationError {
                code: "G005",
                message: format!(
                    "'{}' emits {} but '{}' accepts {}",
                    edge.producer.id(),
                    producer.output,
                    edge.consumer.id(),
                    consumer.input.join("/")
                ),
                process_id: Some(edge.consumer.id()),
            });
        }
    }
}
