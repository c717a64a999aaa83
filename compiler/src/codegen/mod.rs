//! Codegen pass: resolved `ProcessGraph` → Nextflow script.
//!
//! Public API: `codegen(graph, catalog, name) -> GeneratedScript`
//!
//! Output is a pure function of its inputs. Sections appear in a fixed order:
//! header and params, one block per process, then the named workflow that
//! wires every process call, and the entry workflow.

mod header;
mod output;
mod process;
mod wiring;
mod workflow;
mod writer;

pub use output::write_script;
pub use workflow::dependency_order;

use tracing::debug;

use crate::catalog::{ProcessCatalog, ProcessMetadata};
use crate::error::{CompileResult, CompilerError, Phase};
use crate::ir::types::*;
use crate::ir::validate_resolved;
use writer::CodeWriter;

/// A generated script and the identifier its workflow block was given.
#[derive(Debug, Clone)]
pub struct GeneratedScript {
    pub workflow_name: String,
    pub content: String,
}

/// Generate a Nextflow script from a resolved graph. The graph is checked
/// against its invariants first; any violation is an internal error.
pub fn codegen(
    graph: &ProcessGraph,
    catalog: &ProcessCatalog,
    pipeline_name: &str,
) -> CompileResult<GeneratedScript> {
    if let Some(first) = validate_resolved(graph, catalog).into_iter().next() {
        return Err(first.into());
    }

    let workflow_name = workflow_identifier(pipeline_name);
    let mut w = CodeWriter::new();

    let wiring = wiring::wire(graph, catalog)?;

    header::emit_header(graph, &wiring, pipeline_name, &mut w);
    w.blank();
    process::emit_processes(graph, catalog, &mut w)?;
    workflow::emit_workflow(graph, &wiring, &workflow_name, &mut w)?;

    let content = w.finish();
    debug!(workflow = %workflow_name, bytes = content.len(), "generated script");
    Ok(GeneratedScript {
        workflow_name,
        content,
    })
}

/// Turn a free-form pipeline name into a Nextflow identifier.
pub fn workflow_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() {
        return "pipeline".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

pub(crate) fn metadata<'c>(
    catalog: &'c ProcessCatalog,
    process: &ProcessRef,
) -> CompileResult<&'c ProcessMetadata> {
    catalog.lookup(&process.name).ok_or_else(|| {
        CompilerError::internal(
            Phase::Codegen,
            "G004",
            format!("Process '{}' is not in the catalog", process.name),
        )
    })
}
