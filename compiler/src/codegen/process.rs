//! Emit one `process` block per occurrence.

use super::metadata;
use super::writer::CodeWriter;
use crate::catalog::{ProcessCatalog, ProcessMetadata};
use crate::error::CompileResult;
use crate::ir::types::*;

/// Emit a block for every occurrence in first-appearance order. Channels are
/// bound at the call site in the workflow block.
pub fn emit_processes(
    graph: &ProcessGraph,
    catalog: &ProcessCatalog,
    w: &mut CodeWriter,
) -> CompileResult<()> {
    for process in graph.processes() {
        emit_process(process, metadata(catalog, process)?, w);
        w.blank();
    }
    Ok(())
}

fn emit_process(process: &ProcessRef, meta: &ProcessMetadata, w: &mut CodeWriter) {
    let id = process.id();

    if !meta.description.is_empty() {
        w.comment(&meta.description);
    }
    w.block_open(&format!("process {id}"));
    w.line("tag \"${sample_id}\"");
    w.blank();
    w.line("input:");
    w.line("tuple val(sample_id), path(infile)");
    w.blank();
    w.line("output:");
    w.line(&format!("tuple val(sample_id), path(\"*.{}\")", meta.output));
    w.blank();
    w.line("script:");
    w.line(&format!("template \"{}.py\"", meta.template_name()));
    w.block_close();
}
