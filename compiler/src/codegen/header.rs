//! Emit the script preamble: shebang, provenance comments and input params.

use super::wiring::Wiring;
use super::writer::CodeWriter;
use crate::ir::types::*;

pub fn emit_header(graph: &ProcessGraph, wiring: &Wiring, pipeline_name: &str, w: &mut CodeWriter) {
    w.line("#!/usr/bin/env nextflow");
    w.blank();
    w.comment(&format!("Pipeline: {pipeline_name}"));
    w.comment(&format!("Resolved pipeline string: {graph}"));
    w.comment("Generated by nfweave; regenerate rather than edit.");
    w.blank();
    w.line("nextflow.enable.dsl = 2");
    w.blank();

    for data_type in wiring.sources.keys() {
        w.line(&format!("params.{data_type} = \"{}\"", default_glob(data_type)));
    }
}

/// Default input location for a data type, overridable on the command line.
fn default_glob(data_type: &str) -> String {
    match data_type {
        "fastq" => "fastq/*_{1,2}.*".to_string(),
        other => format!("{other}/*.{other}"),
    }
}
