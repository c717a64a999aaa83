//! Channel wiring: which channel each process occurrence is called with.
//!
//! First-stage lane heads read a source channel built from the params of
//! their first declared input type. Inside a lane a process reads its
//! predecessor's `.out`. A lane head after the first stage reads the `.out`
//! of every lane tail in the previous stage, merged with `mix` when there is
//! more than one. Output channels may be read any number of times, so a fork
//! needs no explicit split.

use indexmap::IndexMap;

use super::metadata;
use crate::catalog::ProcessCatalog;
use crate::error::CompileResult;
use crate::ir::types::*;

#[derive(Debug, Clone, Default)]
pub struct Wiring {
    /// Source channel expression per input type, in first-appearance order.
    pub sources: IndexMap<String, String>,
    /// Input channel expression per occurrence id.
    pub inputs: IndexMap<String, String>,
}

pub fn wire(graph: &ProcessGraph, catalog: &ProcessCatalog) -> CompileResult<Wiring> {
    let mut wiring = Wiring::default();
    let mut previous: Option<&Stage> = None;

    for stage in &graph.stages {
        for lane in &stage.lanes {
            let Some(head) = lane.head() else {
                continue;
            };
            let input = match previous {
                None => {
                    let meta = metadata(catalog, head)?;
                    let Some(data_type) = meta.input.first() else {
                        continue;
                    };
                    wiring
                        .sources
                        .entry(data_type.clone())
                        .or_insert_with(|| source_channel(data_type));
                    source_name(data_type)
                }
                Some(producers) => merge(producers.tails().map(output_of).collect()),
            };
            wiring.inputs.insert(head.id(), input);

            for pair in lane.processes.windows(2) {
                wiring.inputs.insert(pair[1].id(), output_of(&pair[0]));
            }
        }
        previous = Some(stage);
    }
    Ok(wiring)
}

/// Variable holding the source channel for `data_type`.
pub fn source_name(data_type: &str) -> String {
    format!("IN_{data_type}")
}

fn source_channel(data_type: &str) -> String {
    match data_type {
        "fastq" => "Channel.fromFilePairs(params.fastq)".to_string(),
        other => format!("Channel.fromPath(params.{other}).map {{ f -> [f.baseName, f] }}"),
    }
}

fn merge(mut sources: Vec<String>) -> String {
    if sources.len() <= 1 {
        return sources.pop().unwrap_or_default();
    }
    let first = sources.remove(0);
    format!("{first}.mix({})", sources.join(", "))
}

fn output_of(process: &ProcessRef) -> String {
    format!("{}.out", process.id())
}
