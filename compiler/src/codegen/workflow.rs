//! Emit the workflow blocks: a named workflow that builds the source
//! channels and calls every process in dependency order, and the entry
//! workflow that runs it.

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::wiring::{Wiring, source_name};
use super::writer::CodeWriter;
use crate::error::{CompileResult, CompilerError, Phase};
use crate::ir::types::*;

pub fn emit_workflow(
    graph: &ProcessGraph,
    wiring: &Wiring,
    name: &str,
    w: &mut CodeWriter,
) -> CompileResult<()> {
    let order = dependency_order(graph)?;

    w.block_open(&format!("workflow {name}"));
    for (data_type, channel) in &wiring.sources {
        w.line(&format!("{} = {channel}", source_name(data_type)));
    }
    w.blank();
    for id in order {
        let Some(input) = wiring.inputs.get(&id) else {
            return Err(CompilerError::internal(
                Phase::Codegen,
                "G007",
                format!("Process '{id}' has no input channel"),
            ));
        };
        w.line(&format!("{id}({input})"));
    }
    w.block_close();
    w.blank();

    w.block_open("workflow");
    w.line(&format!("{name}()"));
    w.block_close();
    Ok(())
}
/// Occurrence ids in an order where every producer precedes its consumers.
/// Nodes are added in first-appearance order, which the sort preserves.
pub fn dependency_order(graph: &ProcessGraph) -> CompileResult<Vec<String>> {
    let mut dag: DiGraph<String, ()> = DiGraph::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();

    for process in graph.processes() {
        let id = process.id();
        let node = dag.add_node(id.clone());
        index.insert(id, node);
    }
    for edge in graph.edges() {
        let (Some(&from), Some(&to)) = (
            index.get(&edge.producer.id()),
            index.get(&edge.consumer.id()),
        ) else {
            continue;
        };
        dag.add_edge(from, to, ());
    }

    let sorted = toposort(&dag, None).map_err(|cycle| {
        CompilerError::internal(
            Phase::Codegen,
            "G006",
            format!(
                "Process graph contains a cycle through '{}'",
                dag[cycle.node_id()]
            ),
        )
    })?;
    Ok(sorted.into_iter().map(|n| dag[n].clone()).collect())
}
