//! Process graph types shared by the parser, resolver and code generator.
//!
//! A pipeline is an ordered list of stages. Each stage holds one or more
//! lanes that run side by side and reconverge before the next stage starts.
//! Edges are implicit: consecutive processes inside a lane, plus every lane
//! tail of one stage to every lane head of the next.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

// =============================================================================
// PROCESS REFERENCES
// =============================================================================

/// One occurrence of a catalog process within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessRef {
    pub name: String,
    /// 1-based, counted per name from left to right.
    pub occurrence: usize,
}

impl ProcessRef {
    pub fn new(name: impl Into<String>, occurrence: usize) -> Self {
        ProcessRef {
            name: name.into(),
            occurrence,
        }
    }

    /// Identifier used for this occurrence in generated code.
    pub fn id(&self) -> String {
        format!("{}_{}", self.name, self.occurrence)
    }
}

// =============================================================================
// LANES, STAGES, GRAPH
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Lane {
    pub processes: Vec<ProcessRef>,
}

impl Lane {
    pub fn new(processes: Vec<ProcessRef>) -> Self {
        Lane { processes }
    }

    pub fn head(&self) -> Option<&ProcessRef> {
        self.processes.first()
    }

    pub fn tail(&self) -> Option<&ProcessRef> {
        self.processes.last()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub lanes: Vec<Lane>,
}

impl Stage {
    pub fn new(lanes: Vec<Lane>) -> Self {
        Stage { lanes }
    }

    /// A stage with a single lane.
    pub fn sequential(processes: Vec<ProcessRef>) -> Self {
        Stage {
            lanes: vec![Lane::new(processes)],
        }
    }

    /// True when the stage splits into more than one lane.
    pub fn is_fork(&self) -> bool {
        self.lanes.len() > 1
    }

    pub fn heads(&self) -> impl Iterator<Item = &ProcessRef> {
        self.lanes.iter().filter_map(Lane::head)
    }

    pub fn tails(&self) -> impl Iterator<Item = &ProcessRef> {
        self.lanes.iter().filter_map(Lane::tail)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProcessGraph {
    pub stages: Vec<Stage>,
}

/// Where a producer/consumer pair sits in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Consecutive processes in lane `lane` of stage `stage`.
    Lane { stage: usize, lane: usize },
    /// Tail of a lane in `stage` feeding a head in `stage + 1`.
    Boundary { stage: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    pub producer: &'a ProcessRef,
    pub consumer: &'a ProcessRef,
    pub kind: EdgeKind,
}

impl ProcessGraph {
    pub fn new(stages: Vec<Stage>) -> Self {
        ProcessGraph { stages }
    }

    /// Every occurrence in first-appearance order.
    pub fn processes(&self) -> impl Iterator<Item = &ProcessRef> {
        self.stages
            .iter()
            .flat_map(|s| s.lanes.iter())
            .flat_map(|l| l.processes.iter())
    }

    /// Every producer/consumer pair, stage by stage. Edges inside a stage's
    /// lanes come before the edges leaving that stage.
    pub fn edges(&self) -> Vec<Edge<'_>> {
        let mut edges = Vec::new();
        for (i, stage) in self.stages.iter().enumerate() {
            for (l, lane) in stage.lanes.iter().enumerate() {
                for pair in lane.processes.windows(2) {
                    edges.push(Edge {
                        producer: &pair[0],
                        consumer: &pair[1],
                        kind: EdgeKind::Lane { stage: i, lane: l },
                    });
                }
            }
            let Some(next) = self.stages.get(i + 1) else {
                continue;
            };
            for producer in stage.tails() {
                for consumer in next.heads() {
                    edges.push(Edge {
                        producer,
                        consumer,
                        kind: EdgeKind::Boundary { stage: i },
                    });
                }
            }
        }
        edges
    }

    /// Reassign occurrence indices left to right, per name.
    pub fn renumber(&mut self) {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for stage in &mut self.stages {
            for lane in &mut stage.lanes {
                for process in &mut lane.processes {
                    let count = counts.entry(process.name.clone()).or_insert(0);
                    *count += 1;
                    process.occurrence = *count;
                }
            }
        }
    }
}

// =============================================================================
// CANONICAL STRING FORM
// =============================================================================

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.processes.iter().map(|p| p.name.as_str()).collect();
        write!(f, "{}", names.join(" "))
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [lane] = self.lanes.as_slice() {
            if lane.processes.len() == 1 {
                return write!(f, "{lane}");
            }
        }
        let lanes: Vec<String> = self.lanes.iter().map(Lane::to_string).collect();
        write!(f, "({})", lanes.join(" | "))
    }
}

/// Renders the pipeline string that parses back into this graph.
impl fmt::Display for ProcessGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<String> = self.stages.iter().map(Stage::to_string).collect();
        write!(f, "{}", stages.join(" "))
    }
}
