//! Dependency resolution: splice adapter processes between type-incompatible
//! neighbours.
//!
//! One forward pass. For stage `i` the edges inside its lanes are repaired
//! first, then the boundary into stage `i + 1`. Spliced chains end in a type
//! the consumer accepts, so nothing behind the cursor is ever revisited.

use tracing::debug;

use crate::catalog::{AdapterChain, ProcessCatalog, ProcessMetadata};
use crate::error::{CompileResult, CompilerError, Phase};
use crate::ir::types::*;

pub struct Resolver<'a> {
    catalog: &'a ProcessCatalog,
    auto_dependency: bool,
}

/// Resolve `graph` against `catalog`. With `auto_dependency` off, the first
/// mismatch is a sanity error and no adapter search happens.
pub fn resolve(
    graph: ProcessGraph,
    catalog: &ProcessCatalog,
    auto_dependency: bool,
) -> CompileResult<ProcessGraph> {
    Resolver::new(catalog, auto_dependency).run(graph)
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a ProcessCatalog, auto_dependency: bool) -> Self {
        Resolver {
            catalog,
            auto_dependency,
        }
    }

    pub fn run(&self, graph: ProcessGraph) -> CompileResult<ProcessGraph> {
        let mut stages = graph.stages;

        let mut i = 0;
        while i < stages.len() {
            for lane in &mut stages[i].lanes {
                self.repair_lane(lane, i)?;
            }
            if i + 1 < stages.len() {
                if let Some(inserted) = self.repair_boundary(&mut stages, i)? {
                    stages.insert(i + 1, inserted);
                }
            }
            i += 1;
        }

        let mut resolved = ProcessGraph::new(stages);
        resolved.renumber();
        Ok(resolved)
    }

    fn metadata(&self, process: &ProcessRef) -> CompileResult<&'a ProcessMetadata> {
        self.catalog.lookup(&process.name).ok_or_else(|| {
            CompilerError::internal(
                Phase::Resolve,
                "G004",
                format!("Process '{}' passed parsing but is not in the catalog", process.name),
            )
        })
    }

    fn compatible(&self, producer: &ProcessRef, consumer: &ProcessRef) -> CompileResult<bool> {
        let output = &self.metadata(producer)?.output;
        Ok(self.metadata(consumer)?.accepts(output))
    }

    /// The sanity error for an incompatible pair met with auto-dependency off.
    fn mismatch_error(
        &self,
        producer: &ProcessRef,
        consumer: &ProcessRef,
    ) -> CompileResult<CompilerError> {
        let from = self.metadata(producer)?;
        let to = self.metadata(consumer)?;
        Ok(CompilerError::mismatch(
            "S006",
            format!(
                "'{}' emits {} but '{}' accepts {}, and automatic dependencies are disabled",
                producer.name,
                from.output,
                consumer.name,
                to.input.join("/")
            ),
            Some(pair(producer, consumer)),
        ))
    }

    /// Find the chain that bridges `producer` into `consumer`. Only called for
    /// pairs already known to be incompatible.
    fn bridge(&self, producer: &ProcessRef, consumer: &ProcessRef) -> CompileResult<AdapterChain> {
        if !self.auto_dependency {
            return Err(self.mismatch_error(producer, consumer)?);
        }
        let from = self.metadata(producer)?;
        let to = self.metadata(consumer)?;

        self.catalog
            .adapter_chains(&from.output, &to.input)
            .into_iter()
            .next()
            .ok_or_else(|| {
                CompilerError::unresolvable(
                    "D001",
                    format!(
                        "No adapter chain converts {} from '{}' into {} for '{}'",
                        from.output,
                        producer.name,
                        to.input.join("/"),
                        consumer.name
                    ),
                    Some(pair(producer, consumer)),
                )
            })
    }

    fn repair_lane(&self, lane: &mut Lane, stage: usize) -> CompileResult<()> {
        let mut j = 0;
        while j + 1 < lane.processes.len() {
            let (producer, consumer) = (&lane.processes[j], &lane.processes[j + 1]);
            if self.compatible(producer, consumer)? {
                j += 1;
                continue;
            }
            let chain = self.bridge(producer, consumer)?;
            debug!(
                stage,
                producer = %producer.name,
                consumer = %consumer.name,
                adapters = ?chain.adapters,
                "spliced adapter chain inside lane"
            );
            lane.processes.splice(j + 1..j + 1, to_refs(&chain));
            j += chain.len() + 1;
        }
        Ok(())
    }

    /// Every (producer lane, consumer lane) pair across a boundary whose tail
    /// and head are incompatible, producer-major.
    fn mismatches(&self, producers: &Stage, consumers: &Stage) -> CompileResult<Vec<(usize, usize)>> {
        let mut found = Vec::new();
        for (p, producer) in producers.lanes.iter().enumerate() {
            for (c, consumer) in consumers.lanes.iter().enumerate() {
                let (Some(tail), Some(head)) = (producer.tail(), consumer.head()) else {
                    continue;
                };
                if !self.compatible(tail, head)? {
                    found.push((p, c));
                }
            }
        }
        Ok(found)
    }

    /// Distinct output types of a stage's lane tails, in lane order.
    fn tail_outputs(&self, stage: &Stage) -> CompileResult<Vec<String>> {
        let mut outputs: Vec<String> = Vec::new();
        for tail in stage.tails() {
            let output = &self.metadata(tail)?.output;
            if !outputs.contains(output) {
                outputs.push(output.clone());
            }
        }
        Ok(outputs)
    }

    /// Repair the edges from stage `i` into stage `i + 1`. Returns a stage to
    /// insert between them when a single chain serves the whole boundary.
    fn repair_boundary(&self, stages: &mut [Stage], i: usize) -> CompileResult<Option<Stage>> {
        let (left, right) = stages.split_at_mut(i + 1);
        let (producers, consumers) = (&mut left[i], &mut right[0]);

        let mismatches = self.mismatches(producers, consumers)?;
        let Some(&(p, c)) = mismatches.first() else {
            return Ok(None);
        };
        let (Some(tail), Some(head)) = (tail_at(producers, p), head_at(consumers, c)) else {
            return Ok(None);
        };
        if !self.auto_dependency {
            return Err(self.mismatch_error(&tail, &head)?);
        }

        if !consumers.is_fork() {
            // Both sides single-lane: the chain becomes its own stage.
            if !producers.is_fork() {
                let chain = self.bridge(&tail, &head)?;
                debug!(
                    stage = i,
                    producer = %tail.name,
                    consumer = %head.name,
                    adapters = ?chain.adapters,
                    "inserted adapter stage"
                );
                return Ok(Some(Stage::sequential(to_refs(&chain))));
            }

            // Fan-in: extend each producer lane that the merge point rejects.
            for p in distinct(mismatches.iter().map(|&(p, _)| p)) {
                let Some(tail) = tail_at(producers, p) else {
                    continue;
                };
                let chain = self.bridge(&tail, &head)?;
                debug!(
                    stage = i,
                    lane = p,
                    producer = %tail.name,
                    consumer = %head.name,
                    adapters = ?chain.adapters,
                    "appended adapter chain to lane"
                );
                producers.lanes[p].processes.extend(to_refs(&chain));
            }
            return Ok(None);
        }

        let outputs = self.tail_outputs(producers)?;

        // Fan-out from one output type: every rejecting consumer lane needs
        // its own chain. If all lanes reject and share the same chain, it
        // runs once, as a stage of its own.
        if outputs.len() == 1 {
            let plan = self.head_chains(producers, consumers, &mismatches)?;
            if plan.len() == consumers.lanes.len()
                && plan.windows(2).all(|w| w[0].1 == w[1].1)
            {
                if let Some((_, chain)) = plan.first() {
                    debug!(
                        stage = i,
                        adapters = ?chain.adapters,
                        "inserted adapter stage ahead of fork"
                    );
                    return Ok(Some(Stage::sequential(to_refs(chain))));
                }
            }
            prefix_lanes(consumers, plan, i + 1);
            return Ok(None);
        }

        // Mixed output types into a fork: bridge at the producer tails when
        // one chain per tail satisfies every consumer head, else at the
        // consumer heads with chains whose first adapter takes every type.
        if let Some(plan) = self.tail_chains(producers, consumers, &mismatches)? {
            for (p, chain) in plan {
                debug!(
                    stage = i,
                    lane = p,
                    adapters = ?chain.adapters,
                    "appended adapter chain to lane ahead of fork"
                );
                producers.lanes[p].processes.extend(to_refs(&chain));
            }
            return Ok(None);
        }
        if let Some(plan) = self.shared_head_chains(consumers, &mismatches, &outputs)? {
            prefix_lanes(consumers, plan, i + 1);
            return Ok(None);
        }

        Err(CompilerError::unresolvable(
            "D002",
            format!(
                "Lanes of stage {} emit different types ({}), and no adapter chain lets them all feed the lanes of stage {}",
                i + 1,
                outputs.join(", "),
                i + 2
            ),
            Some(pair(&tail, &head)),
        ))
    }

    /// One chain per rejecting consumer lane, bridged from the first
    /// producer that lane rejects.
    fn head_chains(
        &self,
        producers: &Stage,
        consumers: &Stage,
        mismatches: &[(usize, usize)],
    ) -> CompileResult<Vec<(usize, AdapterChain)>> {
        let mut plan = Vec::new();
        for c in distinct(mismatches.iter().map(|&(_, c)| c)) {
            let Some(&(p, _)) = mismatches.iter().find(|&&(_, lane)| lane == c) else {
                continue;
            };
            let (Some(tail), Some(head)) = (tail_at(producers, p), head_at(consumers, c)) else {
                continue;
            };
            plan.push((c, self.bridge(&tail, &head)?));
        }
        Ok(plan)
    }

    /// One chain per rejected producer lane whose output every consumer head
    /// accepts. `None` when some rejected lane has no such chain.
    fn tail_chains(
        &self,
        producers: &Stage,
        consumers: &Stage,
        mismatches: &[(usize, usize)],
    ) -> CompileResult<Option<Vec<(usize, AdapterChain)>>> {
        let mut heads = consumers.heads();
        let Some(first) = heads.next() else {
            return Ok(None);
        };
        let mut accepted = self.metadata(first)?.input.clone();
        for head in heads {
            let meta = self.metadata(head)?;
            accepted.retain(|t| meta.accepts(t));
        }
        if accepted.is_empty() {
            return Ok(None);
        }

        let mut plan = Vec::new();
        for p in distinct(mismatches.iter().map(|&(p, _)| p)) {
            let Some(tail) = tail_at(producers, p) else {
                continue;
            };
            let output = &self.metadata(&tail)?.output;
            let Some(chain) = self.catalog.adapter_chains(output, &accepted).into_iter().next() else {
                return Ok(None);
            };
            plan.push((p, chain));
        }
        Ok(Some(plan))
    }

    /// One chain per rejecting consumer lane whose first adapter accepts
    /// every producer output. `None` when some lane has no such chain.
    fn shared_head_chains(
        &self,
        consumers: &Stage,
        mismatches: &[(usize, usize)],
        outputs: &[String],
    ) -> CompileResult<Option<Vec<(usize, AdapterChain)>>> {
        let Some(from) = outputs.first() else {
            return Ok(None);
        };
        let mut plan = Vec::new();
        for c in distinct(mismatches.iter().map(|&(_, c)| c)) {
            let Some(head) = head_at(consumers, c) else {
                continue;
            };
            let accepted = &self.metadata(&head)?.input;
            let chain = self
                .catalog
                .adapter_chains(from, accepted)
                .into_iter()
                .find(|chain| {
                    chain
                        .adapters
                        .first()
                        .and_then(|name| self.catalog.lookup(name))
                        .is_some_and(|first| outputs.iter().all(|t| first.accepts(t)))
                });
            let Some(chain) = chain else {
                return Ok(None);
            };
            plan.push((c, chain));
        }
        Ok(Some(plan))
    }
}

fn prefix_lanes(consumers: &mut Stage, plan: Vec<(usize, AdapterChain)>, stage: usize) {
    for (c, chain) in plan {
        debug!(
            stage,
            lane = c,
            adapters = ?chain.adapters,
            "prefixed adapter chain to lane"
        );
        consumers.lanes[c].processes.splice(0..0, to_refs(&chain));
    }
}

/// Lane indices in first-seen order, without repeats.
fn distinct(lanes: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut seen = Vec::new();
    for lane in lanes {
        if !seen.contains(&lane) {
            seen.push(lane);
        }
    }
    seen
}

fn pair(producer: &ProcessRef, consumer: &ProcessRef) -> String {
    format!("{} -> {}", producer.name, consumer.name)
}

fn tail_at(stage: &Stage, lane: usize) -> Option<ProcessRef> {
    stage.lanes.get(lane).and_then(Lane::tail).cloned()
}

fn head_at(stage: &Stage, lane: usize) -> Option<ProcessRef> {
    stage.lanes.get(lane).and_then(Lane::head).cloned()
}

fn to_refs(chain: &AdapterChain) -> Vec<ProcessRef> {
    chain
        .adapters
        .iter()
        .map(|name| ProcessRef::new(name.as_str(), 0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parse::parse_pipeline;

    fn builtin() -> ProcessCatalog {
        ProcessCatalog::builtin().unwrap()
    }

    fn resolved(input: &str) -> CompileResult<ProcessGraph> {
        let catalog = builtin();
        let graph = parse_pipeline(input, &catalog)?;
        resolve(graph, &catalog, true)
    }

    #[test]
    fn compatible_pipeline_untouched() {
        let graph = resolved("integrity_coverage trimmomatic spades mlst").unwrap();
        assert_eq!(graph.to_string(), "integrity_coverage trimmomatic spades mlst");
    }

    #[test]
    fn single_lane_boundary_gets_new_stage() {
        let graph = resolved("spades pilon").unwrap();
        assert_eq!(graph.stages.len(), 3);
        assert_eq!(graph.to_string(), "spades assembly_mapping pilon");
    }

    #[test]
    fn shortest_chain_wins() {
        // fasta -> fastq: simulate_reads beats assembly_mapping + bam_to_fastq.
        let graph = resolved("spades fastqc").unwrap();
        assert_eq!(graph.to_string(), "spades simulate_reads fastqc");
    }

    #[test]
    fn mismatch_inside_lane() {
        let graph = resolved("(spades pilon | skesa)").unwrap();
        assert_eq!(graph.to_string(), "(spades assembly_mapping pilon | skesa)");
    }

    #[test]
    fn fan_in_extends_producer_lanes() {
        let graph = resolved("skesa (process_skesa | assembly_mapping) pilon").unwrap();
        assert_eq!(
            graph.to_string(),
            "skesa (process_skesa assembly_mapping | assembly_mapping) pilon"
        );
    }

    #[test]
    fn fan_out_prefixes_consumer_lanes() {
        let graph = resolved("spades (pilon | mlst)").unwrap();
        assert_eq!(graph.to_string(), "spades (assembly_mapping pilon | mlst)");
    }

    #[test]
    fn fork_rejecting_everywhere_gets_one_stage() {
        let graph = resolved("spades (pilon | pilon)").unwrap();
        assert_eq!(graph.to_string(), "spades assembly_mapping (pilon | pilon)");
    }

    #[test]
    fn mixed_types_into_fork_bridged_at_tail() {
        let graph =
            resolved("integrity_coverage (spades | trimmomatic) (fastqc | check_coverage)").unwrap();
        assert_eq!(
            graph.to_string(),
            "integrity_coverage (spades simulate_reads | trimmomatic) (fastqc | check_coverage)"
        );
    }

    #[test]
    fn mixed_types_into_fork_bridged_at_head() {
        use crate::catalog::{ProcessMetadata, Role};

        let meta = |name: &str, input: &[&str], output: &str, role: Role| ProcessMetadata {
            name: name.into(),
            input: input.iter().map(|s| s.to_string()).collect(),
            output: output.into(),
            repeatable: false,
            role,
            description: String::new(),
            template: None,
        };
        let catalog = ProcessCatalog::from_processes(vec![
            meta("reads", &["fastq"], "fastq", Role::Process),
            meta("trim", &["fastq"], "fastq", Role::Process),
            meta("assemble", &["fastq"], "fasta", Role::Process),
            meta("polish", &["bam"], "fasta", Role::Process),
            meta("report", &["fasta", "fastq"], "txt", Role::Process),
            meta("align_any", &["fasta", "fastq"], "bam", Role::Adapter),
        ])
        .unwrap();
        // No type is accepted by both heads, so the tails cannot be bridged;
        // align_any takes both producer types and feeds polish.
        let graph = parse_pipeline("reads (assemble | trim) (polish | report)", &catalog).unwrap();
        let graph = resolve(graph, &catalog, true).unwrap();
        assert_eq!(
            graph.to_string(),
            "reads (assemble | trim) (align_any polish | report)"
        );
    }

    #[test]
    fn mixed_types_into_fork_without_any_placement() {
        let err = resolved("integrity_coverage (spades | trimmomatic) (pilon | fastqc)").unwrap_err();
        assert_eq!(err.code, "D002");
        assert_eq!(err.kind, ErrorKind::UnresolvableDependency);
    }

    #[test]
    fn adapters_are_renumbered() {
        let graph = resolved("spades pilon mlst pilon").unwrap();
        let ids: Vec<String> = graph.processes().map(ProcessRef::id).collect();
        assert_eq!(
            ids,
            vec![
                "spades_1",
                "assembly_mapping_1",
                "pilon_1",
                "mlst_1",
                "assembly_mapping_2",
                "pilon_2"
            ]
        );
    }

    #[test]
    fn disabled_auto_dependency_is_sanity_error() {
        let catalog = builtin();
        let graph = parse_pipeline("spades pilon", &catalog).unwrap();
        let err = resolve(graph, &catalog, false).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Sanity);
        assert_eq!(err.code, "S006");
        assert!(err.message.contains("spades") && err.message.contains("pilon"));
    }

    #[test]
    fn disabled_auto_dependency_in_fork() {
        let catalog = builtin();
        let graph = parse_pipeline("spades (pilon | mlst)", &catalog).unwrap();
        let err = resolve(graph, &catalog, false).unwrap_err();
        assert_eq!(err.code, "S006");
    }
}
