//! Read-only process catalog: metadata lookup and adapter-chain search.
//!
//! Declaration order is significant. It decides listing order and breaks
//! ties between equally short adapter chains.

pub mod types;

pub use types::*;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{CompileResult, CompilerError};

/// Longest adapter chain the resolver will splice between two processes.
pub const MAX_ADAPTER_CHAIN: usize = 3;

const BUILTIN_CATALOG: &str = include_str!("processes.json");

#[derive(Debug, Clone)]
pub struct ProcessCatalog {
    processes: IndexMap<String, ProcessMetadata>,
}

impl ProcessCatalog {
    /// The catalog bundled with the crate.
    pub fn builtin() -> CompileResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> CompileResult<Self> {
        let file = serde_json::from_str::<CatalogFile>(json).map_err(|e| {
            CompilerError::config("C001", format!("Failed to parse process catalog JSON: {e}"))
        })?;
        Self::from_processes(file.processes)
    }

    pub fn from_processes(list: Vec<ProcessMetadata>) -> CompileResult<Self> {
        let mut processes = IndexMap::with_capacity(list.len());
        for meta in list {
            if meta.input.is_empty() {
                return Err(CompilerError::config(
                    "C003",
                    format!("Process '{}' must declare at least one input type", meta.name),
                ));
            }
            match processes.entry(meta.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(CompilerError::config(
                        "C002",
                        format!("Process '{}' is declared more than once", meta.name),
                    ));
                }
                Entry::Vacant(slot) => {
                    slot.insert(meta);
                }
            }
        }
        Ok(ProcessCatalog { processes })
    }

    pub fn lookup(&self, name: &str) -> Option<&ProcessMetadata> {
        self.processes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processes.contains_key(name)
    }

    /// All entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProcessMetadata> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Candidate adapter chains from `from` to any of `accepted`, shortest
    /// first, equal lengths ordered by the declaration index of each adapter.
    ///
    /// Chains never revisit a data type and hold at most
    /// [`MAX_ADAPTER_CHAIN`] adapters.
    pub fn adapter_chains(&self, from: &str, accepted: &[String]) -> Vec<AdapterChain> {
        let adapters: Vec<&ProcessMetadata> = self.iter().filter(|m| m.is_adapter()).collect();

        // Breadth-first over chain length. Expanding each frontier entry in
        // declaration order keeps every level lexicographically sorted.
        let mut found = Vec::new();
        let mut frontier: Vec<(Vec<&ProcessMetadata>, Vec<&str>)> = vec![(vec![], vec![from])];

        for _ in 0..MAX_ADAPTER_CHAIN {
            let mut next = Vec::new();
            for (chain, visited) in &frontier {
                let current = visited.last().copied().unwrap_or(from);
                for adapter in &adapters {
                    if !adapter.accepts(current) || visited.contains(&adapter.output.as_str()) {
                        continue;
                    }
                    let mut extended = chain.clone();
                    extended.push(*adapter);
                    if accepted.iter().any(|t| *t == adapter.output) {
                        found.push(AdapterChain {
                            adapters: extended.iter().map(|m| m.name.clone()).collect(),
                            output: adapter.output.clone(),
                        });
                    } else {
                        let mut seen = visited.clone();
                        seen.push(adapter.output.as_str());
                        next.push((extended, seen));
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        found
    }
}
