use nfweave::catalog::{ProcessCatalog, ProcessMetadata, Role};
use nfweave::recipe::{Recipe, RecipeCatalog};

// =============================================================================
// Catalog fixtures
// =============================================================================

fn process(name: &str, input: &[&str], output: &str) -> ProcessMetadata {
    ProcessMetadata {
        name: name.into(),
        input: input.iter().map(|s| s.to_string()).collect(),
        output: output.into(),
        repeatable: false,
        role: Role::Process,
        description: String::new(),
        template: None,
    }
}

fn adapter(name: &str, input: &str, output: &str) -> ProcessMetadata {
    ProcessMetadata {
        role: Role::Adapter,
        ..process(name, &[input], output)
    }
}

/// Small catalog with letter-named processes:
///
/// - `A`: fastq → fasta
/// - `B`: fastq → fastq
/// - `P`, `Q`: fastq → t1
/// - `C`: t1 → t1
/// - `R`: fastq → fastq, repeatable
/// - `M`: fasta or fastq → fasta
/// - adapters `X` then `Y`: fasta → fastq
pub fn catalog() -> ProcessCatalog {
    ProcessCatalog::from_processes(vec![
        process("A", &["fastq"], "fasta"),
        process("B", &["fastq"], "fastq"),
        process("P", &["fastq"], "t1"),
        process("Q", &["fastq"], "t1"),
        process("C", &["t1"], "t1"),
        ProcessMetadata {
            repeatable: true,
            ..process("R", &["fastq"], "fastq")
        },
        process("M", &["fasta", "fastq"], "fasta"),
        adapter("X", "fasta", "fastq"),
        adapter("Y", "fasta", "fastq"),
    ])
    .expect("fixture catalog should load")
}

// =============================================================================
// Recipe fixtures
// =============================================================================

pub fn recipes() -> RecipeCatalog {
    RecipeCatalog::from_recipes(vec![
        Recipe {
            name: "bridged".into(),
            pipeline: "A B".into(),
            required: vec!["X".into()],
            description: String::new(),
        },
        Recipe {
            name: "unbridged".into(),
            pipeline: "B R".into(),
            required: vec!["X".into()],
            description: String::new(),
        },
    ])
    .expect("fixture recipes should load")
}

/// Names of a graph's processes, stage by stage, lane by lane.
pub fn shape(graph: &nfweave::ir::ProcessGraph) -> Vec<Vec<Vec<String>>> {
    graph
        .stages
        .iter()
        .map(|s| {
            s.lanes
                .iter()
                .map(|l| l.processes.iter().map(|p| p.name.clone()).collect())
                .collect()
        })
        .collect()
}
