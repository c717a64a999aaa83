//! Human-readable catalog listings. Pure formatting; never part of a build.

use std::fmt::Write;

use serde::Deserialize;

use crate::catalog::{ProcessCatalog, Role};
use crate::recipe::RecipeCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListMode {
    /// One line per process: name and description.
    #[default]
    Short,
    /// One block per process with its types, role and template.
    Detailed,
}

/// List every catalog process in declaration order.
pub fn list_processes(catalog: &ProcessCatalog, mode: ListMode) -> String {
    match mode {
        ListMode::Short => short_listing(catalog),
        ListMode::Detailed => detailed_listing(catalog),
    }
}

fn short_listing(catalog: &ProcessCatalog) -> String {
    let width = catalog.iter().map(|m| m.name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for meta in catalog.iter() {
        let line = format!("{:<width$}  {}", meta.name, meta.description);
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

fn detailed_listing(catalog: &ProcessCatalog) -> String {
    let mut out = String::new();
    for (i, meta) in catalog.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let role = match meta.role {
            Role::Process => "process",
            Role::Adapter => "adapter",
        };
        let _ = writeln!(out, "{}", meta.name);
        if !meta.description.is_empty() {
            let _ = writeln!(out, "    description: {}", meta.description);
        }
        let _ = writeln!(out, "    input:       {}", meta.input.join(", "));
        let _ = writeln!(out, "    output:      {}", meta.output);
        let _ = writeln!(out, "    role:        {role}");
        let _ = writeln!(
            out,
            "    repeatable:  {}",
            if meta.repeatable { "yes" } else { "no" }
        );
        let _ = writeln!(out, "    template:    {}.py", meta.template_name());
    }
    out
}

/// List every recipe with the pipeline string it expands to.
pub fn list_recipes(recipes: &RecipeCatalog) -> String {
    let mut out = String::new();
    for recipe in recipes.iter() {
        let _ = writeln!(out, "{}: {}", recipe.name, recipe.pipeline);
        if !recipe.description.is_empty() {
            let _ = writeln!(out, "    {}", recipe.description);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProcessMetadata;

    fn catalog() -> ProcessCatalog {
        let meta = |name: &str, role: Role, description: &str| ProcessMetadata {
            name: name.into(),
            input: vec!["fasta".into()],
            output: "fastq".into(),
            repeatable: false,
            role,
            description: description.into(),
            template: None,
        };
        ProcessCatalog::from_processes(vec![
            meta("spades", Role::Process, "Assembler"),
            meta("simulate_reads", Role::Adapter, ""),
        ])
        .unwrap()
    }

    #[test]
    fn short_aligns_descriptions() {
        assert_eq!(
            list_processes(&catalog(), ListMode::Short),
            "spades          Assembler\nsimulate_reads\n"
        );
    }

    #[test]
    fn detailed_has_block_per_process() {
        let out = list_processes(&catalog(), ListMode::Detailed);
        assert!(out.starts_with("spades\n    description: Assembler\n    input:       fasta\n"));
        assert!(out.contains("\n\nsimulate_reads\n    input:       fasta\n"));
        assert!(out.contains("    role:        adapter\n"));
        assert!(out.ends_with("    template:    simulate_reads.py\n"));
    }

    #[test]
    fn builtin_listing_follows_declaration_order() {
        let catalog = ProcessCatalog::builtin().unwrap();
        let out = list_processes(&catalog, ListMode::Short);
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("integrity_coverage"));
        assert_eq!(out.lines().count(), catalog.len());
    }

    #[test]
    fn recipes_listed_with_pipelines() {
        let recipes = RecipeCatalog::builtin().unwrap();
        let out = list_recipes(&recipes);
        assert!(out.contains("typing: integrity_coverage (seq_typing | patho_typing)\n"));
    }
}
