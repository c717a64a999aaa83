//! Driver: pipeline source → resolved graph → Nextflow script on disk.
//!
//! Every operation the command-line front end offers is an `Operation`
//! variant, dispatched by `Compiler::run`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::ProcessCatalog;
use crate::codegen::{self, GeneratedScript};
use crate::error::CompileResult;
use crate::ir::{ProcessGraph, validate_resolved};
use crate::listing::{self, ListMode};
use crate::parse::parse_pipeline;
use crate::recipe::{self, RecipeCatalog};
use crate::resolve::resolve;

/// Extension given to every written script.
pub const SCRIPT_EXTENSION: &str = "nf";

/// Where the pipeline string comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineSource {
    /// A pipeline string typed by the user.
    Tasks(String),
    /// The name of a recipe in the recipe table.
    Recipe(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    /// Splice adapter processes between incompatible neighbours.
    pub auto_dependency: bool,
    /// Recorded in the script header and used for the workflow identifier.
    pub pipeline_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            auto_dependency: true,
            pipeline_name: "nfweave".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Operation {
    Build {
        source: PipelineSource,
        destination: PathBuf,
        options: CompileOptions,
    },
    /// Parse and resolve only; nothing is written.
    Check {
        source: PipelineSource,
        options: CompileOptions,
    },
    List(ListMode),
    ListRecipes,
}

#[derive(Debug, Clone)]
pub struct BuildSummary {
    /// Path actually written, extension included.
    pub destination: PathBuf,
    /// Canonical form of the resolved pipeline.
    pub pipeline: String,
    pub workflow_name: String,
    pub processes: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Built(BuildSummary),
    Checked(ProcessGraph),
    Listed(String),
}

/// A resolved graph together with the script generated from it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub graph: ProcessGraph,
    pub script: GeneratedScript,
}

pub struct Compiler<'a> {
    catalog: &'a ProcessCatalog,
    recipes: &'a RecipeCatalog,
}

impl<'a> Compiler<'a> {
    pub fn new(catalog: &'a ProcessCatalog, recipes: &'a RecipeCatalog) -> Self {
        Compiler { catalog, recipes }
    }

    pub fn run(&self, operation: Operation) -> CompileResult<Outcome> {
        match operation {
            Operation::Build {
                source,
                destination,
                options,
            } => self
                .compile(
                    &source,
                    options.auto_dependency,
                    &destination,
                    &options.pipeline_name,
                )
                .map(Outcome::Built),
            Operation::Check { source, options } => {
                self.check(&source, &options).map(Outcome::Checked)
            }
            Operation::List(mode) => Ok(Outcome::Listed(listing::list_processes(
                self.catalog,
                mode,
            ))),
            Operation::ListRecipes => Ok(Outcome::Listed(listing::list_recipes(self.recipes))),
        }
    }

    /// Build `source` and write the script to `destination`, with `.nf`
    /// appended when missing. Nothing is written unless every phase succeeds.
    pub fn compile(
        &self,
        source: &PipelineSource,
        auto_dependency: bool,
        destination: &Path,
        pipeline_name: &str,
    ) -> CompileResult<BuildSummary> {
        let destination = with_script_extension(destination);
        info!(
            pipeline = %pipeline_name,
            destination = %destination.display(),
            auto_dependency,
            "compiling pipeline"
        );

        let options = CompileOptions {
            auto_dependency,
            pipeline_name: pipeline_name.to_string(),
        };
        let Rendered { graph, script } = self.render(source, &options)?;
        codegen::write_script(&destination, &script.content)?;

        let summary = BuildSummary {
            destination,
            pipeline: graph.to_string(),
            workflow_name: script.workflow_name,
            processes: graph.processes().count(),
            bytes: script.content.len(),
        };
        info!(
            pipeline = %pipeline_name,
            destination = %summary.destination.display(),
            processes = summary.processes,
            "pipeline written"
        );
        Ok(summary)
    }

    /// Run every phase except the write.
    pub fn render(
        &self,
        source: &PipelineSource,
        options: &CompileOptions,
    ) -> CompileResult<Rendered> {
        let graph = self.check(source, options)?;
        let script = codegen::codegen(&graph, self.catalog, &options.pipeline_name)?;
        Ok(Rendered { graph, script })
    }

    /// Parse, sanity-check and resolve `source`, then confirm the resolved
    /// graph holds its invariants.
    pub fn check(
        &self,
        source: &PipelineSource,
        options: &CompileOptions,
    ) -> CompileResult<ProcessGraph> {
        let graph = match source {
            PipelineSource::Tasks(pipeline) => {
                let parsed = parse_pipeline(pipeline, self.catalog)?;
                resolve(parsed, self.catalog, options.auto_dependency)?
            }
            PipelineSource::Recipe(name) => {
                let (pipeline, required) = self.recipes.resolve(name)?;
                if !options.auto_dependency {
                    warn!(
                        recipe = %name,
                        "recipe used with automatic dependencies disabled"
                    );
                }
                let parsed = parse_pipeline(pipeline, self.catalog)?;
                let resolved = resolve(parsed, self.catalog, options.auto_dependency)?;
                recipe::check_required(name, required, &resolved)?;
                resolved
            }
        };

        if let Some(first) = validate_resolved(&graph, self.catalog).into_iter().next() {
            return Err(first.into());
        }
        Ok(graph)
    }
}

/// Append `.nf` unless the path already ends in it.
pub fn with_script_extension(path: &Path) -> PathBuf {
    if path.extension().is_some_and(|e| e == SCRIPT_EXTENSION) {
        return path.to_path_buf();
    }
    let mut raw = OsString::from(path.as_os_str());
    raw.push(".");
    raw.push(SCRIPT_EXTENSION);
    PathBuf::from(raw)
}
