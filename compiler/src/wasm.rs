//! WASM entry points for browser use. All run against the bundled catalog
//! and recipe table.

use wasm_bindgen::prelude::*;

use crate::catalog::ProcessCatalog;
use crate::driver::{CompileOptions, Compiler, PipelineSource, Rendered};
use crate::error::CompilerError;
use crate::listing::{self, ListMode};
use crate::recipe::RecipeCatalog;

/// Parse, sanity-check and resolve a pipeline string.
/// Returns a JSON array of error objects, empty when the pipeline is valid.
#[wasm_bindgen]
pub fn validate_pipeline(pipeline: &str, auto_dependency: bool) -> JsValue {
    let result = validate_pipeline_inner(pipeline, auto_dependency);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn validate_pipeline_inner(pipeline: &str, auto_dependency: bool) -> Vec<ErrorDto> {
    let (catalog, recipes) = match builtin_tables() {
        Ok(tables) => tables,
        Err(e) => return vec![ErrorDto::from(e)],
    };
    let options = CompileOptions {
        auto_dependency,
        ..CompileOptions::default()
    };
    match Compiler::new(&catalog, &recipes).check(&PipelineSource::Tasks(pipeline.into()), &options) {
        Ok(_) => Vec::new(),
        Err(e) => vec![ErrorDto::from(e)],
    }
}

/// Full pipeline without the file write.
/// Returns a JSON object with either `script` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn compile_pipeline(pipeline: &str, auto_dependency: bool, pipeline_name: &str) -> JsValue {
    let result = compile_pipeline_inner(pipeline, auto_dependency, pipeline_name);
    serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
}

fn compile_pipeline_inner(pipeline: &str, auto_dependency: bool, pipeline_name: &str) -> CompileDto {
    let (catalog, recipes) = match builtin_tables() {
        Ok(tables) => tables,
        Err(e) => return CompileDto::errors(e),
    };
    let options = CompileOptions {
        auto_dependency,
        pipeline_name: pipeline_name.to_string(),
    };
    match Compiler::new(&catalog, &recipes).render(&PipelineSource::Tasks(pipeline.into()), &options) {
        Ok(Rendered { graph, script }) => CompileDto::Success {
            pipeline: graph.to_string(),
            workflow_name: script.workflow_name,
            script: script.content,
        },
        Err(e) => CompileDto::errors(e),
    }
}

/// Formatted listing of the bundled catalog.
#[wasm_bindgen]
pub fn list_processes(detailed: bool) -> String {
    let mode = if detailed { ListMode::Detailed } else { ListMode::Short };
    match ProcessCatalog::builtin() {
        Ok(catalog) => listing::list_processes(&catalog, mode),
        Err(e) => e.to_string(),
    }
}

fn builtin_tables() -> Result<(ProcessCatalog, RecipeCatalog), CompilerError> {
    Ok((ProcessCatalog::builtin()?, RecipeCatalog::builtin()?))
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    token: Option<String>,
    user_error: bool,
}

impl From<CompilerError> for ErrorDto {
    fn from(e: CompilerError) -> Self {
        let user_error = e.is_user_error();
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            token: e.token,
            user_error,
        }
    }
}

#[derive(serde::Serialize)]
#[serde(tag = "status")]
enum CompileDto {
    #[serde(rename = "success")]
    Success {
        pipeline: String,
        workflow_name: String,
        script: String,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}

impl CompileDto {
    fn errors(e: CompilerError) -> Self {
        CompileDto::Errors {
            errors: vec![ErrorDto::from(e)],
        }
    }
}
