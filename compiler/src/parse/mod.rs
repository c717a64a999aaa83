//! Parse phase: pipeline string → validated `ProcessGraph`.

pub mod lexer;
pub mod parser;

pub use lexer::{Token, TokenKind, tokenize};
pub use parser::Parser;

use tracing::debug;

use crate::catalog::ProcessCatalog;
use crate::error::{CompileResult, CompilerError};
use crate::ir::ProcessGraph;
use crate::validate;

/// Tokenize, parse and sanity-check a pipeline string. Stops at the first
/// violation.
pub fn parse_pipeline(input: &str, catalog: &ProcessCatalog) -> CompileResult<ProcessGraph> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(CompilerError::parse(
            "S001",
            "empty pipeline: the pipeline string contains no processes",
            None,
        ));
    }

    let mut graph = Parser::new(tokens, catalog).parse()?;
    graph.renumber();
    validate::validate_pipeline(&graph, catalog)?;

    debug!(pipeline = %graph, stages = graph.stages.len(), "pipeline parsed");
    Ok(graph)
}
