//! Single-pass LL(1) parser from tokens to a `ProcessGraph`. Every decision
//! is made on the current token alone, so no lookahead buffer is kept.
//!
//! ```text
//! pipeline := item+
//! item     := NAME | group
//! group    := "(" lane ( "|" lane )* ")"
//! lane     := NAME+
//! ```

use std::vec::IntoIter;

use super::lexer::{Token, TokenKind};
use crate::catalog::ProcessCatalog;
use crate::error::{CompileResult, CompilerError};
use crate::ir::types::*;
use crate::validate::rules;

pub struct Parser<'a> {
    tokens: IntoIter<Token>,
    catalog: &'a ProcessCatalog,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, catalog: &'a ProcessCatalog) -> Self {
        Parser {
            tokens: tokens.into_iter(),
            catalog,
        }
    }

    /// Consume every token. Occurrence indices are left at zero; the caller
    /// numbers them once the whole graph is known.
    pub fn parse(mut self) -> CompileResult<ProcessGraph> {
        let mut stages = Vec::new();

        while let Some(token) = self.tokens.next() {
            let stage = match token.kind {
                TokenKind::Name(name) => {
                    rules::s002_known_process(self.catalog, &name)?;
                    Stage::sequential(vec![ProcessRef::new(name, 0)])
                }
                TokenKind::Open => self.parse_group(token.pos)?,
                TokenKind::Close => {
                    return Err(CompilerError::parse(
                        "S003",
                        format!(
                            "Malformed lane group: ')' at position {} has no matching '('",
                            token.pos
                        ),
                        Some(")".into()),
                    ));
                }
                TokenKind::Bar => {
                    return Err(CompilerError::parse(
                        "S003",
                        format!(
                            "Malformed lane group: '|' at position {} is outside a lane group",
                            token.pos
                        ),
                        Some("|".into()),
                    ));
                }
            };
            stages.push(stage);
        }

        Ok(ProcessGraph::new(stages))
    }

    /// Parse the body of a group whose `(` sat at `open_pos`.
    fn parse_group(&mut self, open_pos: usize) -> CompileResult<Stage> {
        let mut lanes = Vec::new();
        let mut current: Vec<ProcessRef> = Vec::new();

        loop {
            let Some(token) = self.tokens.next() else {
                return Err(CompilerError::parse(
                    "S003",
                    format!("Malformed lane group: '(' at position {open_pos} is never closed"),
                    Some("(".into()),
                ));
            };
            match token.kind {
                TokenKind::Name(name) => {
                    rules::s002_known_process(self.catalog, &name)?;
                    current.push(ProcessRef::new(name, 0));
                }
                TokenKind::Bar => {
                    lanes.push(close_lane(&mut current, lanes.len(), open_pos, "|")?);
                }
                TokenKind::Close => {
                    lanes.push(close_lane(&mut current, lanes.len(), open_pos, ")")?);
                    return Ok(Stage::new(lanes));
                }
                TokenKind::Open => {
                    return Err(CompilerError::parse(
                        "S003",
                        format!(
                            "Malformed lane group: '(' at position {} is nested inside the group opened at position {open_pos}",
                            token.pos
                        ),
                        Some("(".into()),
                    ));
                }
            }
        }
    }
}

/// Finish the lane ended by `delimiter`, rejecting it if empty.
fn close_lane(
    current: &mut Vec<ProcessRef>,
    index: usize,
    open_pos: usize,
    delimiter: &str,
) -> CompileResult<Lane> {
    if current.is_empty() {
        return Err(CompilerError::parse(
            "S004",
            format!(
                "Lane {} of the group opened at position {open_pos} has no processes",
                index + 1
            ),
            Some(delimiter.into()),
        ));
    }
    Ok(Lane::new(std::mem::take(current)))
}
