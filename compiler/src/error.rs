//! Unified compiler error type used across all phases.

use serde::Serialize;
use thiserror::Error;

use crate::ir::validate::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Catalog,
    Recipe,
    Parse,
    Validate,
    Resolve,
    GraphValidate,
    Codegen,
    Write,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Catalog => write!(f, "Catalog"),
            Phase::Recipe => write!(f, "Recipe"),
            Phase::Parse => write!(f, "Parse"),
            Phase::Validate => write!(f, "Validate"),
            Phase::Resolve => write!(f, "Resolve"),
            Phase::GraphValidate => write!(f, "Graph Validate"),
            Phase::Codegen => write!(f, "Codegen"),
            Phase::Write => write!(f, "Write"),
        }
    }
}

/// What went wrong, independent of where it was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The pipeline string is malformed or names something the catalog lacks.
    Sanity,
    /// The requested recipe does not exist.
    UnknownRecipe,
    /// No adapter chain bridges two adjacent processes.
    UnresolvableDependency,
    /// The destination could not be written.
    Io,
    /// A catalog or recipe table could not be loaded.
    Config,
    /// A resolved graph broke an invariant the parser and resolver guarantee.
    Internal,
}

#[derive(Debug, Clone, Error)]
#[error("[{phase}:{code}] {message}{}", token_suffix(.token))]
pub struct CompilerError {
    pub kind: ErrorKind,
    pub code: String,
    pub phase: Phase,
    pub message: String,
    /// The offending token or process name, when there is one.
    pub token: Option<String>,
}

fn token_suffix(token: &Option<String>) -> String {
    match token {
        Some(t) => format!(" (token '{t}')"),
        None => String::new(),
    }
}

pub type CompileResult<T> = Result<T, CompilerError>;

impl From<ValidationError> for CompilerError {
    fn from(e: ValidationError) -> Self {
        CompilerError {
            kind: ErrorKind::Internal,
            code: e.code.to_string(),
            phase: Phase::GraphValidate,
            message: e.message,
            token: e.process_id,
        }
    }
}

impl CompilerError {
    fn new(
        kind: ErrorKind,
        phase: Phase,
        code: &str,
        message: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        CompilerError {
            kind,
            code: code.into(),
            phase,
            message: message.into(),
            token,
        }
    }

    pub fn parse(code: &str, message: impl Into<String>, token: Option<String>) -> Self {
        Self::new(ErrorKind::Sanity, Phase::Parse, code, message, token)
    }

    pub fn validate(code: &str, message: impl Into<String>, token: Option<String>) -> Self {
        Self::new(ErrorKind::Sanity, Phase::Validate, code, message, token)
    }

    /// Type mismatch found while auto-dependency is off.
    pub fn mismatch(code: &str, message: impl Into<String>, token: Option<String>) -> Self {
        Self::new(ErrorKind::Sanity, Phase::Resolve, code, message, token)
    }

    pub fn unresolvable(code: &str, message: impl Into<String>, token: Option<String>) -> Self {
        Self::new(
            ErrorKind::UnresolvableDependency,
            Phase::Resolve,
            code,
            message,
            token,
        )
    }

    pub fn unknown_recipe(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownRecipe,
            Phase::Recipe,
            "R001",
            format!("Unknown recipe '{name}'"),
            Some(name.to_string()),
        )
    }

    pub fn config(code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, Phase::Catalog, code, message, None)
    }

    pub fn internal(phase: Phase, code: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, phase, code, message, None)
    }

    pub fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::new(
            ErrorKind::Io,
            Phase::Write,
            "W001",
            format!("Failed to write '{}': {err}", path.display()),
            None,
        )
    }

    /// True for errors caused by what the user typed, as opposed to catalog,
    /// filesystem or compiler defects.
    pub fn is_user_error(&self) -> bool {
        matches!(self.kind, ErrorKind::Sanity | ErrorKind::UnknownRecipe)
    }
}
