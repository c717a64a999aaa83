pub mod catalog;
pub mod codegen;
pub mod driver;
pub mod error;
pub mod ir;
pub mod listing;
pub mod parse;
pub mod recipe;
pub mod resolve;
pub mod validate;
pub mod wasm;

pub use driver::{BuildSummary, CompileOptions, Compiler, Operation, Outcome, PipelineSource};
pub use error::{CompileResult, CompilerError, ErrorKind};
