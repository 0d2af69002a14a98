//! nlex-eval: evaluation back end for parsed NLex programs.
//!
//! Takes the [`Ast`](nlex_core::Ast) produced by `nlex-core` and turns
//! it into numbers, log entries and a Graphviz rendering. Evaluation
//! follows the front end's accumulator contract: a failed operation
//! adds an error string and is skipped, and the run always completes.
//!
//! # Public API
//!
//! - [`resolve()`] -- evaluate operations and instructions in one call
//! - [`Resolver`] -- the stateful walker behind it, for hosts that
//!   drive the reporting functions directly
//! - [`Resolution`], [`ResolvedOperation`], [`LogEntry`] -- run output
//! - [`graph::to_dot`] / [`GraphStyle`] -- DOT rendering of results

pub mod error;
pub mod graph;
pub mod operator;
pub mod resolver;

// ── Convenience re-exports ───────────────────────────────────────────

pub use error::EvalError;
pub use graph::GraphStyle;
pub use operator::Operator;
pub use resolver::{LogEntry, Resolution, ResolvedOperation, Resolver};

use nlex_core::Ast;

/// Evaluate every operation in the AST, then execute its instruction
/// list, and hand back everything the run accumulated.
pub fn resolve(ast: &Ast) -> Resolution {
    let mut resolver = Resolver::new(ast);
    resolver.resolve();
    resolver.execute_instructions();
    resolver.into_resolution()
}
