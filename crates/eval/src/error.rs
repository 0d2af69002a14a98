//! Typed evaluation failures.
//!
//! The resolver stringifies these into the resolution's error list at
//! the API boundary, so hosts see plain messages while tests and
//! library callers can still match on the variant.

use thiserror::Error;

/// A failure raised while resolving a single operation tree. Each
/// failure suppresses that operation's result; sibling operations are
/// unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A `valor1`/`valor2` slot held text instead of a number or a
    /// nested operation.
    #[error("invalid value: {value}")]
    InvalidValue { value: String },

    /// The `operacion` entry named no known operator, or was not text.
    #[error("unknown operation: {name}")]
    UnknownOperation { name: String },

    /// The operation mapping has no `operacion` entry at all.
    #[error("operation is missing its 'operacion' key")]
    MissingOperationName,

    /// `valor1` did not resolve to a number.
    #[error("missing value for operation '{operation}'")]
    MissingValue { operation: String },

    /// A binary operator's `valor2` did not resolve to a number.
    #[error("missing second value for operation '{operation}'")]
    MissingSecondValue { operation: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    /// `raiz` requires a non-negative base and a positive index.
    #[error("invalid root: base must be non-negative and index positive")]
    InvalidRoot,

    #[error("inverse of zero is not allowed")]
    InverseOfZero,

    /// The formula evaluated to NaN or an infinity; the result is
    /// withheld instead of surfaced.
    #[error("operation '{operation}' produced a non-finite result")]
    NonFinite { operation: String },

    /// An instruction named a reporting function the resolver does not
    /// provide. Unreachable through the parser, which only accepts the
    /// known function names, but a hand-built AST can trigger it.
    #[error("unknown function: {name}")]
    UnknownFunction { name: String },
}
