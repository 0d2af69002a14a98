//! nlex-core: NLex language front end.
//!
//! Provides the lexical scanner and the recursive-descent parser from
//! NLex source text to the [`Ast`] record. Both stages accumulate their
//! errors next to partial output and never abort a run: the host is
//! expected to surface every error category together with whatever was
//! recognized.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`analyze()`] -- run scanner and parser in one call
//! - [`tokenize()`] / [`parse()`] -- the individual stages
//! - [`Ast`], [`Operation`], [`Operand`], [`Instruction`] -- AST types
//! - [`LexError`], [`SyntaxError`] -- the two front-end error records

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{Arg, Ast, Instruction, Operand, Operation};
pub use error::{LexError, LexErrorKind, SyntaxError, SyntaxErrorKind};
pub use lexer::{tokenize, LexResult, Spanned, Token};
pub use parser::parse;

/// Combined scanner and parser output for one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub tokens: Vec<Spanned>,
    pub lexical_errors: Vec<LexError>,
    pub ast: Ast,
    pub syntactic_errors: Vec<SyntaxError>,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        !self.lexical_errors.is_empty() || !self.syntactic_errors.is_empty()
    }
}

/// Scan and parse a source text in one call.
pub fn analyze(source: &str) -> Analysis {
    let lexed = lexer::tokenize(source);
    let (ast, syntactic_errors) = parser::parse(&lexed.tokens);
    Analysis {
        tokens: lexed.tokens,
        lexical_errors: lexed.errors,
        ast,
        syntactic_errors,
    }
}
