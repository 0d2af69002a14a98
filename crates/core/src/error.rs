use std::fmt;

use serde::{Deserialize, Serialize};

/// Lexical error kinds, serialized under their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LexErrorKind {
    #[serde(rename = "UNCLOSED_STRING")]
    UnclosedString,
    #[serde(rename = "INVALID_SYMBOL")]
    InvalidSymbol,
}

/// A recoverable scanner error. `value` carries the offending lexeme:
/// the partial content of an unclosed string, or the stray character
/// run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub value: String,
    pub line: u32,
    pub column: u32,
}

impl LexError {
    pub fn unclosed_string(value: impl Into<String>, line: u32, column: u32) -> Self {
        LexError {
            kind: LexErrorKind::UnclosedString,
            value: value.into(),
            line,
            column,
        }
    }

    pub fn invalid_symbol(value: impl Into<String>, line: u32, column: u32) -> Self {
        LexError {
            kind: LexErrorKind::InvalidSymbol,
            value: value.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::UnclosedString => write!(
                f,
                "line {}, column {}: unclosed string literal \"{}\"",
                self.line, self.column, self.value
            ),
            LexErrorKind::InvalidSymbol => write!(
                f,
                "line {}, column {}: invalid symbol '{}'",
                self.line, self.column, self.value
            ),
        }
    }
}

/// The single syntactic error kind, kept as an enum so the wire name
/// stays in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxErrorKind {
    #[serde(rename = "ERROR_SINTACTICO")]
    Sintactico,
}

/// A located parser error. `value` is the offending token's lexeme,
/// empty when the error fired at end of input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub value: String,
}

impl SyntaxError {
    pub fn new(
        message: impl Into<String>,
        line: u32,
        column: u32,
        value: impl Into<String>,
    ) -> Self {
        SyntaxError {
            kind: SyntaxErrorKind::Sintactico,
            message: message.into(),
            line,
            column,
            value: value.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "line {}, column {}: {}", self.line, self.column, self.message)
        } else {
            write!(
                f,
                "line {}, column {}: {} (got '{}')",
                self.line, self.column, self.message, self.value
            )
        }
    }
}
