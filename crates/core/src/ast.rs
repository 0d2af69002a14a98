//! AST types for the NLex toolchain.
//!
//! These types are produced by the parser and consumed by the resolver
//! and the graph serializer. They live here so downstream crates can
//! import them without depending on the parser.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

// ──────────────────────────────────────────────
// Program
// ──────────────────────────────────────────────

/// The parsed program. Built incrementally by the parser: constructs
/// that fail to parse leave their fields untouched, so a partial AST is
/// always available next to the error list.
///
/// `operations` and `instructions` keep declaration order; the resolver
/// and the graph serializer index operations by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ast {
    pub operations: Vec<Operation>,
    pub lex_config: BTreeMap<String, String>,
    pub parser_config: BTreeMap<String, String>,
    pub instructions: Vec<Instruction>,
}

// ──────────────────────────────────────────────
// Operations
// ──────────────────────────────────────────────

/// One operation node: an ordered key/value mapping. The resolver reads
/// the `operacion`, `valor1` and `valor2` entries; any other key (such
/// as `nombre`) is kept and serialized but never interpreted. Duplicate
/// keys overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Operation {
    pub entries: BTreeMap<String, Operand>,
}

impl Operation {
    /// The operation name, when the `operacion` entry is present and
    /// holds text.
    pub fn name(&self) -> Option<&str> {
        match self.entries.get("operacion") {
            Some(Operand::Text(name)) => Some(name),
            _ => None,
        }
    }

    pub fn operand(&self, key: &str) -> Option<&Operand> {
        self.entries.get(key)
    }

    pub fn valor1(&self) -> Option<&Operand> {
        self.operand("valor1")
    }

    pub fn valor2(&self) -> Option<&Operand> {
        self.operand("valor2")
    }
}

/// An operand slot value.
///
/// The surface grammar writes a nested operation as a one-element
/// bracketed list; the parser collapses the wrapper into `Nested` and
/// serialization resurrects it, so a nested operand appears as a
/// one-element JSON array on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Text(String),
    Nested(Box<Operation>),
}

impl Serialize for Operand {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Operand::Number(value) => serializer.serialize_f64(*value),
            Operand::Text(text) => serializer.serialize_str(text),
            Operand::Nested(operation) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(operation.as_ref())?;
                seq.end()
            }
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(value) => write!(f, "{}", value),
            Operand::Text(text) => f.write_str(text),
            Operand::Nested(operation) => write!(f, "[{}]", operation.name().unwrap_or("?")),
        }
    }
}

// ──────────────────────────────────────────────
// Instructions
// ──────────────────────────────────────────────

/// A reporting-function call (`imprimir`, `conteo`, `promedio`, `max`,
/// `min`, `generarReporte`), executed by the resolver after the
/// operations pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub function_name: String,
    pub arguments: Vec<Arg>,
}

/// A function-call argument. Untagged on the wire: strings serialize
/// as strings, numbers as numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
    Str(String),
    Number(f64),
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(text) => f.write_str(text),
            Arg::Number(value) => write!(f, "{}", value),
        }
    }
}
