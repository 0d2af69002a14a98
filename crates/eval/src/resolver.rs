//! Resolution of parsed programs: arithmetic evaluation plus the
//! reporting functions that feed the activity log.
//!
//! The resolver walks `ast.operations` first, producing one result
//! record per operation that evaluates cleanly, then executes
//! `ast.instructions` in source order. A failed entry contributes an
//! error string and is skipped; it never halts the walk or suppresses
//! its siblings.

use serde::Serialize;
use serde_json::Value;

use nlex_core::ast::{Arg, Ast, Instruction, Operand, Operation};
use nlex_core::lexer::Spanned;

use crate::error::EvalError;
use crate::operator::Operator;

const NONE_FOUND: &str = "No se encontraron operaciones.";

// ──────────────────────────────────────────────
// Output records
// ──────────────────────────────────────────────

/// One successfully evaluated operation. `valor1`/`valor2` echo the
/// raw operands from the source (numbers, text or nested operations),
/// not the resolved numbers, so hosts can show the derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOperation {
    #[serde(rename = "operacion")]
    pub operation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor1: Option<Operand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor2: Option<Operand>,
    #[serde(rename = "resultado")]
    pub result: f64,
}

/// An entry in the activity log, tagged on the wire with `accion`.
/// Reporting functions that find nothing to report log a `mensaje`
/// instead of their value field, matching the result surface hosts
/// already render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "accion", rename_all = "lowercase")]
pub enum LogEntry {
    Imprimir {
        #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
        message: Option<Arg>,
    },
    Conteo {
        total: usize,
    },
    Promedio {
        #[serde(rename = "operacion", skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
        #[serde(rename = "promedio", skip_serializing_if = "Option::is_none")]
        average: Option<f64>,
        #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Max {
        #[serde(rename = "operacion", skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
        #[serde(rename = "maximo", skip_serializing_if = "Option::is_none")]
        maximum: Option<f64>,
        #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Min {
        #[serde(rename = "operacion", skip_serializing_if = "Option::is_none")]
        operation: Option<String>,
        #[serde(rename = "minimo", skip_serializing_if = "Option::is_none")]
        minimum: Option<f64>,
        #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Reporte {
        #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
        kind: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        extra: Option<String>,
        #[serde(rename = "contenido", skip_serializing_if = "Option::is_none")]
        content: Option<Value>,
        #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// Everything a resolution run produced: result records for the
/// operations that evaluated, stringified errors for those that did
/// not, and the activity log appended by the reporting functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub results: Vec<ResolvedOperation>,
    pub errors: Vec<String>,
    pub logs: Vec<LogEntry>,
}

// ──────────────────────────────────────────────
// Resolver
// ──────────────────────────────────────────────

/// Evaluates an AST against the closed operator set and services the
/// reporting functions over the accumulated results.
///
/// The usual sequence is [`resolve`](Resolver::resolve), then
/// [`execute_instructions`](Resolver::execute_instructions), then
/// [`into_resolution`](Resolver::into_resolution); the reporting
/// methods are public so hosts can also drive them directly.
pub struct Resolver<'a> {
    ast: &'a Ast,
    tokens: Option<&'a [Spanned]>,
    results: Vec<ResolvedOperation>,
    errors: Vec<String>,
    logs: Vec<LogEntry>,
}

impl<'a> Resolver<'a> {
    pub fn new(ast: &'a Ast) -> Resolver<'a> {
        Resolver {
            ast,
            tokens: None,
            results: Vec::new(),
            errors: Vec::new(),
            logs: Vec::new(),
        }
    }

    /// Like [`new`](Resolver::new), but keeps a token snapshot so
    /// `generarReporte("tokens")` has content to report. Without one
    /// that report carries an empty list.
    pub fn with_tokens(ast: &'a Ast, tokens: &'a [Spanned]) -> Resolver<'a> {
        Resolver {
            tokens: Some(tokens),
            ..Resolver::new(ast)
        }
    }

    /// Evaluate every operation in the AST, in order. Each clean
    /// evaluation appends a result record; each failure appends at
    /// least one error string and no record.
    pub fn resolve(&mut self) {
        let ast = self.ast;
        for operation in &ast.operations {
            if let Some(result) = self.resolve_operation(operation) {
                self.results.push(ResolvedOperation {
                    operation: operation.name().unwrap_or_default().to_owned(),
                    valor1: operation.valor1().cloned(),
                    valor2: operation.valor2().cloned(),
                    result,
                });
            }
        }
    }

    /// Run the program's instruction list against the current results.
    /// Call after [`resolve`](Resolver::resolve) so `conteo`,
    /// `promedio`, `max` and `min` see the evaluated operations.
    pub fn execute_instructions(&mut self) {
        let ast = self.ast;
        for instruction in &ast.instructions {
            self.execute(instruction);
        }
    }

    /// Consume the resolver and hand back what it accumulated.
    pub fn into_resolution(self) -> Resolution {
        Resolution {
            results: self.results,
            errors: self.errors,
            logs: self.logs,
        }
    }

    // ── operation evaluation ──

    fn resolve_operation(&mut self, operation: &Operation) -> Option<f64> {
        let v1 = self.resolve_value(operation.valor1());
        let v2 = self.resolve_value(operation.valor2());

        let (name, operator) = match operation.operand("operacion") {
            Some(Operand::Text(text)) => (text.clone(), Operator::from_name(text)),
            Some(other) => (other.to_string(), None),
            None => {
                self.push_error(EvalError::MissingOperationName);
                return None;
            }
        };

        // Arity comes before the name lookup: an operation with no
        // resolvable first value reports the missing value even when
        // the name is unknown. Unknown names never demand a second
        // value; they fall through to the unknown-operation error.
        let Some(v1) = v1 else {
            self.push_error(EvalError::MissingValue { operation: name });
            return None;
        };
        if v2.is_none() && operator.is_some_and(|op| !op.is_unary()) {
            self.push_error(EvalError::MissingSecondValue { operation: name });
            return None;
        }
        let Some(operator) = operator else {
            self.push_error(EvalError::UnknownOperation { name });
            return None;
        };

        match operator.apply(v1, v2) {
            Ok(value) if value.is_finite() => Some(value),
            Ok(_) => {
                self.push_error(EvalError::NonFinite { operation: name });
                None
            }
            Err(error) => {
                self.push_error(error);
                None
            }
        }
    }

    /// Resolve one operand slot to a number. Absent slots are silent;
    /// nested operations recurse (their failures surface through the
    /// recursive call); text in a value slot is an error.
    fn resolve_value(&mut self, operand: Option<&Operand>) -> Option<f64> {
        match operand {
            None => None,
            Some(Operand::Number(value)) => Some(*value),
            Some(Operand::Nested(inner)) => self.resolve_operation(inner),
            Some(Operand::Text(text)) => {
                self.push_error(EvalError::InvalidValue {
                    value: text.clone(),
                });
                None
            }
        }
    }

    fn push_error(&mut self, error: EvalError) {
        self.errors.push(error.to_string());
    }

    // ── instruction dispatch ──

    fn execute(&mut self, instruction: &Instruction) {
        let first = instruction.arguments.first();
        match instruction.function_name.as_str() {
            "imprimir" => self.imprimir(first.cloned()),
            "conteo" => {
                self.conteo();
            }
            "promedio" => {
                let operation = first.map(|arg| arg.to_string());
                self.promedio(operation.as_deref());
            }
            "max" => {
                let operation = first.map(|arg| arg.to_string());
                self.max(operation.as_deref());
            }
            "min" => {
                let operation = first.map(|arg| arg.to_string());
                self.min(operation.as_deref());
            }
            "generarReporte" => {
                let kind = first.map(|arg| arg.to_string());
                let extra = instruction.arguments.get(1).map(|arg| arg.to_string());
                self.generar_reporte(kind.as_deref(), extra.as_deref());
            }
            _ => self.push_error(EvalError::UnknownFunction {
                name: instruction.function_name.clone(),
            }),
        }
    }

    // ── reporting functions ──

    /// Log a literal message.
    pub fn imprimir(&mut self, message: Option<Arg>) {
        self.logs.push(LogEntry::Imprimir { message });
    }

    /// Log and return how many operations evaluated cleanly.
    pub fn conteo(&mut self) -> usize {
        let total = self.results.len();
        self.logs.push(LogEntry::Conteo { total });
        total
    }

    /// Log and return the mean result over operations of one kind, or
    /// log a not-found message and return `None` when none matched.
    pub fn promedio(&mut self, operation: Option<&str>) -> Option<f64> {
        let values = self.filtered_results(operation);
        if values.is_empty() {
            self.logs.push(LogEntry::Promedio {
                operation: operation.map(ToOwned::to_owned),
                average: None,
                message: Some(NONE_FOUND.to_owned()),
            });
            return None;
        }
        let average = values.iter().sum::<f64>() / values.len() as f64;
        self.logs.push(LogEntry::Promedio {
            operation: operation.map(ToOwned::to_owned),
            average: Some(average),
            message: None,
        });
        Some(average)
    }

    /// Log and return the largest result over operations of one kind.
    pub fn max(&mut self, operation: Option<&str>) -> Option<f64> {
        let values = self.filtered_results(operation);
        if values.is_empty() {
            self.logs.push(LogEntry::Max {
                operation: operation.map(ToOwned::to_owned),
                maximum: None,
                message: Some(NONE_FOUND.to_owned()),
            });
            return None;
        }
        let maximum = values.into_iter().fold(f64::NEG_INFINITY, f64::max);
        self.logs.push(LogEntry::Max {
            operation: operation.map(ToOwned::to_owned),
            maximum: Some(maximum),
            message: None,
        });
        Some(maximum)
    }

    /// Log and return the smallest result over operations of one kind.
    pub fn min(&mut self, operation: Option<&str>) -> Option<f64> {
        let values = self.filtered_results(operation);
        if values.is_empty() {
            self.logs.push(LogEntry::Min {
                operation: operation.map(ToOwned::to_owned),
                minimum: None,
                message: Some(NONE_FOUND.to_owned()),
            });
            return None;
        }
        let minimum = values.into_iter().fold(f64::INFINITY, f64::min);
        self.logs.push(LogEntry::Min {
            operation: operation.map(ToOwned::to_owned),
            minimum: Some(minimum),
            message: None,
        });
        Some(minimum)
    }

    /// Log a report. `"tokens"` carries the token snapshot, `"errores"`
    /// the errors accumulated so far, `"arbol"` the AST itself; any
    /// other kind logs an unknown-report message.
    pub fn generar_reporte(&mut self, kind: Option<&str>, extra: Option<&str>) {
        let entry = match kind {
            Some("tokens") => LogEntry::Reporte {
                kind: Some("tokens".to_owned()),
                extra: None,
                content: Some(Value::Array(
                    self.tokens
                        .map(|tokens| tokens.iter().map(Spanned::to_json_value).collect())
                        .unwrap_or_default(),
                )),
                message: None,
            },
            Some("errores") => LogEntry::Reporte {
                kind: Some("errores".to_owned()),
                extra: Some(extra.unwrap_or("Sin información adicional").to_owned()),
                content: Some(Value::Array(
                    self.errors.iter().cloned().map(Value::String).collect(),
                )),
                message: None,
            },
            Some("arbol") => LogEntry::Reporte {
                kind: Some("arbol".to_owned()),
                extra: Some(extra.unwrap_or("Sin derivación").to_owned()),
                content: Some(serde_json::to_value(self.ast).unwrap_or(Value::Null)),
                message: None,
            },
            other => LogEntry::Reporte {
                kind: other.map(ToOwned::to_owned),
                extra: None,
                content: None,
                message: Some("Tipo de reporte desconocido.".to_owned()),
            },
        };
        self.logs.push(entry);
    }

    fn filtered_results(&self, operation: Option<&str>) -> Vec<f64> {
        self.results
            .iter()
            .filter(|record| Some(record.operation.as_str()) == operation)
            .map(|record| record.result)
            .collect()
    }
}
