//! End-to-end front-end tests: source text through scanner and parser,
//! checking the JSON surface of tokens, AST and error records.

use nlex_core::{analyze, Operand};
use serde_json::json;

// ──────────────────────────────────────────────
// Clean programs
// ──────────────────────────────────────────────

#[test]
fn analyzes_a_program_with_every_construct_kind() {
    let source = r##"
// operaciones de ejemplo
Operaciones = [
    {nombre: "primera", operacion: "suma", valor1: 2, valor2: 3},
    {operacion: "resta", valor1: [{operacion: "suma", valor1: 1, valor2: 1}], valor2: 1}
]
ConfiguracionesLex = [fondo: "#D3D3D3", fuente: "#000000"]
ConfiguracionesParser = [forma: "box"]
imprimir("listo")
conteo()
"##;
    let analysis = analyze(source);
    assert!(analysis.lexical_errors.is_empty(), "{:?}", analysis.lexical_errors);
    assert!(analysis.syntactic_errors.is_empty(), "{:?}", analysis.syntactic_errors);
    assert!(!analysis.has_errors());
    assert_eq!(analysis.ast.operations.len(), 2);
    assert_eq!(analysis.ast.instructions.len(), 2);
    assert_eq!(
        analysis.ast.lex_config.get("fondo"),
        Some(&"#D3D3D3".to_owned())
    );
}

#[test]
fn ast_json_uses_camel_case_and_resurrects_nested_wrappers() {
    let source = r#"Operaciones = [
        {operacion: "resta", valor1: [{operacion: "suma", valor1: 1, valor2: 1}], valor2: 1}
    ]
    ConfiguracionesParser = [tipoFuente: "Courier"]
    generarReporte("arbol")"#;
    let analysis = analyze(source);
    assert!(!analysis.has_errors());
    let value = serde_json::to_value(&analysis.ast).unwrap();
    assert_eq!(
        value,
        json!({
            "operations": [
                {
                    "operacion": "resta",
                    "valor1": [{"operacion": "suma", "valor1": 1.0, "valor2": 1.0}],
                    "valor2": 1.0,
                }
            ],
            "lexConfig": {},
            "parserConfig": {"tipoFuente": "Courier"},
            "instructions": [
                {"functionName": "generarReporte", "arguments": ["arbol"]}
            ],
        })
    );
}

#[test]
fn token_dump_round_trips_through_json_records() {
    let analysis = analyze("valor1: 2.5");
    assert!(!analysis.has_errors());
    let records: Vec<serde_json::Value> = analysis
        .tokens
        .iter()
        .map(|t| t.to_json_value())
        .collect();
    assert_eq!(
        records,
        vec![
            json!({"kind": "KEYWORD", "value": "valor1", "line": 1, "column": 7}),
            json!({"kind": "COLON", "value": ":", "line": 1, "column": 7}),
            json!({"kind": "NUMBER", "value": 2.5, "line": 1, "column": 12}),
        ]
    );
}

// ──────────────────────────────────────────────
// Broken programs
// ──────────────────────────────────────────────

#[test]
fn lexical_and_syntactic_errors_are_reported_side_by_side() {
    // Stray '@' is a lexical error; the parser then sees `Operaciones =`
    // with no bracket and reports its own error.
    let analysis = analyze("@ Operaciones = 5");
    assert_eq!(analysis.lexical_errors.len(), 1);
    assert_eq!(
        serde_json::to_value(&analysis.lexical_errors[0]).unwrap(),
        json!({"kind": "INVALID_SYMBOL", "value": "@", "line": 1, "column": 1})
    );
    assert_eq!(analysis.syntactic_errors.len(), 1);
    assert_eq!(analysis.syntactic_errors[0].message, "expected '[' after '='");
    assert!(analysis.has_errors());
}

#[test]
fn unclosed_string_surfaces_as_a_lexical_error_only() {
    let analysis = analyze(r#"imprimir("sin cierre"#);
    assert_eq!(analysis.lexical_errors.len(), 1);
    assert_eq!(
        serde_json::to_value(&analysis.lexical_errors[0]).unwrap(),
        json!({"kind": "UNCLOSED_STRING", "value": "sin cierre", "line": 1, "column": 10})
    );
    // The parser still runs over the tokens that did scan: `imprimir (`
    // is now missing its closing parenthesis.
    assert_eq!(analysis.syntactic_errors.len(), 1);
    assert_eq!(
        analysis.syntactic_errors[0].message,
        "expected ')' to close the function call"
    );
}

#[test]
fn syntactic_error_records_carry_the_spanish_kind_tag() {
    let analysis = analyze("Operaciones = 5");
    let record = serde_json::to_value(&analysis.syntactic_errors[0]).unwrap();
    assert_eq!(record["kind"], "ERROR_SINTACTICO");
    assert_eq!(record["message"], "expected '[' after '='");
    assert_eq!(record["value"], "5");
}

#[test]
fn partial_ast_survives_a_broken_trailing_construct() {
    let source = r#"Operaciones = [{operacion: "suma", valor1: 4, valor2: 4}]
ConfiguracionesLex = [fondo"#;
    let analysis = analyze(source);
    assert_eq!(analysis.ast.operations.len(), 1);
    assert_eq!(
        analysis.ast.operations[0].valor1(),
        Some(&Operand::Number(4.0))
    );
    assert!(analysis.ast.lex_config.is_empty());
    assert!(!analysis.syntactic_errors.is_empty());
}
