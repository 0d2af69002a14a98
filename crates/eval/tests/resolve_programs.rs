//! End-to-end evaluation tests: NLex source through the front end and
//! the resolver, checking results, error strings and the activity log.

use nlex_core::analyze;
use nlex_eval::{resolve, Resolver};
use serde_json::json;

fn resolve_source(source: &str) -> nlex_eval::Resolution {
    let analysis = analyze(source);
    assert!(
        !analysis.has_errors(),
        "front end rejected the program: {:?} {:?}",
        analysis.lexical_errors,
        analysis.syntactic_errors
    );
    resolve(&analysis.ast)
}

// ──────────────────────────────────────────────
// Arithmetic
// ──────────────────────────────────────────────

#[test]
fn resolves_a_simple_sum() {
    let resolution = resolve_source(r#"Operaciones = [{operacion: "suma", valor1: 2, valor2: 3}]"#);
    assert!(resolution.errors.is_empty());
    assert_eq!(
        serde_json::to_value(&resolution.results).unwrap(),
        json!([
            {"operacion": "suma", "valor1": 2.0, "valor2": 3.0, "resultado": 5.0}
        ])
    );
}

#[test]
fn nested_operation_feeds_the_outer_one() {
    let resolution = resolve_source(
        r#"Operaciones = [
            {operacion: "resta", valor1: [{operacion: "suma", valor1: 2, valor2: 3}], valor2: 4}
        ]"#,
    );
    assert!(resolution.errors.is_empty());
    assert_eq!(resolution.results.len(), 1);
    assert_eq!(resolution.results[0].result, 1.0);
    // The record echoes the nested operand as the one-element list the
    // source wrote.
    let record = serde_json::to_value(&resolution.results[0]).unwrap();
    assert_eq!(
        record["valor1"],
        json!([{"operacion": "suma", "valor1": 2.0, "valor2": 3.0}])
    );
}

#[test]
fn missing_second_value_produces_an_error_and_no_result() {
    let resolution = resolve_source(r#"Operaciones = [{operacion: "suma", valor1: 2}]"#);
    assert!(resolution.results.is_empty());
    assert_eq!(
        resolution.errors,
        vec!["missing second value for operation 'suma'"]
    );
}

#[test]
fn domain_errors_surface_per_operation() {
    let resolution = resolve_source(
        r#"Operaciones = [
            {operacion: "division", valor1: 1, valor2: 0},
            {operacion: "mod", valor1: 5, valor2: 0},
            {operacion: "raiz", valor1: 1, valor2: 2},
            {operacion: "inverso", valor1: 4}
        ]"#,
    );
    assert_eq!(resolution.errors, vec!["division by zero", "modulo by zero"]);
    assert_eq!(resolution.results.len(), 2);
    assert_eq!(resolution.results[0].operation, "raiz");
    assert_eq!(resolution.results[1].result, 0.25);
}

#[test]
fn negative_root_base_is_rejected() {
    let analysis = analyze(r#"Operaciones = [{operacion: "raiz", valor1: 5, valor2: 2}]"#);
    // Negative literals do not exist in the surface grammar, so drive
    // the resolver with a patched operand.
    let mut ast = analysis.ast;
    ast.operations[0]
        .entries
        .insert("valor1".to_owned(), nlex_core::Operand::Number(-1.0));
    let resolution = resolve(&ast);
    assert!(resolution.results.is_empty());
    assert_eq!(
        resolution.errors,
        vec!["invalid root: base must be non-negative and index positive"]
    );
}

#[test]
fn trigonometry_reads_degrees() {
    let resolution = resolve_source(r#"Operaciones = [{operacion: "seno", valor1: 90}]"#);
    assert!(resolution.errors.is_empty());
    assert!((resolution.results[0].result - 1.0).abs() < 1e-12);
}

// ──────────────────────────────────────────────
// Instructions and logs
// ──────────────────────────────────────────────

#[test]
fn reporting_functions_run_after_the_operations() {
    let resolution = resolve_source(
        r#"Operaciones = [
            {operacion: "suma", valor1: 2, valor2: 3},
            {operacion: "suma", valor1: 10, valor2: 20},
            {operacion: "resta", valor1: 5, valor2: 1}
        ]
        conteo()
        promedio("suma")
        max("suma")
        min("resta")
        imprimir("fin")"#,
    );
    assert!(resolution.errors.is_empty());
    assert_eq!(
        serde_json::to_value(&resolution.logs).unwrap(),
        json!([
            {"accion": "conteo", "total": 3},
            {"accion": "promedio", "operacion": "suma", "promedio": 17.5},
            {"accion": "max", "operacion": "suma", "maximo": 30.0},
            {"accion": "min", "operacion": "resta", "minimo": 4.0},
            {"accion": "imprimir", "mensaje": "fin"}
        ])
    );
}

#[test]
fn errores_report_sees_earlier_evaluation_errors() {
    let resolution = resolve_source(
        r#"Operaciones = [{operacion: "division", valor1: 1, valor2: 0}]
        generarReporte("errores")"#,
    );
    assert_eq!(
        serde_json::to_value(&resolution.logs[0]).unwrap(),
        json!({
            "accion": "reporte",
            "tipo": "errores",
            "extra": "Sin información adicional",
            "contenido": ["division by zero"]
        })
    );
}

#[test]
fn tokens_report_carries_the_snapshot() {
    let source = r#"Operaciones = [{operacion: "suma", valor1: 2, valor2: 3}]
generarReporte("tokens")"#;
    let analysis = analyze(source);
    assert!(!analysis.has_errors());
    let mut resolver = Resolver::with_tokens(&analysis.ast, &analysis.tokens);
    resolver.resolve();
    resolver.execute_instructions();
    let resolution = resolver.into_resolution();

    let entry = serde_json::to_value(&resolution.logs[0]).unwrap();
    assert_eq!(entry["tipo"], json!("tokens"));
    let contenido = entry["contenido"].as_array().unwrap();
    assert_eq!(contenido.len(), analysis.tokens.len());
    assert_eq!(contenido[0]["kind"], json!("IDENTIFIER"));
    assert_eq!(contenido[0]["value"], json!("Operaciones"));
}

#[test]
fn arbol_report_embeds_the_whole_ast() {
    let source = r#"Operaciones = [{operacion: "suma", valor1: 2, valor2: 3}]
generarReporte("arbol", "completo")"#;
    let analysis = analyze(source);
    let resolution = resolve(&analysis.ast);
    let entry = serde_json::to_value(&resolution.logs[0]).unwrap();
    assert_eq!(entry["extra"], json!("completo"));
    assert_eq!(
        entry["contenido"],
        serde_json::to_value(&analysis.ast).unwrap()
    );
}

// ──────────────────────────────────────────────
// Damaged programs
// ──────────────────────────────────────────────

#[test]
fn front_end_damage_still_leaves_a_resolvable_ast() {
    // The unclosed string kills the imprimir call but the operations
    // block parses and resolves.
    let source = r#"Operaciones = [
        {operacion: "suma", valor1: 2, valor2: 3}
    ]
    imprimir("sin cierre"#;
    let analysis = analyze(source);
    assert!(!analysis.lexical_errors.is_empty());
    assert!(!analysis.syntactic_errors.is_empty());
    let resolution = resolve(&analysis.ast);
    assert_eq!(resolution.results.len(), 1);
    assert_eq!(resolution.results[0].result, 5.0);
    assert!(resolution.logs.is_empty());
}

#[test]
fn resolving_the_same_ast_twice_is_stable() {
    let analysis = analyze(
        r#"Operaciones = [{operacion: "potencia", valor1: 2, valor2: 10}]
        conteo()"#,
    );
    let first = resolve(&analysis.ast);
    let second = resolve(&analysis.ast);
    assert_eq!(first, second);
    assert_eq!(first.results[0].result, 1024.0);
}
