//! Graphviz DOT rendering of resolved operations.
//!
//! The layout is fixed: a `digraph G` header, one node-defaults line
//! carrying the style, then per result an ellipse node labelled with
//! the operation and its result, plus a box leaf and an edge for each
//! operand the source provided. The closing brace has no trailing
//! newline, so emitted text is byte-stable across runs.

use std::collections::BTreeMap;

use crate::resolver::ResolvedOperation;

/// Visual attributes for the node-defaults line. A plain record with
/// no baked-in values; the caller supplies the base style and overlays
/// config on top.
///
/// Config blocks address these through the surface keys `fondo`
/// (background), `fuente` (font color), `forma` (shape) and
/// `tipoFuente` (font family).
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStyle {
    pub background: String,
    pub font_color: String,
    pub shape: String,
    pub font_name: String,
}

impl GraphStyle {
    /// Overlay the style keys a config block provides. Keys other than
    /// the four style keys are ignored.
    pub fn apply_config(&mut self, config: &BTreeMap<String, String>) {
        for (key, value) in config {
            match key.as_str() {
                "fondo" => self.background = value.clone(),
                "fuente" => self.font_color = value.clone(),
                "forma" => self.shape = value.clone(),
                "tipoFuente" => self.font_name = value.clone(),
                _ => {}
            }
        }
    }
}

/// Render result records as a DOT digraph. With no records the output
/// is just the header, the node-defaults line and the closing brace.
pub fn to_dot(results: &[ResolvedOperation], style: &GraphStyle) -> String {
    let mut graph = String::from("digraph G {\n");
    graph.push_str(&format!(
        "node [shape={}, style=filled, fillcolor=\"{}\", fontcolor=\"{}\", fontname=\"{}\"];\n",
        style.shape,
        escape(&style.background),
        escape(&style.font_color),
        escape(&style.font_name)
    ));

    for (index, record) in results.iter().enumerate() {
        graph.push_str(&format!(
            "op{} [label=\"Operación: {}\\nResultado: {}\", shape=ellipse];\n",
            index,
            escape(&record.operation),
            record.result
        ));
        if let Some(valor1) = &record.valor1 {
            graph.push_str(&format!(
                "op{}_v1 [label=\"Valor1: {}\", shape=box];\n",
                index,
                escape(&valor1.to_string())
            ));
            graph.push_str(&format!("op{} -> op{}_v1;\n", index, index));
        }
        if let Some(valor2) = &record.valor2 {
            graph.push_str(&format!(
                "op{}_v2 [label=\"Valor2: {}\", shape=box];\n",
                index,
                escape(&valor2.to_string())
            ));
            graph.push_str(&format!("op{} -> op{}_v2;\n", index, index));
        }
    }

    graph.push('}');
    graph
}

/// Escape a value for a double-quoted DOT string.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
