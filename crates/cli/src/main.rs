use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use nlex_core::analyze;
use nlex_eval::graph::{to_dot, GraphStyle};
use nlex_eval::{Resolution, ResolvedOperation, Resolver};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// NLex operation language toolchain.
#[derive(Parser)]
#[command(name = "nlex", version, about = "NLex operation language toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan and parse a source file, reporting tokens, AST and errors
    Analyze {
        /// Path to the NLex source file
        file: PathBuf,
    },

    /// Evaluate a source file's operations and run its instructions
    Resolve {
        /// Path to the NLex source file
        file: PathBuf,
    },

    /// Render a source file's resolved operations as Graphviz DOT
    Graph {
        /// Path to the NLex source file
        file: PathBuf,
        /// Write the DOT text to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Node fill color, overriding source config
        #[arg(long)]
        background: Option<String>,
        /// Node font color, overriding source config
        #[arg(long)]
        font_color: Option<String>,
        /// Default node shape, overriding source config
        #[arg(long)]
        shape: Option<String>,
        /// Node font family, overriding source config
        #[arg(long)]
        font_name: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze { file } => {
            cmd_analyze(&file, cli.output, cli.quiet);
        }
        Commands::Resolve { file } => {
            cmd_resolve(&file, cli.output, cli.quiet);
        }
        Commands::Graph {
            file,
            out,
            background,
            font_color,
            shape,
            font_name,
        } => {
            let overrides = StyleOverrides {
                background,
                font_color,
                shape,
                font_name,
            };
            cmd_graph(&file, out.as_deref(), overrides, cli.output, cli.quiet);
        }
    }
}

// ──────────────────────────────────────────────
// Subcommands
// ──────────────────────────────────────────────

fn cmd_analyze(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file, output, quiet);
    let analysis = analyze(&source);

    match output {
        OutputFormat::Json => {
            let tokens: Vec<serde_json::Value> =
                analysis.tokens.iter().map(|t| t.to_json_value()).collect();
            print_json(&json!({
                "tokens": tokens,
                "lexicalErrors": &analysis.lexical_errors,
                "ast": &analysis.ast,
                "syntacticErrors": &analysis.syntactic_errors,
            }));
        }
        OutputFormat::Text => {
            println!("tokens: {}", analysis.tokens.len());
            println!("operations: {}", analysis.ast.operations.len());
            println!("instructions: {}", analysis.ast.instructions.len());
            for error in &analysis.lexical_errors {
                report_error(&format!("lexical error: {}", error), output, quiet);
            }
            for error in &analysis.syntactic_errors {
                report_error(&format!("syntax error: {}", error), output, quiet);
            }
        }
    }

    if analysis.has_errors() {
        process::exit(1);
    }
}

fn cmd_resolve(file: &Path, output: OutputFormat, quiet: bool) {
    let source = read_source(file, output, quiet);
    let analysis = analyze(&source);
    let resolution = run_resolver(&analysis);

    match output {
        OutputFormat::Json => {
            print_json(&json!({
                "results": &resolution.results,
                "errors": &resolution.errors,
                "logs": &resolution.logs,
                "lexicalErrors": &analysis.lexical_errors,
                "syntacticErrors": &analysis.syntactic_errors,
            }));
        }
        OutputFormat::Text => {
            println!("results: {}", resolution.results.len());
            for record in &resolution.results {
                println!("{}", describe_result(record));
            }
            if !resolution.logs.is_empty() {
                println!("logs: {}", resolution.logs.len());
                for log in &resolution.logs {
                    let line = serde_json::to_string(log)
                        .unwrap_or_else(|e| format!("serialization error: {}", e));
                    println!("{}", line);
                }
            }
            report_analysis_errors(&analysis, output, quiet);
            for error in &resolution.errors {
                report_error(&format!("evaluation error: {}", error), output, quiet);
            }
        }
    }

    if analysis.has_errors() || !resolution.errors.is_empty() {
        process::exit(1);
    }
}

struct StyleOverrides {
    background: Option<String>,
    font_color: Option<String>,
    shape: Option<String>,
    font_name: Option<String>,
}

fn cmd_graph(
    file: &Path,
    out: Option<&Path>,
    overrides: StyleOverrides,
    output: OutputFormat,
    quiet: bool,
) {
    let source = read_source(file, output, quiet);
    let analysis = analyze(&source);
    let resolution = run_resolver(&analysis);

    // Style layering: built-in defaults, then the source's config
    // blocks, then explicit flags.
    let mut style = default_style();
    style.apply_config(&analysis.ast.lex_config);
    style.apply_config(&analysis.ast.parser_config);
    if let Some(background) = overrides.background {
        style.background = background;
    }
    if let Some(font_color) = overrides.font_color {
        style.font_color = font_color;
    }
    if let Some(shape) = overrides.shape {
        style.shape = shape;
    }
    if let Some(font_name) = overrides.font_name {
        style.font_name = font_name;
    }

    // The graph renders whatever resolved; damage is reported on
    // stderr without failing the command.
    report_analysis_errors(&analysis, output, quiet);
    for error in &resolution.errors {
        report_error(&format!("evaluation error: {}", error), output, quiet);
    }

    let dot = to_dot(&resolution.results, &style);
    match out {
        Some(path) => {
            if let Err(e) = fs::write(path, &dot) {
                let msg = format!("error writing '{}': {}", path.display(), e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
            if !quiet {
                println!("wrote {}", path.display());
            }
        }
        None => println!("{}", dot),
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn run_resolver(analysis: &nlex_core::Analysis) -> Resolution {
    let mut resolver = Resolver::with_tokens(&analysis.ast, &analysis.tokens);
    resolver.resolve();
    resolver.execute_instructions();
    resolver.into_resolution()
}

/// The style used when neither the source's config blocks nor the
/// command line override a field.
fn default_style() -> GraphStyle {
    GraphStyle {
        background: "#D3D3D3".to_owned(),
        font_color: "#000000".to_owned(),
        shape: "ellipse".to_owned(),
        font_name: "Arial".to_owned(),
    }
}

/// One result line for text output, e.g. `suma(2, 3) = 5`.
fn describe_result(record: &ResolvedOperation) -> String {
    let mut line = format!("{}(", record.operation);
    if let Some(valor1) = &record.valor1 {
        line.push_str(&valor1.to_string());
    }
    if let Some(valor2) = &record.valor2 {
        line.push_str(&format!(", {}", valor2));
    }
    line.push_str(&format!(") = {}", record.result));
    line
}

fn report_analysis_errors(analysis: &nlex_core::Analysis, output: OutputFormat, quiet: bool) {
    for error in &analysis.lexical_errors {
        report_error(&format!("lexical error: {}", error), output, quiet);
    }
    for error in &analysis.syntactic_errors {
        report_error(&format!("syntax error: {}", error), output, quiet);
    }
}

fn read_source(file: &Path, output: OutputFormat, quiet: bool) -> String {
    match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", file.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

fn print_json(value: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
