use clap::{Parser, Subcommand};
use std::path::Path;
use tessera_parser::{Diagnostic, Report};
use tessera_render::{Context, Functions, Template, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Tessera: an HTML-like template engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a template to stdout
    Render {
        /// Input template file
        path: String,

        /// JSON object of values to render against
        #[arg(long, value_name = "FILE")]
        values: Option<String>,

        /// Bind a single value (repeatable); numbers are typed automatically
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Bind every placeholder key to its own name before other values
        #[arg(long)]
        echo: bool,
    },

    /// Check a template for errors without rendering it
    Check {
        /// Input template file
        path: String,

        /// Print the diagnostics report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the parse tree, one arena slot per line
    Tree {
        /// Input template file
        path: String,
    },

    /// List the value keys and functions a template references
    Keys {
        /// Input template file
        path: String,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            path,
            values,
            set,
            echo,
        } => cmd_render(&path, values.as_deref(), &set, echo),
        Command::Check { path, json } => cmd_check(&path, json),
        Command::Tree { path } => cmd_tree(&path),
        Command::Keys { path } => cmd_keys(&path),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn print_diagnostic(path: &str, label: &str, d: &Diagnostic) {
    eprintln!("{path}:{}:{}: {label}: {}", d.line, d.column, d.kind);
}

fn print_report(path: &str, report: &Report) {
    for warning in report.warnings() {
        print_diagnostic(path, "warning", warning);
    }
    if let Some(fatal) = report.fatal() {
        print_diagnostic(path, "error", fatal);
    }
}

/// Parse a template, printing warnings. Exits on a fatal error.
fn parse_template<'src>(path: &str, source: &'src str) -> Template<'src> {
    match Template::parse(source) {
        Ok(template) => {
            for warning in template.warnings() {
                print_diagnostic(path, "warning", warning);
            }
            template
        }
        Err(e) => {
            eprintln!("{path}: {e}");
            std::process::exit(1);
        }
    }
}

fn read_values(path: &str) -> Context {
    let json = read_source(path);
    match serde_json::from_str(&json) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error reading values from {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_render(path: &str, values: Option<&str>, set: &[String], echo: bool) {
    let source = read_source(path);
    let template = parse_template(path, &source);

    let mut ctx = if echo {
        Context::echo(template.keys())
    } else {
        Context::new()
    };
    if let Some(values) = values {
        for (key, value) in read_values(values).iter() {
            ctx.set(key, value.clone());
        }
    }
    for pair in set {
        let Some((key, value)) = pair.split_once('=') else {
            eprintln!("Error: expected KEY=VALUE, got '{pair}'");
            std::process::exit(1);
        };
        ctx.set(key.trim(), Value::infer(value));
    }

    match template.render(&mut ctx, &Functions::new()) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn cmd_check(path: &str, json: bool) {
    let source = read_source(path);
    let report = tessera_parser::Parser::parse(&source).report;

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print_report(path, &report);
    }

    if report.has_fatal() {
        std::process::exit(1);
    }
    if !json {
        eprintln!("OK: {path}");
    }
}

fn cmd_tree(path: &str) {
    let source = read_source(path);
    let parsed = tessera_parser::Parser::parse(&source);
    print!("{}", parsed.tree.dump());
    print_report(path, &parsed.report);
    if parsed.report.has_fatal() {
        std::process::exit(1);
    }
}

fn cmd_keys(path: &str) {
    let source = read_source(path);
    let template = parse_template(path, &source);
    for key in template.keys() {
        println!("{key}");
    }
    for name in template.function_names() {
        println!("${name}");
    }
}
