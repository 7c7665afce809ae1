//! dependency-diagram CLI entry point.

use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use dependency_diagram::{
    DependencyGraph, LayoutConfig, Optimize, Result, layout, load_modules, render_svg,
};

/// Module dependency declarations to a layered SVG diagram.
#[derive(Parser, Debug)]
#[command(
    name = "dependency-diagram",
    version = env!("DEPENDENCY_DIAGRAM_VERSION"),
    about = "Module dependency declarations to a layered SVG diagram"
)]
struct Cli {
    /// Declaration file (reads from stdin if not provided)
    input: Option<String>,

    /// Write output to this file instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Heuristic placement only, no branch-and-bound search
    #[arg(long = "no-optimize")]
    no_optimize: bool,

    /// Search budget in milliseconds; negative or absent searches exhaustively
    #[arg(short = 't', long = "deadline-ms", allow_negative_numbers = true)]
    deadline_ms: Option<i64>,

    /// Search worker threads
    #[arg(short = 'j', long = "workers", default_value = "1")]
    workers: usize,

    /// Print the level report instead of the diagram
    #[arg(long = "levels")]
    levels: bool,

    /// Diagnostics on stderr: -v for metrics, -vv for search progress
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("warning: cannot install log subscriber: {}", e);
    }
}

fn run(cli: &Cli, text: &str) -> Result<String> {
    let graph = DependencyGraph::new(load_modules(text)?)?;
    if cli.levels {
        return Ok(graph.level_report().to_string());
    }

    let optimize = if cli.no_optimize {
        Optimize::Off
    } else {
        Optimize::from_deadline_ms(cli.deadline_ms)
    };
    let config = LayoutConfig::default()
        .with_optimize(optimize)
        .with_workers(cli.workers);

    let result = layout(&graph, &config)?;
    Ok(render_svg(&result))
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Read input from file or stdin
    let text = if let Some(ref path) = cli.input {
        match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: cannot read '{}': {}", path, e);
                process::exit(1);
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(e) = io::stdin().read_to_string(&mut buf) {
            eprintln!("error: cannot read stdin: {}", e);
            process::exit(1);
        }
        buf
    };

    let rendered = match run(&cli, &text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    // Write output to file or stdout
    if let Some(ref path) = cli.output {
        if let Err(e) = fs::write(path, rendered) {
            eprintln!("error: cannot write '{}': {}", path, e);
            process::exit(1);
        }
    } else {
        print!("{}", rendered);
        if let Err(e) = io::stdout().flush() {
            eprintln!("error: cannot flush stdout: {}", e);
            process::exit(1);
        }
    }
}
