// Command-line entry point for GraphMe.
//
// Traces the built-in demo workloads (recursive fibonacci, square) through
// the simulated runtime and renders the resulting call graph.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;

use graphme::application::{HookSlot, TraceSession};
use graphme::domain::event::LocalValue;
use graphme::infrastructure::{graphviz, GraphvizRenderer, SimulatedRuntime};
use graphme::ports::{GraphRenderer, OutputFormat, RenderOptions};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input for the recursive fibonacci demo workload
    #[arg(long, default_value_t = 4)]
    fibo: i64,

    /// Also trace square(x) after the fibonacci run
    #[arg(long)]
    square: Option<i64>,

    /// Output destination name, without extension
    #[arg(short, long, default_value = "graphme")]
    output: String,

    /// Output format (svg, png, pdf, dot, json)
    #[arg(short, long, default_value = "svg")]
    format: String,

    /// TOML config file with `destination` and `format` (overrides the flags)
    #[arg(short, long)]
    config: Option<String>,

    /// Open the rendered artifact when done
    #[arg(long)]
    view: bool,
}

fn fibo(rt: &mut SimulatedRuntime, n: i64) -> i64 {
    rt.call("fibo", vec![("n".to_string(), LocalValue::Int(n))], |rt| {
        if n <= 1 {
            n
        } else {
            fibo(rt, n - 1) + fibo(rt, n - 2)
        }
    })
}

fn square(rt: &mut SimulatedRuntime, x: i64) -> i64 {
    rt.call("square", vec![("x".to_string(), LocalValue::Int(x))], |_| x * x)
}

fn load_options(cli: &Cli) -> Result<RenderOptions> {
    if let Some(path) = &cli.config {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file: {}", path))?;
        let options: RenderOptions =
            toml::from_str(&content).with_context(|| format!("Invalid config file: {}", path))?;
        return Ok(options);
    }

    let Some(format) = OutputFormat::from_str(&cli.format) else {
        bail!("Unsupported format: {} (expected svg, png, pdf, dot or json)", cli.format);
    };
    Ok(RenderOptions {
        destination: cli.output.clone(),
        format,
    })
}

fn run(cli: &Cli) -> Result<()> {
    let options = load_options(cli)?;

    let slot = HookSlot::new();
    let session = TraceSession::activate(&slot).context("Instrumentation unavailable")?;

    let mut rt = SimulatedRuntime::new(&slot);
    let result = fibo(&mut rt, cli.fibo);
    println!("[GRAPHME] fibo({}) = {}", cli.fibo, result);
    if let Some(x) = cli.square {
        println!("[GRAPHME] square({}) = {}", x, square(&mut rt, x));
    }
    // Exit-time bookkeeping call; excluded from the graph by its flag.
    rt.boundary_call("finish");

    let graph = session.finish();
    println!(
        "[GRAPHME] Captured {} calls, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    );

    let renderer = GraphvizRenderer;
    let artifact = match renderer.render(&graph, &options) {
        Ok(artifact) => artifact,
        Err(e) => {
            // The trace itself is intact; point at the DOT serialization
            // that survived the failed Graphviz stage.
            if let Some(dot) = graphviz::surviving_dot_path(&options) {
                eprintln!(
                    "[RENDER] Rendering failed; the trace is kept as DOT at {}",
                    dot.display()
                );
            }
            return Err(e);
        }
    };
    println!(
        "Trace completed! Output written to {} (format: {})",
        artifact.display(),
        options.format
    );

    if cli.view {
        renderer.display(&artifact)?;
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}
