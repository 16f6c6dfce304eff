/// Graphviz Renderer.
///
/// Drives the external `dot` binary to turn a finished call graph into a
/// viewable artifact. DOT and JSON formats are produced directly, with no
/// external tooling.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::domain::callgraph::CallGraph;
use crate::ports::dot_exporter::DotExporter;
use crate::ports::{GraphRenderer, OutputFormat, RenderOptions};

pub struct GraphvizRenderer;

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, graph: &CallGraph, options: &RenderOptions) -> Result<PathBuf> {
        if options.format.needs_graphviz() {
            render_with_dot(graph, options)
        } else {
            render_direct(graph, options)
        }
    }

    fn display(&self, artifact: &Path) -> Result<()> {
        let opener = platform_opener();
        let status = Command::new(opener)
            .arg(artifact)
            .status()
            .with_context(|| format!("Failed to execute {}", opener))?;
        if !status.success() {
            bail!("{} failed with exit code: {:?}", opener, status.code());
        }
        Ok(())
    }
}

fn artifact_path(options: &RenderOptions) -> PathBuf {
    PathBuf::from(format!("{}.{}", options.destination, options.format.extension()))
}

fn dot_path(options: &RenderOptions) -> PathBuf {
    PathBuf::from(format!("{}.dot", options.destination))
}

/// Formats produced without external tooling: DOT and JSON.
fn render_direct(graph: &CallGraph, options: &RenderOptions) -> Result<PathBuf> {
    let artifact = artifact_path(options);
    let content = match options.format {
        OutputFormat::Json => serde_json::to_string_pretty(graph)?,
        _ => DotExporter::to_dot(graph),
    };
    std::fs::write(&artifact, content)
        .with_context(|| format!("Failed to write {}", artifact.display()))?;
    Ok(artifact)
}

/// Write the intermediate DOT file, then run `dot` over it.
///
/// The DOT file is written before the Graphviz stage, so a missing or failing
/// `dot` binary still leaves a usable serialization of the trace behind.
fn render_with_dot(graph: &CallGraph, options: &RenderOptions) -> Result<PathBuf> {
    let dot_path = dot_path(options);
    DotExporter::export(graph, &dot_path)
        .with_context(|| format!("Failed to write {}", dot_path.display()))?;

    check_dot_available()?;

    let artifact = artifact_path(options);
    println!("[RENDER] Generating {} artifact: {}", options.format, artifact.display());

    let spec = build_render_command(options.format, &dot_path, &artifact);
    let status = Command::new(&spec.program)
        .args(&spec.args)
        .status()
        .with_context(|| format!("Failed to execute {}", spec.program))?;

    if !status.success() {
        bail!("dot failed with exit code: {:?}", status.code());
    }

    if !artifact.exists() {
        bail!("Expected artifact was not created at: {}", artifact.display());
    }

    Ok(artifact)
}

/// Check that the Graphviz `dot` binary is reachable.
fn check_dot_available() -> Result<()> {
    let check = Command::new("dot").arg("-V").output();

    match check {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => {
            bail!("dot found but returned error: {:?}", output.status.code());
        }
        Err(_) => {
            bail!("dot not found in PATH. Install Graphviz (https://graphviz.org/download/).");
        }
    }
}

/// Intermediate DOT file left behind when the Graphviz stage failed, if any.
///
/// Lets a caller point the user at the surviving serialization of the trace
/// instead of discarding it. Direct formats have no intermediate file.
pub fn surviving_dot_path(options: &RenderOptions) -> Option<PathBuf> {
    if !options.format.needs_graphviz() {
        return None;
    }
    let path = dot_path(options);
    path.exists().then_some(path)
}

fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder (for unit tests)
// ═══════════════════════════════════════════════════════════════════════════

/// Describes the `dot` invocation for a given format, without executing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderCommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

/// Build the command specification for one render (testable function).
pub fn build_render_command(
    format: OutputFormat,
    dot_path: &Path,
    artifact: &Path,
) -> RenderCommandSpec {
    RenderCommandSpec {
        program: "dot".to_string(),
        args: vec![
            format!("-T{}", format.extension()),
            "-o".to_string(),
            artifact.to_string_lossy().to_string(),
            dot_path.to_string_lossy().to_string(),
        ],
    }
}
