// Ports: rendering interfaces the core emits its finished graph through.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::domain::callgraph::CallGraph;

pub mod dot_exporter;

/// Artifact encodings a renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
    /// Raw Graphviz DOT, no external tooling involved.
    Dot,
    /// Node/edge lists as JSON.
    Json,
}

impl OutputFormat {
    /// Parse format from string (CLI or config input).
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "svg" => Some(OutputFormat::Svg),
            "png" => Some(OutputFormat::Png),
            "pdf" => Some(OutputFormat::Pdf),
            "dot" => Some(OutputFormat::Dot),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    /// File extension of the produced artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    /// True when producing this format requires the Graphviz `dot` binary.
    pub fn needs_graphviz(&self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Png | OutputFormat::Pdf)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Session output configuration: where the artifact goes and how it is
/// encoded. Deserializable so it can be loaded from a TOML config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Destination name, without extension.
    pub destination: String,
    pub format: OutputFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            destination: "graphme".to_string(),
            format: OutputFormat::Svg,
        }
    }
}

/// External graph-drawing facility. The core only enumerates nodes and edges
/// once, after the session ends; ordering is irrelevant.
pub trait GraphRenderer {
    /// Produce a visual artifact for the graph, returning its path.
    /// Failures are recoverable: the in-memory graph stays valid.
    fn render(&self, graph: &CallGraph, options: &RenderOptions) -> Result<PathBuf>;

    /// Open a rendered artifact for viewing.
    fn display(&self, artifact: &Path) -> Result<()>;
}
