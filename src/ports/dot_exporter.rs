//! Call Graph DOT Exporter
//!
//! Serializes a finished CallGraph as Graphviz DOT. Root invocations (no
//! inbound edge) are styled distinctly from ordinary calls.

use std::collections::HashSet;
use std::io::Result;
use std::path::Path;

use crate::domain::callgraph::CallGraph;
use crate::domain::identity::StableCallId;

pub struct DotExporter;

impl DotExporter {
    /// Export a CallGraph to a DOT file.
    pub fn export(graph: &CallGraph, path: &Path) -> Result<()> {
        let content = Self::to_dot(graph);
        std::fs::write(path, content)
    }

    /// Convert a CallGraph to a DOT string.
    pub fn to_dot(graph: &CallGraph) -> String {
        let mut lines = Vec::new();

        lines.push("digraph CallGraph {".to_string());
        lines.push("    rankdir=TB;".to_string());
        lines.push("    node [fontname=\"Helvetica\", fontsize=12, shape=box];".to_string());
        lines.push("    edge [fontname=\"Helvetica\", fontsize=10];".to_string());
        lines.push("".to_string());

        let targets: HashSet<StableCallId> = graph.edges.iter().map(|e| e.to).collect();

        for node in &graph.nodes {
            let (style, color) = if targets.contains(&node.id) {
                ("filled", "#89b4fa") // Blue: ordinary call
            } else {
                ("filled,rounded", "#a6e3a1") // Green: root invocation
            };
            let label = Self::escape_label(&node.label);
            lines.push(format!(
                "    \"{}\" [label=\"{}\", style=\"{}\", fillcolor=\"{}\"];",
                node.id, label, style, color
            ));
        }

        lines.push("".to_string());

        for edge in &graph.edges {
            lines.push(format!("    \"{}\" -> \"{}\";", edge.from, edge.to));
        }

        lines.push("}".to_string());

        lines.join("\n")
    }

    fn escape_label(label: &str) -> String {
        label
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    }
}
