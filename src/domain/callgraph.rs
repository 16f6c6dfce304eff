// Call graph structures for GraphMe.
// One node per invocation, one edge per observed (caller, callee) pair.

use serde::Serialize;

use crate::domain::event::LocalValue;
use crate::domain::identity::StableCallId;

/// A node in the call graph: one distinct invocation.
#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: StableCallId,
    /// Display label: `function(arg=value, ...)` with non-scalars elided.
    pub label: String,
}

/// A caller -> callee edge. Duplicates are kept on purpose: the graph records
/// the call history, not a deduplicated topology.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    pub from: StableCallId,
    pub to: StableCallId,
}

/// The call graph itself. Read-only once the owning session ends.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CallGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CallGraph {
    pub fn node(&self, id: StableCallId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Number of edges pointing at `id`.
    pub fn inbound(&self, id: StableCallId) -> usize {
        self.edges.iter().filter(|e| e.to == id).count()
    }

    /// Nodes with no inbound edge (entries into the traced scope).
    pub fn roots(&self) -> Vec<&GraphNode> {
        self.nodes
            .iter()
            .filter(|n| self.inbound(n.id) == 0)
            .collect()
    }
}

/// Incrementally builds a [`CallGraph`] from resolved call events.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: CallGraph,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one invocation. Boundary calls (the tracer's own teardown) emit
    /// neither node nor edge; root calls emit a node only. Never fails:
    /// unrenderable argument values degrade to the elision marker.
    pub fn on_call(
        &mut self,
        id: StableCallId,
        parent: Option<StableCallId>,
        function: &str,
        locals: &[(String, LocalValue)],
        tracer_boundary: bool,
    ) {
        if tracer_boundary {
            return;
        }

        self.graph.nodes.push(GraphNode {
            id,
            label: Self::format_label(function, locals),
        });

        if let Some(parent) = parent {
            self.graph.edges.push(GraphEdge { from: parent, to: id });
        }
    }

    fn format_label(function: &str, locals: &[(String, LocalValue)]) -> String {
        let args: Vec<String> = locals
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("{}({})", function, args.join(", "))
    }

    /// Hand the finished graph to the caller, leaving the builder empty.
    pub fn take(&mut self) -> CallGraph {
        std::mem::take(&mut self.graph)
    }

    pub fn graph(&self) -> &CallGraph {
        &self.graph
    }
}
