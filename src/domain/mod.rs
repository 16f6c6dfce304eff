// Domain model for GraphMe: call events, stable identities, the call graph.

pub mod callgraph;
pub mod event;
pub mod identity;
