// Infrastructure implementations for GraphMe.

pub mod graphviz;
pub mod sim;

pub use graphviz::GraphvizRenderer;
pub use sim::SimulatedRuntime;
