// Application layer: session lifecycle and the trace-and-render usecase.

use std::path::PathBuf;

use anyhow::Result;

use crate::ports::{GraphRenderer, RenderOptions};

pub mod session;

pub use session::{EventHook, HookSlot, SharedHook, TraceSession};

/// Runs a workload under a fresh trace session and renders the result.
pub struct TraceUsecase<'a> {
    pub renderer: &'a dyn GraphRenderer,
}

impl<'a> TraceUsecase<'a> {
    /// Trace `workload` on `slot`, then render the finished graph.
    ///
    /// A rendering fault is returned to the caller but never invalidates the
    /// trace itself; the workload has already run to completion by then.
    pub fn run<T>(
        &self,
        slot: &HookSlot,
        options: &RenderOptions,
        workload: impl FnOnce() -> T,
    ) -> Result<(T, PathBuf)> {
        let session = TraceSession::activate(slot)?;
        let output = workload();
        let graph = session.finish();
        let artifact = self.renderer.render(&graph, options)?;
        Ok((output, artifact))
    }
}
