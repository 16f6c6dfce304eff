//! Trace Session
//!
//! Scoped acquisition of the process's call-event hook slot. Activating a
//! session saves whatever hook is installed, installs a recorder that routes
//! every `Call` event through the identity resolver and graph builder, and
//! restores the saved hook on every exit path, including unwinding.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::domain::callgraph::{CallGraph, GraphBuilder};
use crate::domain::event::TraceEvent;
use crate::domain::identity::IdentityResolver;

/// A handler for runtime call events.
pub trait EventHook {
    fn on_event(&mut self, event: &TraceEvent);
}

/// Hooks are shared single-threaded; the event source and the session both
/// hold a handle to the installed one.
pub type SharedHook = Rc<RefCell<dyn EventHook>>;

/// The hook slot: an explicit handle to the single place a call-event source
/// delivers events to. At most one hook is installed at a time, so changing
/// the occupant must save and restore rather than assume ownership.
#[derive(Default)]
pub struct HookSlot {
    current: RefCell<Option<SharedHook>>,
}

impl HookSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap the installed hook, returning the previous occupant. Fails only
    /// when the slot is mid-swap, which cannot happen in the single-threaded
    /// cooperative model this crate assumes.
    pub fn install(&self, hook: Option<SharedHook>) -> Result<Option<SharedHook>> {
        match self.current.try_borrow_mut() {
            Ok(mut slot) => Ok(std::mem::replace(&mut *slot, hook)),
            Err(_) => bail!("hook slot is busy; cannot change the installed hook"),
        }
    }

    /// Handle on the currently installed hook, if any.
    pub fn installed(&self) -> Option<SharedHook> {
        self.current.borrow().clone()
    }

    /// Deliver one event to the installed hook. A no-op when the slot is
    /// empty. The slot borrow is released before the hook runs, so a hook may
    /// install/uninstall from inside its handler.
    pub fn dispatch(&self, event: &TraceEvent) {
        let hook = self.current.borrow().clone();
        if let Some(hook) = hook {
            if let Ok(mut hook) = hook.try_borrow_mut() {
                hook.on_event(event);
            }
        }
    }
}

/// The session's own hook: resolver + builder, fed by `Call` events only.
#[derive(Default)]
struct GraphRecorder {
    resolver: IdentityResolver,
    builder: GraphBuilder,
}

impl EventHook for GraphRecorder {
    fn on_event(&mut self, event: &TraceEvent) {
        if let TraceEvent::Call(call) = event {
            let (id, parent) = self.resolver.resolve(call.frame, call.parent);
            self.builder
                .on_call(id, parent, &call.function, &call.locals, call.tracer_boundary);
        }
    }
}

/// A scoped tracing session. Single-use: activate, run the traced code, then
/// [`TraceSession::finish`] to get the graph. Dropping an unfinished session
/// still restores the previously installed hook.
pub struct TraceSession<'a> {
    slot: &'a HookSlot,
    recorder: Rc<RefCell<GraphRecorder>>,
    previous: Option<SharedHook>,
    active: bool,
}

impl<'a> TraceSession<'a> {
    /// Install this session's recorder, keeping the prior hook for restore.
    ///
    /// The counter, identity table, and graph all start empty. An error here
    /// is an instrumentation fault: it surfaces before any traced code runs
    /// and tracing cannot proceed.
    pub fn activate(slot: &'a HookSlot) -> Result<Self> {
        let recorder = Rc::new(RefCell::new(GraphRecorder::default()));
        let hook: SharedHook = recorder.clone();
        let previous = slot.install(Some(hook))?;
        Ok(Self {
            slot,
            recorder,
            previous,
            active: true,
        })
    }

    /// End the session and hand the graph to the caller.
    ///
    /// If the traced code panicked and the unwind was caught before this
    /// point, the partial graph built up to the fault is returned, well
    /// formed.
    pub fn finish(mut self) -> CallGraph {
        self.deactivate();
        let graph = self.recorder.borrow_mut().builder.take();
        graph
    }

    /// Restore the hook captured at activation. Idempotent; must not panic,
    /// since it also runs from `Drop` during unwinding.
    fn deactivate(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        let previous = self.previous.take();
        let _ = self.slot.install(previous);
    }
}

impl Drop for TraceSession<'_> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
