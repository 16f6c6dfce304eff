//! Simulated Host Runtime
//!
//! A call-event source satisfying the contract the tracer expects from a
//! host runtime: every function entry delivers the invoked call-site's
//! transient identity, the caller's, the function name, and the bound
//! arguments. Frame identities come from a free list and are recycled as
//! soon as a frame returns, exactly the aliasing behavior that makes a
//! counter-based stable ID necessary.
//!
//! Used by the demo binary and the end-to-end tests.

use crate::application::HookSlot;
use crate::domain::event::{CallRecord, FrameId, LocalValue, TraceEvent};

pub struct SimulatedRuntime<'a> {
    slot: &'a HookSlot,
    stack: Vec<FrameId>,
    free: Vec<FrameId>,
    next: u64,
}

impl<'a> SimulatedRuntime<'a> {
    pub fn new(slot: &'a HookSlot) -> Self {
        Self {
            slot,
            stack: Vec::new(),
            free: Vec::new(),
            next: 0,
        }
    }

    /// Run `body` as a traced invocation of `function`.
    ///
    /// Emits a `Call` event before the body and a `Return` event after it;
    /// the frame identity is released for reuse on return.
    pub fn call<T>(
        &mut self,
        function: &str,
        locals: Vec<(String, LocalValue)>,
        body: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.enter(function, locals, false);
        let output = body(self);
        self.exit();
        output
    }

    /// Emit a call flagged as the tracer's own bookkeeping, the analogue of
    /// a session's exit-time teardown running under its own hook.
    pub fn boundary_call(&mut self, function: &str) {
        self.enter(function, Vec::new(), true);
        self.exit();
    }

    /// Highest frame identity handed out so far. Stays at the maximum stack
    /// depth when recycling works, however many calls were made.
    pub fn identities_minted(&self) -> u64 {
        self.next
    }

    fn acquire_frame(&mut self) -> FrameId {
        self.free.pop().unwrap_or_else(|| {
            self.next += 1;
            FrameId(self.next)
        })
    }

    fn enter(&mut self, function: &str, locals: Vec<(String, LocalValue)>, boundary: bool) {
        let frame = self.acquire_frame();
        let parent = self.stack.last().copied();
        self.stack.push(frame);

        let mut record = CallRecord::new(frame, parent, function).with_locals(locals);
        if boundary {
            record = record.boundary();
        }
        self.slot.dispatch(&TraceEvent::Call(record));
    }

    fn exit(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.slot.dispatch(&TraceEvent::Return { frame });
            // Identity is dead from here on and may alias a later call.
            self.free.push(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::application::{EventHook, SharedHook};

    #[derive(Default)]
    struct Collector {
        calls: Vec<CallRecord>,
    }

    impl EventHook for Collector {
        fn on_event(&mut self, event: &TraceEvent) {
            if let TraceEvent::Call(call) = event {
                self.calls.push(call.clone());
            }
        }
    }

    #[test]
    fn test_sequential_calls_reuse_frame_identities() {
        let slot = HookSlot::new();
        let collector = Rc::new(RefCell::new(Collector::default()));
        let hook: SharedHook = collector.clone();
        slot.install(Some(hook)).unwrap();

        let mut rt = SimulatedRuntime::new(&slot);
        rt.call("first", vec![], |_| {});
        rt.call("second", vec![], |_| {});

        let calls = &collector.borrow().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].frame, calls[1].frame, "identity should be recycled");
        assert_eq!(rt.identities_minted(), 1);
    }

    #[test]
    fn test_nested_call_carries_parent_identity() {
        let slot = HookSlot::new();
        let collector = Rc::new(RefCell::new(Collector::default()));
        let hook: SharedHook = collector.clone();
        slot.install(Some(hook)).unwrap();

        let mut rt = SimulatedRuntime::new(&slot);
        rt.call("outer", vec![], |rt| {
            rt.call("inner", vec![], |_| {});
        });

        let calls = &collector.borrow().calls;
        assert!(calls[0].parent.is_none());
        assert_eq!(calls[1].parent, Some(calls[0].frame));
    }

    #[test]
    fn test_boundary_call_is_flagged() {
        let slot = HookSlot::new();
        let collector = Rc::new(RefCell::new(Collector::default()));
        let hook: SharedHook = collector.clone();
        slot.install(Some(hook)).unwrap();

        let mut rt = SimulatedRuntime::new(&slot);
        rt.boundary_call("finish");

        assert!(collector.borrow().calls[0].tracer_boundary);
    }
}
