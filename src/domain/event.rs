//! Call Events
//!
//! Events delivered by the host runtime's call-event source. The tracer only
//! consumes `Call`; the other variants exist so an event source can forward
//! its full stream without filtering.

use std::fmt;

/// Marker rendered in node labels for values outside the scalar whitelist.
pub const ELISION: &str = "...";

/// Transient identity of an active call-site, assigned by the host runtime.
///
/// Valid only while the invocation is on the call stack; the runtime may hand
/// the same identity to an unrelated call after this one returns. Never use a
/// `FrameId` as a long-lived key (see [`crate::domain::identity`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event raised by the host runtime.
#[derive(Debug, Clone)]
pub enum TraceEvent {
    /// A function invocation is beginning.
    Call(CallRecord),
    /// A function invocation returned.
    Return { frame: FrameId },
    /// A function invocation is unwinding with an error.
    Exception { frame: FrameId },
    /// Anything else the runtime emits (C calls, line events, ...).
    Other,
}

/// Payload of a `Call` event.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// Transient identity of the invoked call-site.
    pub frame: FrameId,
    /// Transient identity of the immediate caller, if the runtime knows one.
    pub parent: Option<FrameId>,
    /// Name of the invoked function.
    pub function: String,
    /// Locally-bound argument names and values at entry.
    pub locals: Vec<(String, LocalValue)>,
    /// True when this call is the tracer's own bookkeeping (session teardown).
    /// Set explicitly by the event source; such calls must not be graphed.
    pub tracer_boundary: bool,
}

impl CallRecord {
    pub fn new(frame: FrameId, parent: Option<FrameId>, function: &str) -> Self {
        Self {
            frame,
            parent,
            function: function.to_string(),
            locals: Vec::new(),
            tracer_boundary: false,
        }
    }

    pub fn with_locals(mut self, locals: Vec<(String, LocalValue)>) -> Self {
        self.locals = locals;
        self
    }

    pub fn boundary(mut self) -> Self {
        self.tracer_boundary = true;
        self
    }
}

/// An argument value as seen at function entry.
///
/// The whitelist of inline-renderable scalars is exactly: integer, float,
/// text, boolean. Everything else (aggregates, handles, closures) must be
/// supplied as `Opaque` by the event source and displays as [`ELISION`], so
/// node labels stay bounded.
#[derive(Debug, Clone, PartialEq)]
pub enum LocalValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Opaque,
}

impl fmt::Display for LocalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalValue::Int(v) => write!(f, "{}", v),
            LocalValue::Float(v) => write!(f, "{}", v),
            LocalValue::Text(v) => write!(f, "{}", v),
            LocalValue::Bool(v) => write!(f, "{}", v),
            LocalValue::Opaque => write!(f, "{}", ELISION),
        }
    }
}

impl From<i64> for LocalValue {
    fn from(v: i64) -> Self {
        LocalValue::Int(v)
    }
}

impl From<f64> for LocalValue {
    fn from(v: f64) -> Self {
        LocalValue::Float(v)
    }
}

impl From<&str> for LocalValue {
    fn from(v: &str) -> Self {
        LocalValue::Text(v.to_string())
    }
}

impl From<bool> for LocalValue {
    fn from(v: bool) -> Self {
        LocalValue::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_values_render_verbatim() {
        assert_eq!(LocalValue::Int(42).to_string(), "42");
        assert_eq!(LocalValue::Float(2.5).to_string(), "2.5");
        assert_eq!(LocalValue::Text("hi".to_string()).to_string(), "hi");
        assert_eq!(LocalValue::Bool(true).to_string(), "true");
    }

    #[test]
    fn test_opaque_value_renders_as_elision_marker() {
        assert_eq!(LocalValue::Opaque.to_string(), ELISION);
    }
}
