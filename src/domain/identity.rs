//! Identity Resolver
//!
//! Maps transient call-site identities to stable, monotonically increasing
//! call IDs. The host runtime recycles a frame's identity once the frame
//! returns, so a graph keyed on frame identities silently merges unrelated
//! invocations. Stability comes from a counter minted per call, never from
//! the transient identity itself.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::event::FrameId;

/// Stable identifier of one function invocation within a session.
///
/// Unique per `Call` event; never reused even when the runtime hands the same
/// `FrameId` to a later, unrelated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StableCallId(pub u64);

impl std::fmt::Display for StableCallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates stable call IDs and answers parent lookups.
///
/// The table maps each frame identity to the stable ID it was most recently
/// assigned; a `None` value memoizes a frame that predates the session (the
/// trace boundary). The flat map is safe without invalidation because of the
/// call-stack liveness invariant: when a call for frame X is processed, X's
/// parent frame is still live, so its entry cannot have been recycled yet.
/// Entries for frames that already returned go stale, but a recycled identity
/// is overwritten before it is ever read again.
#[derive(Debug, Default)]
pub struct IdentityResolver {
    next_id: u64,
    table: HashMap<FrameId, Option<StableCallId>>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a stable ID for a new invocation and look up its parent's.
    ///
    /// A parent that was never seen is a legitimate graph root (code that
    /// entered the traced scope from outside), not a fault. This never fails.
    pub fn resolve(
        &mut self,
        frame: FrameId,
        parent: Option<FrameId>,
    ) -> (StableCallId, Option<StableCallId>) {
        self.next_id += 1;
        let id = StableCallId(self.next_id);

        // Overwrite unconditionally: a hit here means the runtime recycled
        // this identity from a call that has already returned.
        self.table.insert(frame, Some(id));

        let parent_id = match parent {
            // Memoize unknown parents as roots so repeated top-level calls
            // from the same outside frame all resolve to "no parent".
            Some(p) => *self.table.entry(p).or_insert(None),
            None => None,
        };

        (id, parent_id)
    }

    /// Number of invocations resolved so far.
    pub fn calls_seen(&self) -> u64 {
        self.next_id
    }
}
