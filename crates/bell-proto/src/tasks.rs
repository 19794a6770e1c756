//! Bookkeeping for in-flight requests.

use std::collections::HashMap;
use std::fmt;

use tokio::task::AbortHandle;

use crate::protocol::NotificationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    List,
    Count,
    MarkRead(NotificationId),
    MarkAll,
}

/// Identifies one issued request.  `seq` is unique per registry, so two
/// overlapping polls never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub kind: RequestKind,
    pub seq: u64,
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            RequestKind::List => write!(f, "list#{}", self.seq),
            RequestKind::Count => write!(f, "count#{}", self.seq),
            RequestKind::MarkRead(id) => write!(f, "mark-read({id})#{}", self.seq),
            RequestKind::MarkAll => write!(f, "mark-all#{}", self.seq),
        }
    }
}

#[derive(Default)]
pub struct TaskRegistry {
    next_seq: u64,
    handles: HashMap<RequestKey, AbortHandle>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a key for a request about to be spawned.
    pub fn next_key(&mut self, kind: RequestKind) -> RequestKey {
        self.next_seq += 1;
        RequestKey {
            kind,
            seq: self.next_seq,
        }
    }

    pub fn register(&mut self, key: RequestKey, handle: AbortHandle) {
        self.handles.insert(key, handle);
    }

    /// Forget a completed request.  Returns `false` for unknown keys
    /// (already finished or cancelled).
    pub fn finish(&mut self, key: RequestKey) -> bool {
        self.handles.remove(&key).is_some()
    }

    /// Abort everything still in flight.  Returns how many were aborted.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.handles.len();
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
        count
    }

    pub fn in_flight(&self) -> usize {
        self.handles.len()
    }
}
