//! The trigger buffer: a bounded, time-windowed FIFO of pending requests.
//!
//! The buffer absorbs bursts of requests that cannot be serviced the
//! instant they occur (the current action is not yet interruptible) while
//! bounding how stale a request may get. It owns no action state -- it is
//! purely a staging area between the trigger detectors and the runner.
//!
//! Ordering is strict FIFO. Priority plays no role here; it matters only
//! when the runner consumes the head.

use std::collections::VecDeque;

use tracing::debug;

use crate::definition::ActionDefinition;

/// A single buffered action request.
///
/// Ephemeral: produced once per trigger fire, consumed or expired, never
/// reused.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    /// The definition the trigger resolved to.
    pub definition: ActionDefinition,
    /// Action-specific payload captured at fire time.
    pub params: serde_json::Value,
    /// Absolute game time after which the request is stale.
    pub expires_at: f64,
}

/// Whether a registered request was queued or dropped at capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The request was enqueued at the tail.
    Queued,
    /// The buffer was full; the request was dropped. Intentional
    /// backpressure, not an error.
    Dropped,
}

/// Bounded FIFO of [`PendingRequest`] values with per-entry expiry.
///
/// Capacity is fixed at construction; capacity 0 is legal and drops every
/// registration. All operations on an empty buffer are safe no-ops.
#[derive(Debug)]
pub struct TriggerBuffer {
    queue: VecDeque<PendingRequest>,
    capacity: usize,
}

impl TriggerBuffer {
    /// Create a buffer with the given fixed capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a request at the tail, or drop it if the buffer is full.
    ///
    /// A full buffer never overwrites queued entries: the newest request
    /// is the one sacrificed.
    pub fn register(&mut self, request: PendingRequest) -> Admission {
        if self.queue.len() >= self.capacity {
            debug!(
                kind = %request.definition.kind(),
                capacity = self.capacity,
                "trigger buffer full, dropping request"
            );
            return Admission::Dropped;
        }
        self.queue.push_back(request);
        Admission::Queued
    }

    /// Drop expired entries from the head. Returns how many were purged.
    ///
    /// Runs before consumption each runner step, so an expired request is
    /// never handed to arbitration.
    pub fn tick(&mut self, now: f64) -> usize {
        let mut purged = 0_usize;
        while let Some(head) = self.queue.front() {
            if head.expires_at > now {
                break;
            }
            if let Some(stale) = self.queue.pop_front() {
                debug!(
                    kind = %stale.definition.kind(),
                    expires_at = stale.expires_at,
                    now,
                    "dropping expired request"
                );
                purged = purged.saturating_add(1);
            }
        }
        purged
    }

    /// Dequeue the head request, if any.
    pub fn accept(&mut self) -> Option<PendingRequest> {
        self.queue.pop_front()
    }

    /// Borrow the head request without consuming it.
    pub fn peek(&self) -> Option<&PendingRequest> {
        self.queue.front()
    }

    /// Number of requests currently queued.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the buffer holds no requests.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The fixed capacity set at construction.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
