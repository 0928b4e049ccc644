//! Outstanding "next frame" continuations
//!
//! A continuation requested while a frame is being serviced always runs on
//! the following frame. Cancellation removes tokens synchronously, so a
//! cancelled continuation can never run, even later in the same frame.

use std::collections::BTreeMap;

/// Handle for one requested continuation; tokens increase monotonically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameToken(u64);

/// Ordered set of pending continuations, each carrying a payload
#[derive(Debug, Clone)]
pub struct PendingFrames<T> {
    next: u64,
    queued: BTreeMap<FrameToken, T>,
}

impl<T> Default for PendingFrames<T> {
    fn default() -> Self {
        Self {
            next: 0,
            queued: BTreeMap::new(),
        }
    }
}

impl<T> PendingFrames<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a continuation for the next frame
    pub fn request(&mut self, payload: T) -> FrameToken {
        let token = FrameToken(self.next);
        self.next += 1;
        self.queued.insert(token, payload);
        token
    }

    /// Drop every outstanding continuation, returning how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.queued.len();
        self.queued.clear();
        dropped
    }

    /// Marks the start of a frame; only tokens older than this are due
    pub fn frame_boundary(&self) -> FrameToken {
        FrameToken(self.next)
    }

    /// Remove and return the oldest continuation issued before `boundary`
    pub fn pop_due(&mut self, boundary: FrameToken) -> Option<(FrameToken, T)> {
        let token = *self.queued.range(..boundary).next()?.0;
        self.queued.remove(&token).map(|payload| (token, payload))
    }

    pub fn len(&self) -> usize {
        self.queued.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queued.is_empty()
    }
}
