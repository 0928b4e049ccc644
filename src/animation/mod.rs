//! Frame scheduling primitives
//!
//! Pending continuations are explicit tokens owned by whoever requested
//! them, and the landscape loop is paced off host timestamps.

mod frames;
mod pacer;

pub use frames::{FrameToken, PendingFrames};
pub use pacer::FramePacer;
