//! Visual evaluation helpers
//!
//! A recording canvas plus summaries over what it captured, so draw order
//! and draw content can be checked without a browser.

pub mod recorder;
pub mod metrics;

pub use recorder::{CommandRecorder, DrawCommand, RecordingSurface};
pub use metrics::{FrameSummary, first_paint_with, last_paint_with, paints_with_count};
