//! Ground features: the land strip and the hill silhouette

mod hills;

pub use hills::{HillParams, HillProfile, HillRatios, LobeHeight, LOBE_COUNT};
