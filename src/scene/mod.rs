//! Scene assembly: layout, lifecycle and the per-frame scheduler

mod engine;
mod layout;
mod lifecycle;

pub use engine::{Scene, SceneParts};
pub use layout::SceneLayout;
pub use lifecycle::Lifecycle;
