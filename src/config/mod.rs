pub mod scene_config;

pub use scene_config::{Palette, SceneConfig, SceneMode, SurfaceConfig};
