mod sun;

pub use sun::{SunCycle, SunParams, SunState, sky_opacity};
