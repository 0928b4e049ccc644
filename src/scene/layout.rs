use crate::error::SceneError;
use crate::math::Vec2;

/// Scene dimensions, read once from the host surface at initialization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub width: f32,
    pub height: f32,
    pub land_height: f32,
    pub sky_height: f32,
}

impl SceneLayout {
    pub fn new(width: f32, height: f32, land_height: f32) -> Result<Self, SceneError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(SceneError::Config(format!(
                "surface must have a positive size, got {}x{}",
                width, height
            )));
        }
        if land_height < 0.0 || land_height >= height {
            return Err(SceneError::Config(format!(
                "land height {} must be within surface height {}",
                land_height, height
            )));
        }

        Ok(Self {
            width,
            height,
            land_height,
            sky_height: height - land_height,
        })
    }

    /// Where the trunk is planted: centered, halfway down the land strip
    pub fn tree_base(&self, base_width: f32) -> Vec2 {
        Vec2::new(
            (self.width - base_width) / 2.0,
            self.height - self.land_height / 2.0,
        )
    }
}
