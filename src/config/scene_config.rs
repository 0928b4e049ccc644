use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::growth::GrowthParams;
use crate::math::Span;
use crate::particles::CloudParams;
use crate::render::Color;
use crate::sky::SunParams;
use crate::terrain::HillParams;

/// Which animation the scene runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneMode {
    /// Sun, clouds and hills animated every tick
    #[default]
    Landscape,
    /// Sun and sky only
    SunCycle,
    /// Static backdrop with a growing tree
    Tree,
}

/// How the web layer sizes the canvas before the layout is read
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub fit_to_window: bool,
    pub height: u32,
    /// Windows at or below this width count as narrow
    pub narrow_breakpoint: u32,
    pub narrow_margin: u32,
    pub wide_margin: u32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            fit_to_window: false,
            height: 500,
            narrow_breakpoint: 768,
            narrow_margin: 16,
            wide_margin: 100,
        }
    }
}

impl SurfaceConfig {
    /// Canvas size for a window of `window_width` pixels
    pub fn fit(&self, window_width: u32) -> (u32, u32) {
        let margin = if window_width <= self.narrow_breakpoint {
            self.narrow_margin
        } else {
            self.wide_margin
        };
        (window_width.saturating_sub(margin), self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Sky base color; the sun cycle overrides its alpha
    pub sky: Color,
    pub sun: Color,
    pub land: Color,
    pub hills: Color,
    pub outline: Color,
    pub cloud: Color,
    pub bark: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky: Color::rgba(0, 206, 250, 0.8),
            sun: Color::rgb(255, 255, 0),
            land: Color::rgb(255, 148, 28),
            hills: Color::rgb(6, 150, 17),
            outline: Color::BLACK,
            cloud: Color::rgba(255, 255, 255, 0.9),
            bark: Color::rgb(130, 82, 1),
        }
    }
}

/// Everything tunable about a scene, loadable from YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub mode: SceneMode,
    /// Target ticks per second for the animated modes
    pub fps: f64,
    pub land_height: f32,
    pub surface: SurfaceConfig,
    pub sun: SunParams,
    pub clouds: CloudParams,
    pub hills: HillParams,
    pub growth: GrowthParams,
    pub palette: Palette,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            mode: SceneMode::default(),
            fps: 60.0,
            land_height: 100.0,
            surface: SurfaceConfig::default(),
            sun: SunParams::default(),
            clouds: CloudParams::default(),
            hills: HillParams::default(),
            growth: GrowthParams::default(),
            palette: Palette::default(),
        }
    }
}

/// Upper bound on `growth.max_branches`; the branch list doubles per split
pub const MAX_BRANCH_CEILING: usize = 4096;

impl SceneConfig {
    /// Parse and validate a YAML document; an empty document yields defaults
    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: SceneConfig = serde_yaml::from_str(yaml)
            .map_err(|e| SceneError::Config(format!("YAML parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, SceneError> {
        serde_yaml::to_string(self).map_err(|e| SceneError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.fps > 0.0) {
            return Err(invalid(format!("fps must be positive, got {}", self.fps)));
        }
        if self.land_height < 0.0 {
            return Err(invalid(format!("land_height must not be negative, got {}", self.land_height)));
        }
        if self.surface.fit_to_window && self.land_height >= self.surface.height as f32 {
            return Err(invalid(format!(
                "land_height {} must be below surface height {}",
                self.land_height, self.surface.height
            )));
        }
        if !(self.sun.radius > 0.0 && self.sun.step > 0.0) {
            return Err(invalid(format!(
                "sun radius and step must be positive, got {} and {}",
                self.sun.radius, self.sun.step
            )));
        }

        check_span("clouds.spawn_y", self.clouds.spawn_y)?;
        check_span("clouds.velocity", self.clouds.velocity)?;
        check_span("clouds.respawn_delay_ms", self.clouds.respawn_delay_ms)?;
        if self.clouds.velocity.min <= 0.0 {
            return Err(invalid("clouds.velocity must be positive".to_string()));
        }

        check_span("hills.lobe_width", self.hills.lobe_width)?;
        check_span("hills.small", self.hills.small)?;
        check_span("hills.med", self.hills.med)?;
        check_span("hills.large", self.hills.large)?;
        let hills = &self.hills;
        if !(hills.small.max <= hills.med.min && hills.med.max <= hills.large.min) {
            return Err(invalid(format!(
                "hill ratio ranges must be disjoint and ascending (small < med < large), got {:?} {:?} {:?}",
                hills.small, hills.med, hills.large
            )));
        }

        let growth = &self.growth;
        let positive = [
            ("growth.base_width", growth.base_width),
            ("growth.branch_length", growth.branch_length),
            ("growth.rate_of_growth", growth.rate_of_growth),
            ("growth.split_point", growth.split_point),
            ("growth.min_stroke_width", growth.min_stroke_width),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if !(growth.split_ratio > 0.0 && growth.split_ratio < 1.0) {
            return Err(invalid(format!(
                "growth.split_ratio must be in (0, 1), got {}",
                growth.split_ratio
            )));
        }
        if growth.max_branches == 0 || growth.max_branches > MAX_BRANCH_CEILING {
            return Err(invalid(format!(
                "growth.max_branches must be in 1..={}, got {}",
                MAX_BRANCH_CEILING, growth.max_branches
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> SceneError {
    SceneError::Config(message)
}

fn check_span(name: &str, span: Span) -> Result<(), SceneError> {
    if span.is_ordered() {
        Ok(())
    } else {
        Err(invalid(format!("{} range is inverted: {} > {}", name, span.min, span.max)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SceneConfig::from_yaml("").unwrap(), SceneConfig::default());
        assert_eq!(SceneConfig::from_yaml("  \n").unwrap(), SceneConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let yaml = r#"
mode: tree
fps: 30
growth:
  branch_length: 200
palette:
  bark: { r: 90, g: 60, b: 10 }
"#;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.mode, SceneMode::Tree);
        assert_eq!(config.fps, 30.0);
        assert_eq!(config.growth.branch_length, 200.0);
        assert_eq!(config.growth.base_width, 20.0);
        assert_eq!(config.palette.bark, Color::rgb(90, 60, 10));
        assert_eq!(config.palette.land, Color::rgb(255, 148, 28));
        assert_eq!(config.land_height, 100.0);
    }

    #[test]
    fn test_sun_cycle_mode_name() {
        let config = SceneConfig::from_yaml("mode: sun_cycle").unwrap();
        assert_eq!(config.mode, SceneMode::SunCycle);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(SceneConfig::from_yaml("fps: 0"), Err(SceneError::Config(_))));
        assert!(SceneConfig::from_yaml("clouds:\n  velocity: { min: 0.6, max: 0.2 }").is_err());
        assert!(SceneConfig::from_yaml("growth:\n  split_ratio: 1.5").is_err());
        assert!(SceneConfig::from_yaml("growth:\n  base_width: -1").is_err());
        assert!(SceneConfig::from_yaml("mode: [").is_err());
    }

    #[test]
    fn test_rejects_overlapping_hill_ratios() {
        let yaml = "hills:\n  small: { min: 0.5, max: 0.6 }\n  med: { min: 0.2, max: 0.3 }";
        assert!(matches!(SceneConfig::from_yaml(yaml), Err(SceneError::Config(_))));

        let touching = "hills:\n  small: { min: 0.1, max: 0.2 }\n  med: { min: 0.2, max: 0.7 }\n  large: { min: 0.7, max: 0.9 }";
        assert!(SceneConfig::from_yaml(touching).is_ok());
    }

    #[test]
    fn test_rejects_unbounded_growth() {
        let no_floor = "growth:\n  min_stroke_width: 0";
        assert!(matches!(SceneConfig::from_yaml(no_floor), Err(SceneError::Config(_))));

        let huge_cap = "growth:\n  max_branches: 1000000000";
        assert!(matches!(SceneConfig::from_yaml(huge_cap), Err(SceneError::Config(_))));

        let at_ceiling = format!("growth:\n  max_branches: {}", MAX_BRANCH_CEILING);
        assert!(SceneConfig::from_yaml(&at_ceiling).is_ok());
    }

    #[test]
    fn test_rejects_nan_sun() {
        assert!(SceneConfig::from_yaml("sun:\n  step: .nan").is_err());
        assert!(SceneConfig::from_yaml("sun:\n  radius: .nan").is_err());
        assert!(SceneConfig::from_yaml("sun:\n  step: 0").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SceneConfig {
            mode: SceneMode::SunCycle,
            fps: 24.0,
            ..SceneConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(SceneConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_surface_fit() {
        let surface = SurfaceConfig::default();
        assert_eq!(surface.fit(700), (684, 500));
        assert_eq!(surface.fit(768), (752, 500));
        assert_eq!(surface.fit(1280), (1180, 500));
        assert_eq!(surface.fit(10), (0, 500));
    }
}
