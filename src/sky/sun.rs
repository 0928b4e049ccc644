//! Looping sun and the sky tint it drives
//!
//! The sun travels along a quadratic Bézier anchored below both lower
//! corners of the scene, with the control point high above the sky. A
//! hysteresis rule on `y` tracks whether it is rising and snaps `x` back to
//! a fixed start column whenever the direction flips.

use std::f32::consts::TAU;
use serde::{Deserialize, Serialize};

use crate::math::{QuadraticBezier, Vec2};
use crate::render::{Canvas2d, Color};
use crate::scene::SceneLayout;

/// Parameters controlling the sun's path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunParams {
    pub radius: f32,
    /// Progress added per tick
    pub step: f32,
    /// Distance of the start columns from the left/right edges
    pub start_inset: f32,
    pub start_y: f32,
    /// How far past each side the curve is anchored
    pub horizon_overshoot: f32,
    /// Extra height above the top edge before the sun counts as set
    pub set_margin: f32,
}

impl Default for SunParams {
    fn default() -> Self {
        Self {
            radius: 50.0,
            step: 0.001,
            start_inset: 75.0,
            start_y: 75.0,
            horizon_overshoot: 100.0,
            set_margin: 5.0,
        }
    }
}

/// Mutable state of the single celestial body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunState {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Position along the path, in [0, 1)
    pub progress: f32,
    pub rising: bool,
}

/// Sky opacity for a sun at height `y`, clamped to [0, 1]
pub fn sky_opacity(y: f32, sky_height: f32, radius: f32) -> f32 {
    let opacity = 1.0 - y / (sky_height + radius * 2.0);
    if opacity.is_nan() {
        return 0.0;
    }
    opacity.clamp(0.0, 1.0)
}

pub struct SunCycle {
    state: SunState,
    params: SunParams,
    path: QuadraticBezier,
    scene_width: f32,
    sky_height: f32,
    sky_base: Color,
    sky_color: Color,
}

impl SunCycle {
    /// Sun parked at the right start column; `sky_color` is the tint used
    /// until the first tick recomputes it
    pub fn new(layout: &SceneLayout, params: SunParams, sky_color: Color) -> Self {
        let path = QuadraticBezier::new(
            Vec2::new(-params.horizon_overshoot, layout.height * 1.5),
            Vec2::new(layout.width / 2.0, -layout.sky_height * 2.0),
            Vec2::new(layout.width + params.horizon_overshoot, layout.height * 1.5),
        );

        Self {
            state: SunState {
                x: layout.width - params.start_inset,
                y: params.start_y,
                radius: params.radius,
                progress: 0.0,
                rising: false,
            },
            params,
            path,
            scene_width: layout.width,
            sky_height: layout.sky_height,
            sky_base: sky_color,
            sky_color,
        }
    }

    /// Move one step along the path and apply the rise/set hysteresis
    pub fn advance(&mut self) {
        let next = self.state.progress + self.params.step;
        self.state.progress = if next >= 1.0 { 0.0 } else { next };

        let point = self.path.point_at(self.state.progress);
        self.state.x = point.x;
        self.state.y = point.y;

        let radius = self.state.radius;
        if self.state.rising && self.state.y < -radius - self.params.set_margin {
            self.state.rising = false;
            self.state.x = self.scene_width - self.params.start_inset;
        } else if !self.state.rising && self.state.y > self.sky_height + radius * 2.0 {
            self.state.rising = true;
            self.state.x = self.params.start_inset;
        }
    }

    /// Recompute the sky tint from the sun's height and remember it
    pub fn update_sky_color(&mut self) -> Color {
        let opacity = sky_opacity(self.state.y, self.sky_height, self.state.radius);
        self.sky_color = self.sky_base.with_alpha(opacity);
        self.sky_color
    }

    pub fn render<C: Canvas2d + ?Sized>(&self, canvas: &mut C, color: Color) {
        canvas.set_fill_color(color);
        canvas.begin_path();
        canvas.arc(self.state.x, self.state.y, self.state.radius, 0.0, TAU, false);
        canvas.fill();
    }

    pub fn state(&self) -> &SunState {
        &self.state
    }

    /// Last applied sky tint
    pub fn sky_color(&self) -> Color {
        self.sky_color
    }

    pub fn path(&self) -> &QuadraticBezier {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::{CommandRecorder, DrawCommand};

    fn layout() -> SceneLayout {
        SceneLayout::new(800.0, 500.0, 100.0).unwrap()
    }

    fn sun() -> SunCycle {
        SunCycle::new(&layout(), SunParams::default(), Color::rgba(0, 206, 250, 0.8))
    }

    #[test]
    fn test_starts_parked_at_right_column() {
        let sun = sun();
        assert_eq!(sun.state().x, 725.0);
        assert_eq!(sun.state().y, 75.0);
        assert!(!sun.state().rising);
        assert_eq!(sun.sky_color().a, 0.8);
    }

    #[test]
    fn test_first_tick_flips_to_rising_and_snaps_left() {
        let mut sun = sun();
        sun.advance();

        // Just past the start anchor, well below the horizon
        assert!(sun.state().y > 500.0);
        assert!(sun.state().rising);
        assert_eq!(sun.state().x, 75.0);
        assert!((sun.state().progress - 0.001).abs() < 1e-6);
    }

    #[test]
    fn test_position_follows_curve_between_flips() {
        let mut sun = sun();
        sun.advance();
        sun.advance();

        let expected = sun.path().point_at(sun.state().progress);
        assert_eq!(sun.state().x, expected.x);
        assert_eq!(sun.state().y, expected.y);
    }

    #[test]
    fn test_progress_wraps_to_zero() {
        let mut sun = sun();
        let mut wrapped = false;
        for _ in 0..1100 {
            sun.advance();
            assert!(sun.state().progress >= 0.0 && sun.state().progress < 1.0);
            if sun.state().progress == 0.0 {
                wrapped = true;
            }
        }
        assert!(wrapped);
    }

    #[test]
    fn test_sets_when_rising_above_top_edge() {
        // A tall arc so the apex clears the top edge
        let layout = SceneLayout::new(800.0, 500.0, 100.0).unwrap();
        let params = SunParams { step: 0.01, ..SunParams::default() };
        let mut sun = SunCycle::new(&layout, params, Color::rgb(0, 206, 250));
        sun.path.control = Vec2::new(400.0, -2000.0);

        let mut set = false;
        for _ in 0..60 {
            sun.advance();
            if sun.state().rising {
                continue;
            }
            if sun.state().progress > 0.02 {
                assert_eq!(sun.state().x, 725.0);
                set = true;
                break;
            }
        }
        assert!(set, "sun should flip to falling once above the top edge");
    }

    #[test]
    fn test_sky_opacity_clamped() {
        for y in [-10_000.0, -55.0, 0.0, 250.0, 500.0, 10_000.0, f32::INFINITY] {
            let opacity = sky_opacity(y, 400.0, 50.0);
            assert!((0.0..=1.0).contains(&opacity), "opacity {} for y {}", opacity, y);
        }
        assert_eq!(sky_opacity(0.0, 400.0, 50.0), 1.0);
        assert_eq!(sky_opacity(500.0, 400.0, 50.0), 0.0);
        assert!((sky_opacity(250.0, 400.0, 50.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_update_sky_color_tracks_height() {
        let mut sun = sun();
        sun.advance();
        // Below the horizon: night
        assert_eq!(sun.update_sky_color().a, 0.0);
        assert_eq!(sun.sky_color().r, 0);
        assert_eq!(sun.sky_color().g, 206);
    }

    #[test]
    fn test_render_draws_one_disc() {
        let sun = sun();
        let mut canvas = CommandRecorder::new();
        sun.render(&mut canvas, Color::rgb(255, 255, 0));

        let arcs: Vec<_> = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Arc { .. }))
            .collect();
        assert_eq!(arcs.len(), 1);
        assert!(matches!(
            canvas.commands().last(),
            Some(DrawCommand::Fill { color }) if *color == Color::rgb(255, 255, 0)
        ));
    }
}
