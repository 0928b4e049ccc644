use std::cmp::Ordering;
use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::math::{RandomRange, Span};
use crate::render::{Canvas2d, Color};
use crate::scene::SceneLayout;

pub const LOBE_COUNT: usize = 5;

/// The lowest lobe, where the silhouette turns from climbing to descending
const MIDWAY: usize = LOBE_COUNT / 2;

/// Parameters for the randomized hill generator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HillParams {
    pub lobe_width: Span,
    /// Leftmost possible start; the right bound is half the scene width
    pub min_base_x: f32,
    pub small: Span,
    pub med: Span,
    pub large: Span,
    /// Horizontal offset of the tick marks from each lobe's center
    pub tick_offset: f32,
    pub tick_half_length: f32,
    pub outline_width: f32,
}

impl Default for HillParams {
    fn default() -> Self {
        Self {
            lobe_width: Span::new(50.0, 70.0),
            min_base_x: 20.0,
            small: Span::new(0.05, 0.15),
            med: Span::new(0.2, 0.3),
            large: Span::new(0.7, 0.85),
            tick_offset: 5.0,
            tick_half_length: 4.0,
            outline_width: 2.0,
        }
    }
}

/// Magnitude classes, as fractions of the sky height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HillRatios {
    pub small: f32,
    pub med: f32,
    pub large: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LobeHeight {
    /// Height of the filled body below the cap
    pub full: f32,
    /// Vertical offset from the previous lobe's baseline
    pub relative: f32,
}

/// Fixed multi-lobe silhouette, generated once and redrawn every tick
#[derive(Debug, Clone, PartialEq)]
pub struct HillProfile {
    pub base_x: f32,
    pub segment_width: f32,
    pub ratios: HillRatios,
    pub heights: [LobeHeight; LOBE_COUNT],
    sky_height: f32,
    tick_offset: f32,
    tick_half_length: f32,
    outline_width: f32,
}

impl HillProfile {
    /// Roll a new silhouette from random ratios and lobe width
    pub fn generate<R: RandomRange + ?Sized>(
        layout: &SceneLayout,
        params: &HillParams,
        rng: &mut R,
    ) -> Self {
        let segment_width = params.lobe_width.sample(rng);
        let base_x = rng.random_in_range(params.min_base_x, layout.width / 2.0);
        let ratios = HillRatios {
            small: params.small.sample(rng),
            med: params.med.sample(rng),
            large: params.large.sample(rng),
        };

        Self::from_ratios(layout.sky_height, base_x, segment_width, ratios, params)
    }

    /// Fixed silhouette used behind the growing tree
    pub fn backdrop(layout: &SceneLayout, params: &HillParams) -> Self {
        let ratios = HillRatios {
            small: 0.15,
            med: 0.25,
            large: 0.7,
        };
        Self::from_ratios(layout.sky_height, 20.0, 70.0, ratios, params)
    }

    /// Derive the five lobes from the ratios and lobe width
    pub fn from_ratios(
        sky_height: f32,
        base_x: f32,
        segment_width: f32,
        ratios: HillRatios,
        params: &HillParams,
    ) -> Self {
        let half = segment_width / 2.0;
        let small = sky_height * ratios.small;
        let med = sky_height * ratios.med;
        let large = sky_height * ratios.large;

        let heights = [
            LobeHeight { full: med, relative: -med },
            LobeHeight { full: med + half, relative: 0.0 },
            LobeHeight { full: large, relative: -(large - (med + segment_width)) },
            LobeHeight { full: large - half, relative: (large - half) - (small + half) },
            LobeHeight { full: small, relative: small },
        ];

        Self {
            base_x,
            segment_width,
            ratios,
            heights,
            sky_height,
            tick_offset: params.tick_offset,
            tick_half_length: params.tick_half_length,
            outline_width: params.outline_width,
        }
    }

    pub fn midway(&self) -> usize {
        MIDWAY
    }

    /// Walk the lobes left to right: a semicircular cap and a filled body
    /// per lobe, two tick marks on each cap, then fill and outline the path
    pub fn render<C: Canvas2d + ?Sized>(&self, canvas: &mut C, fill: Color, outline: Color) {
        let half = self.segment_width / 2.0;
        let mut x = self.base_x;
        let mut y = self.sky_height;

        canvas.set_fill_color(fill);
        canvas.set_stroke_color(outline);
        canvas.set_line_width(self.outline_width);
        canvas.begin_path();

        for (i, lobe) in self.heights.iter().enumerate() {
            canvas.move_to(x, y);
            if i <= MIDWAY {
                y += lobe.relative;
                canvas.line_to(x, y);
            }

            canvas.arc(x + half, y, half, PI, 0.0, false);
            canvas.fill_rect(x, y - 1.0, self.segment_width, lobe.full);
            self.draw_ticks(canvas, x + half, y - half / 2.0);

            x += half;
            match i.cmp(&MIDWAY) {
                Ordering::Less => y -= half,
                Ordering::Equal => y += half,
                Ordering::Greater => {
                    x += half;
                    canvas.move_to(x, y);
                    y += lobe.relative;
                    canvas.line_to(x, y);
                    x -= half;
                    y += half;
                }
            }
        }

        canvas.fill();
        canvas.stroke();
    }

    fn draw_ticks<C: Canvas2d + ?Sized>(&self, canvas: &mut C, center_x: f32, center_y: f32) {
        for dx in [-self.tick_offset, self.tick_offset] {
            canvas.move_to(center_x + dx, center_y - self.tick_half_length);
            canvas.line_to(center_x + dx, center_y + self.tick_half_length);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{SceneRng, ScriptedRandom};
    use crate::visual::{CommandRecorder, DrawCommand, FrameSummary};

    const GREEN: Color = Color::rgb(6, 150, 17);

    fn layout() -> SceneLayout {
        SceneLayout::new(800.0, 500.0, 100.0).unwrap()
    }

    #[test]
    fn test_generate_yields_ordered_ratios() {
        let params = HillParams::default();
        for seed in 0..200 {
            let hills = HillProfile::generate(&layout(), &params, &mut SceneRng::seeded(seed));
            let r = hills.ratios;

            assert_eq!(hills.heights.len(), LOBE_COUNT);
            assert!(r.small < r.med && r.med < r.large, "seed {}: {:?}", seed, r);
            assert!(params.small.contains(r.small));
            assert!(params.med.contains(r.med));
            assert!(params.large.contains(r.large));
            assert!(params.lobe_width.contains(hills.segment_width));
            assert!(hills.base_x >= 20.0 && hills.base_x < 400.0);
        }
    }

    #[test]
    fn test_lobe_arithmetic() {
        let ratios = HillRatios { small: 0.1, med: 0.25, large: 0.75 };
        let hills = HillProfile::from_ratios(400.0, 20.0, 60.0, ratios, &HillParams::default());
        let h = hills.heights;

        assert_eq!(h[0], LobeHeight { full: 100.0, relative: -100.0 });
        assert_eq!(h[1], LobeHeight { full: 130.0, relative: 0.0 });
        assert_eq!(h[2], LobeHeight { full: 300.0, relative: -140.0 });
        assert_eq!(h[3], LobeHeight { full: 270.0, relative: 200.0 });
        assert_eq!(h[4], LobeHeight { full: 40.0, relative: 40.0 });
        assert_eq!(hills.midway(), 2);
    }

    #[test]
    fn test_scripted_generation() {
        let mut rng = ScriptedRandom::constant(0.5);
        let hills = HillProfile::generate(&layout(), &HillParams::default(), &mut rng);

        assert_eq!(hills.segment_width, 60.0);
        assert_eq!(hills.base_x, 210.0);
        assert!((hills.ratios.small - 0.1).abs() < 1e-6);
        assert!((hills.ratios.med - 0.25).abs() < 1e-6);
        assert!((hills.ratios.large - 0.775).abs() < 1e-6);
    }

    #[test]
    fn test_render_walks_five_lobes() {
        let hills = HillProfile::backdrop(&layout(), &HillParams::default());
        let mut canvas = CommandRecorder::new();
        hills.render(&mut canvas, GREEN, Color::BLACK);

        let summary = FrameSummary::from_commands(canvas.commands());
        assert_eq!(summary.arcs, LOBE_COUNT);
        assert_eq!(summary.filled_rects, LOBE_COUNT);
        assert_eq!(summary.fills, 1);
        assert_eq!(summary.stroke_widths, vec![2.0]);
        // Three climbing edges, two descending edges, two ticks per lobe
        assert_eq!(summary.line_segments, 3 + 2 + 2 * LOBE_COUNT);
    }

    #[test]
    fn test_render_baseline_path() {
        // sky 400, width 70: two climbing lobes, the peak, then the descent
        let hills = HillProfile::backdrop(&layout(), &HillParams::default());
        let mut canvas = CommandRecorder::new();
        hills.render(&mut canvas, GREEN, Color::BLACK);

        let caps: Vec<(f32, f32)> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Arc { center, .. } => Some((center.x, center.y)),
                _ => None,
            })
            .collect();

        assert_eq!(caps[0], (55.0, 300.0));
        assert_eq!(caps[1], (90.0, 265.0));
        assert_eq!(caps[2], (125.0, 120.0));
        assert_eq!(caps[3], (160.0, 155.0));
        assert_eq!(caps[4], (195.0, 340.0));
    }

    #[test]
    fn test_render_is_stable_across_frames() {
        let hills = HillProfile::generate(&layout(), &HillParams::default(), &mut SceneRng::seeded(4));
        let mut first = CommandRecorder::new();
        let mut second = CommandRecorder::new();
        hills.render(&mut first, GREEN, Color::BLACK);
        hills.render(&mut second, GREEN, Color::BLACK);
        assert_eq!(first.commands(), second.commands());
    }
}
