//! The frame scheduler: owns every scene component and drives them in a
//! fixed draw order, one paced tick at a time.

use crate::animation::FramePacer;
use crate::config::{SceneConfig, SceneMode};
use crate::error::SceneError;
use crate::growth::BranchGrowth;
use crate::math::RandomRange;
use crate::particles::{CloudField, CloudLayer};
use crate::render::{Canvas2d, Color, DrawingSurface};
use crate::sky::SunCycle;
use crate::terrain::HillProfile;

use super::layout::SceneLayout;
use super::lifecycle::Lifecycle;

/// Component state released on destroy
pub struct SceneParts {
    pub sun: SunCycle,
    pub clouds: CloudField,
    pub hills: HillProfile,
    /// Only present in tree mode
    pub tree: Option<BranchGrowth>,
}

pub struct Scene<C: Canvas2d, R: RandomRange> {
    canvas: C,
    rng: R,
    config: SceneConfig,
    layout: SceneLayout,
    lifecycle: Lifecycle,
    pacer: FramePacer,
    parts: Option<SceneParts>,
    ticks: u64,
}

impl<C: Canvas2d, R: RandomRange> Scene<C, R> {
    /// Read the surface once, build every component and draw the opening
    /// still frame. The scene starts idle.
    pub fn initialize<S>(surface: &S, config: SceneConfig, mut rng: R) -> Result<Self, SceneError>
    where
        S: DrawingSurface<Context = C>,
    {
        config.validate()?;
        let canvas = surface.context_2d().ok_or(SceneError::UnsupportedSurface)?;
        let layout = SceneLayout::new(surface.width(), surface.height(), config.land_height)?;
        let palette = config.palette;

        let sun = SunCycle::new(&layout, config.sun, palette.sky);
        let mut clouds = CloudField::new(config.clouds.clone(), layout.width, palette.cloud);
        clouds.seed(&mut rng);

        let (hills, tree) = match config.mode {
            SceneMode::Tree => {
                let base = layout.tree_base(config.growth.base_width);
                (
                    HillProfile::backdrop(&layout, &config.hills),
                    Some(BranchGrowth::new(config.growth, base, palette.bark)),
                )
            }
            SceneMode::Landscape | SceneMode::SunCycle => {
                (HillProfile::generate(&layout, &config.hills, &mut rng), None)
            }
        };

        let mut scene = Self {
            canvas,
            rng,
            pacer: FramePacer::new(config.fps),
            config,
            layout,
            lifecycle: Lifecycle::Idle,
            parts: Some(SceneParts { sun, clouds, hills, tree }),
            ticks: 0,
        };
        scene.draw_still();

        log::info!(
            "scene initialized: {:?} {}x{} (sky {})",
            scene.config.mode,
            layout.width,
            layout.height,
            layout.sky_height
        );
        Ok(scene)
    }

    /// Start advancing. Returns false if already running or destroyed.
    pub fn enable(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Destroyed => {
                log::warn!("enable called on a destroyed scene");
                false
            }
            Lifecycle::Running => false,
            Lifecycle::Idle => {
                self.lifecycle = Lifecycle::Running;
                self.pacer.reset();
                if let Some(tree) = self.parts.as_mut().and_then(|p| p.tree.as_mut()) {
                    tree.start();
                }
                log::info!("scene enabled");
                true
            }
        }
    }

    /// Stop advancing the animated components. Tree growth keeps going
    /// until it terminates on its own.
    pub fn disable(&mut self) -> bool {
        match self.lifecycle {
            Lifecycle::Destroyed => {
                log::warn!("disable called on a destroyed scene");
                false
            }
            Lifecycle::Idle => false,
            Lifecycle::Running => {
                self.lifecycle = Lifecycle::Idle;
                log::info!("scene disabled");
                true
            }
        }
    }

    /// Disable and release all component state
    pub fn destroy(&mut self) {
        if self.lifecycle.is_destroyed() {
            log::warn!("destroy called on a destroyed scene");
            return;
        }
        self.disable();
        if let Some(tree) = self.parts.as_mut().and_then(|p| p.tree.as_mut()) {
            tree.abort();
        }
        self.parts = None;
        self.lifecycle = Lifecycle::Destroyed;
        log::info!("scene destroyed after {} ticks", self.ticks);
    }

    /// Service one display refresh at host time `now` (ms).
    ///
    /// Returns whether the scene wants another frame.
    pub fn on_frame(&mut self, now: f64) -> Result<bool, SceneError> {
        if self.lifecycle.is_destroyed() {
            return Ok(false);
        }

        if self.lifecycle.is_running() && self.config.mode != SceneMode::Tree && self.pacer.ready(now) {
            self.draw_tick(now);
        }

        let Some(parts) = self.parts.as_mut() else {
            return Ok(false);
        };
        if let Some(tree) = parts.tree.as_mut() {
            if let Err(err) = tree.tick_frame(now, &mut self.canvas, &mut self.rng) {
                log::error!("tree growth aborted: {}", err);
                return Err(err);
            }
        }

        Ok(self.needs_frames())
    }

    /// True while enabled or while branch growth has continuations pending
    pub fn needs_frames(&self) -> bool {
        if self.lifecycle.is_running() {
            return true;
        }
        self.tree().map_or(false, BranchGrowth::is_growing)
    }

    fn draw_tick(&mut self, now: f64) {
        let Some(parts) = self.parts.as_mut() else {
            return;
        };
        let layout = &self.layout;
        let palette = &self.config.palette;
        let canvas = &mut self.canvas;

        canvas.clear_rect(0.0, 0.0, layout.width, layout.height);
        draw_sky(canvas, layout, parts.sun.sky_color());
        parts.sun.advance();
        parts.sun.render(canvas, palette.sun);
        parts.sun.update_sky_color();

        if self.config.mode == SceneMode::Landscape {
            draw_land(canvas, layout, palette.land);
            parts.clouds.advance(now, &mut self.rng);
            parts.clouds.render(canvas, CloudLayer::Back);
            parts.hills.render(canvas, palette.hills, palette.outline);
            parts.clouds.render(canvas, CloudLayer::Front);
        }

        self.ticks += 1;
    }

    /// Opening frame, drawn once before anything advances
    fn draw_still(&mut self) {
        let Some(parts) = self.parts.as_ref() else {
            return;
        };
        let layout = &self.layout;
        let palette = &self.config.palette;
        let canvas = &mut self.canvas;

        match self.config.mode {
            SceneMode::Landscape => {
                canvas.clear_rect(0.0, 0.0, layout.width, layout.height);
                draw_sky(canvas, layout, parts.sun.sky_color());
                parts.sun.render(canvas, palette.sun);
                draw_land(canvas, layout, palette.land);
                parts.clouds.render(canvas, CloudLayer::Back);
                parts.hills.render(canvas, palette.hills, palette.outline);
                parts.clouds.render(canvas, CloudLayer::Front);
            }
            SceneMode::SunCycle => {
                canvas.clear_rect(0.0, 0.0, layout.width, layout.height);
                draw_sky(canvas, layout, parts.sun.sky_color());
                parts.sun.render(canvas, palette.sun);
            }
            SceneMode::Tree => {
                // Backdrop stays put; tree strokes accumulate over it
                draw_sky(canvas, layout, palette.sky.with_alpha(1.0));
                draw_land(canvas, layout, palette.land);
                parts.sun.render(canvas, palette.sun);
                parts.clouds.render_all(canvas);
                parts.hills.render(canvas, palette.hills, palette.outline);
            }
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_enabled(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn mode(&self) -> SceneMode {
        self.config.mode
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    /// Number of animated ticks drawn so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn parts(&self) -> Option<&SceneParts> {
        self.parts.as_ref()
    }

    pub fn sun(&self) -> Option<&SunCycle> {
        self.parts.as_ref().map(|p| &p.sun)
    }

    pub fn clouds(&self) -> Option<&CloudField> {
        self.parts.as_ref().map(|p| &p.clouds)
    }

    pub fn hills(&self) -> Option<&HillProfile> {
        self.parts.as_ref().map(|p| &p.hills)
    }

    pub fn tree(&self) -> Option<&BranchGrowth> {
        self.parts.as_ref().and_then(|p| p.tree.as_ref())
    }

    pub fn branch_count(&self) -> usize {
        self.tree().map_or(0, BranchGrowth::branch_count)
    }

    pub fn cloud_count(&self) -> usize {
        self.clouds().map_or(0, CloudField::len)
    }

    pub fn sun_progress(&self) -> Option<f32> {
        self.sun().map(|sun| sun.state().progress)
    }
}

fn draw_sky<C: Canvas2d + ?Sized>(canvas: &mut C, layout: &SceneLayout, color: Color) {
    canvas.set_fill_color(color);
    canvas.begin_path();
    canvas.fill_rect(0.0, 0.0, layout.width, layout.sky_height);
}

fn draw_land<C: Canvas2d + ?Sized>(canvas: &mut C, layout: &SceneLayout, color: Color) {
    canvas.set_fill_color(color);
    canvas.begin_path();
    canvas.fill_rect(0.0, layout.sky_height, layout.width, layout.land_height);
}
