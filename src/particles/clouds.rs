use std::f32::consts::TAU;
use serde::{Deserialize, Serialize};

use crate::math::{RandomRange, Span};
use crate::render::{Canvas2d, Color};

/// Depth tag: back clouds are drawn before the hills, front clouds after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudLayer {
    Front,
    Back,
}

impl CloudLayer {
    fn random<R: RandomRange + ?Sized>(rng: &mut R) -> Self {
        if rng.coin_flip() {
            CloudLayer::Back
        } else {
            CloudLayer::Front
        }
    }
}

/// A single drifting cloud
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloudParticle {
    pub x: f32,
    pub y: f32,
    /// Pixels per tick, always positive
    pub velocity: f32,
    pub layer: CloudLayer,
}

/// Initial cloud placement; x = scene width * anchor + offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudSeed {
    pub anchor: f32,
    pub offset: f32,
    pub y: f32,
    pub velocity: f32,
}

impl CloudSeed {
    pub fn x(&self, scene_width: f32) -> f32 {
        scene_width * self.anchor + self.offset
    }
}

/// Parameters controlling the cloud population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParams {
    pub seeds: Vec<CloudSeed>,
    /// x where respawned clouds enter, off the left edge
    pub spawn_x: f32,
    pub spawn_y: Span,
    pub velocity: Span,
    pub respawn_delay_ms: Span,
    /// How far past the right edge a cloud may drift before removal
    pub exit_margin: f32,
    /// Ceiling on live plus pending clouds
    pub max_clouds: usize,
    pub puff_radius: f32,
    pub puff_count: usize,
    pub puff_spacing: f32,
    pub puff_lift: f32,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            seeds: vec![
                CloudSeed { anchor: 0.0, offset: 25.0, y: 50.0, velocity: 0.2 },
                CloudSeed { anchor: 0.5, offset: 0.0, y: 80.0, velocity: 0.4 },
                CloudSeed { anchor: 1.0, offset: -70.0, y: 50.0, velocity: 0.6 },
            ],
            spawn_x: -80.0,
            spawn_y: Span::new(50.0, 100.0),
            velocity: Span::new(0.2, 0.6),
            respawn_delay_ms: Span::new(1000.0, 4000.0),
            exit_margin: 20.0,
            max_clouds: 8,
            puff_radius: 20.0,
            puff_count: 5,
            puff_spacing: 15.0,
            puff_lift: 15.0,
        }
    }
}

/// What happened during one [`CloudField::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloudTick {
    pub removed: usize,
    pub respawns_scheduled: usize,
    pub spawned: usize,
}

/// Drifting, self-replenishing cloud population
pub struct CloudField {
    clouds: Vec<CloudParticle>,
    /// Due times (ms) of respawns waiting to enter
    respawns: Vec<f64>,
    params: CloudParams,
    scene_width: f32,
    color: Color,
}

impl CloudField {
    pub fn new(params: CloudParams, scene_width: f32, color: Color) -> Self {
        Self {
            clouds: Vec::with_capacity(params.max_clouds),
            respawns: Vec::new(),
            params,
            scene_width,
            color,
        }
    }

    /// Place the configured seed clouds, each on a random layer
    pub fn seed<R: RandomRange + ?Sized>(&mut self, rng: &mut R) {
        let seeds = self.params.seeds.clone();
        for seed in seeds.iter().take(self.params.max_clouds) {
            self.clouds.push(CloudParticle {
                x: seed.x(self.scene_width),
                y: seed.y,
                velocity: seed.velocity,
                layer: CloudLayer::random(rng),
            });
        }
    }

    /// Drift every cloud, drop the ones past the right edge and schedule
    /// their replacements, then let in any respawns that are due by `now`
    pub fn advance<R: RandomRange + ?Sized>(&mut self, now: f64, rng: &mut R) -> CloudTick {
        let limit = self.scene_width;
        let margin = self.params.exit_margin;
        let mut tick = CloudTick::default();

        self.clouds.retain_mut(|cloud| {
            cloud.x += cloud.velocity;
            let inside = cloud.x - margin <= limit;
            if !inside {
                tick.removed += 1;
            }
            inside
        });

        for _ in 0..tick.removed {
            if self.population() >= self.params.max_clouds {
                log::debug!("cloud cap of {} reached; respawn dropped", self.params.max_clouds);
                continue;
            }
            let delay = self.params.respawn_delay_ms.sample(rng) as f64;
            self.respawns.push(now + delay);
            tick.respawns_scheduled += 1;
        }

        let mut due = 0;
        self.respawns.retain(|&at| {
            let ready = at <= now;
            if ready {
                due += 1;
            }
            !ready
        });
        for _ in 0..due {
            self.spawn(rng);
            tick.spawned += 1;
        }

        tick
    }

    /// Add a fresh cloud entering from off the left edge
    pub fn spawn<R: RandomRange + ?Sized>(&mut self, rng: &mut R) -> CloudParticle {
        let cloud = CloudParticle {
            x: self.params.spawn_x,
            y: self.params.spawn_y.sample(rng).floor(),
            velocity: self.params.velocity.sample(rng),
            layer: CloudLayer::random(rng),
        };
        self.clouds.push(cloud);
        log::debug!("cloud entered at y={} v={:.3}", cloud.y, cloud.velocity);
        cloud
    }

    /// Insert a specific cloud
    pub fn push(&mut self, cloud: CloudParticle) {
        self.clouds.push(cloud);
    }

    /// Draw the clouds tagged with `layer`
    pub fn render<C: Canvas2d + ?Sized>(&self, canvas: &mut C, layer: CloudLayer) {
        for cloud in self.clouds.iter().filter(|c| c.layer == layer) {
            self.draw_cloud(canvas, cloud);
        }
    }

    /// Draw every cloud regardless of layer
    pub fn render_all<C: Canvas2d + ?Sized>(&self, canvas: &mut C) {
        for cloud in &self.clouds {
            self.draw_cloud(canvas, cloud);
        }
    }

    fn draw_cloud<C: Canvas2d + ?Sized>(&self, canvas: &mut C, cloud: &CloudParticle) {
        let p = &self.params;
        canvas.set_fill_color(self.color);
        canvas.begin_path();

        let mut x = cloud.x;
        for i in 0..p.puff_count {
            let y = if i % 2 == 0 { cloud.y } else { cloud.y - p.puff_lift };
            canvas.arc(x, y, p.puff_radius, 0.0, TAU, false);
            x += p.puff_spacing;
        }

        canvas.fill();
    }

    pub fn clouds(&self) -> &[CloudParticle] {
        &self.clouds
    }

    /// Due times of respawns not yet entered
    pub fn pending_respawns(&self) -> &[f64] {
        &self.respawns
    }

    /// Live clouds plus pending respawns
    pub fn population(&self) -> usize {
        self.clouds.len() + self.respawns.len()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}
