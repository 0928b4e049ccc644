use serde::{Deserialize, Serialize};

use crate::animation::PendingFrames;
use crate::error::SceneError;
use crate::math::{RandomRange, Vec2};
use crate::render::{Canvas2d, Color};

/// Parameters controlling how the tree grows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Trunk stroke width, also scales the per-branch time budget
    pub base_width: f32,
    /// Branch length relative to the time spent growing it
    pub branch_length: f32,
    /// Upward velocity per tick
    pub rate_of_growth: f32,
    /// Sideways drift per tick, higher shoots branches wider
    pub branch_spread: f32,
    /// Stroke width and length multiplier applied at each split
    pub split_ratio: f32,
    /// Fraction of the time budget after which a branch splits
    pub split_point: f32,
    pub min_stroke_width: f32,
    pub max_branches: usize,
    /// Sideways jitter of the lone trunk
    pub trunk_wiggle: f32,
    /// How fast the drawn width tapers over a branch's lifetime
    pub taper_rate: f32,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            base_width: 20.0,
            branch_length: 250.0,
            rate_of_growth: 1.0,
            branch_spread: 1.0,
            split_ratio: 2.0 / 3.0,
            split_point: 5.0 / 8.0,
            min_stroke_width: 0.2,
            max_branches: 64,
            trunk_wiggle: 0.5,
            taper_rate: 4.0,
        }
    }
}

/// Narrowest line the engine will ask the canvas to draw
const MIN_DRAWN_WIDTH: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    pub tip: Vec2,
    /// Latched on the branch's first tick, cleared by every split
    pub start_time: Option<f64>,
}

impl Branch {
    fn new(tip: Vec2) -> Self {
        Self { tip, start_time: None }
    }
}

/// What a single branch tick decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Rescheduled for the next frame
    Continue,
    /// Every branch was duplicated and rescheduled
    Split,
    /// Growth finished, nothing left pending
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthStatus {
    Idle,
    Growing,
    Stopped,
    Aborted,
}

/// Recursive branch growth driven one frame at a time.
///
/// Each live branch has at most one pending continuation. A split cancels
/// every continuation before the branch list grows, so no tick ever runs
/// against the old topology.
#[derive(Debug, Clone)]
pub struct BranchGrowth {
    params: GrowthParams,
    stroke_width: f32,
    branch_length: f32,
    branches: Vec<Branch>,
    pending: PendingFrames<usize>,
    status: GrowthStatus,
    splits: u32,
    bark: Color,
}

impl BranchGrowth {
    /// Plant a single trunk branch at `base`
    pub fn new(params: GrowthParams, base: Vec2, bark: Color) -> Self {
        Self {
            params,
            stroke_width: params.base_width,
            branch_length: params.branch_length,
            branches: vec![Branch::new(base)],
            pending: PendingFrames::new(),
            status: GrowthStatus::Idle,
            splits: 0,
            bark,
        }
    }

    /// Queue the trunk's first tick. Returns false if growth already began.
    pub fn start(&mut self) -> bool {
        if self.status != GrowthStatus::Idle {
            return false;
        }
        self.status = GrowthStatus::Growing;
        self.pending.request(0);
        log::debug!("tree growth started");
        true
    }

    /// Queue a continuation for `index` on the next frame
    pub fn schedule(&mut self, index: usize) {
        self.pending.request(index);
    }

    /// Run every continuation that was due at the start of this frame.
    ///
    /// Returns how many branch ticks ran. An invalid branch index aborts
    /// growth and is returned as an error.
    pub fn tick_frame<C, R>(&mut self, now: f64, canvas: &mut C, rng: &mut R) -> Result<usize, SceneError>
    where
        C: Canvas2d + ?Sized,
        R: RandomRange + ?Sized,
    {
        let boundary = self.pending.frame_boundary();
        let mut ticks = 0;

        while let Some((_, index)) = self.pending.pop_due(boundary) {
            if let Err(err) = self.tick_branch(index, now, canvas, rng) {
                self.abort();
                return Err(err);
            }
            ticks += 1;
        }

        Ok(ticks)
    }

    /// Advance one branch tip, draw the new segment, then decide whether to
    /// stop, split, or continue
    pub fn tick_branch<C, R>(
        &mut self,
        index: usize,
        now: f64,
        canvas: &mut C,
        rng: &mut R,
    ) -> Result<TickOutcome, SceneError>
    where
        C: Canvas2d + ?Sized,
        R: RandomRange + ?Sized,
    {
        let count = self.branches.len();
        let params = self.params;
        let branch = self
            .branches
            .get_mut(index)
            .ok_or(SceneError::BranchIndexOutOfRange { index, count })?;

        let start_time = *branch.start_time.get_or_insert(now);
        let elapsed = now - start_time;
        let end_time = (params.base_width * self.branch_length) as f64;

        let taper = if end_time > 0.0 {
            (elapsed / end_time) as f32 * params.taper_rate
        } else {
            0.0
        };
        let width = (self.stroke_width - taper).max(MIN_DRAWN_WIDTH);

        let from = branch.tip;
        branch.tip.y -= rng.random_in_range(0.0, params.rate_of_growth);
        branch.tip.x += drift(index, count, &params, rng);
        let to = branch.tip;

        canvas.set_line_width(width);
        canvas.set_stroke_color(self.bark);
        canvas.begin_path();
        canvas.move_to(from.x, from.y);
        canvas.line_to(to.x, to.y);
        canvas.stroke();

        if self.stroke_width < params.min_stroke_width || count >= params.max_branches {
            self.stop();
            Ok(TickOutcome::Stopped)
        } else if elapsed >= end_time * params.split_point as f64 {
            self.split();
            Ok(TickOutcome::Split)
        } else {
            self.pending.request(index);
            Ok(TickOutcome::Continue)
        }
    }

    /// Duplicate every live branch at its current tip and restart timing
    pub fn split(&mut self) {
        self.pending.cancel_all();

        let copies: Vec<Branch> = self
            .branches
            .iter_mut()
            .rev()
            .map(|branch| {
                branch.start_time = None;
                Branch::new(branch.tip)
            })
            .collect();
        self.branches.extend(copies);

        self.stroke_width *= self.params.split_ratio;
        self.branch_length *= self.params.split_ratio;
        self.splits += 1;

        for index in (0..self.branches.len()).rev() {
            self.pending.request(index);
        }

        log::debug!(
            "split {}: {} branches, stroke width {:.3}",
            self.splits,
            self.branches.len(),
            self.stroke_width
        );
    }

    /// Cancel all continuations and mark growth finished
    pub fn stop(&mut self) {
        let dropped = self.pending.cancel_all();
        self.status = GrowthStatus::Stopped;
        log::info!(
            "tree growth stopped with {} branches after {} splits ({} continuations dropped)",
            self.branches.len(),
            self.splits,
            dropped
        );
    }

    /// Cancel all continuations after an invariant violation
    pub fn abort(&mut self) {
        self.pending.cancel_all();
        self.status = GrowthStatus::Aborted;
    }

    pub fn is_growing(&self) -> bool {
        self.status == GrowthStatus::Growing && !self.pending.is_empty()
    }

    pub fn status(&self) -> GrowthStatus {
        self.status
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn branch_length(&self) -> f32 {
        self.branch_length
    }

    pub fn splits(&self) -> u32 {
        self.splits
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }
}

/// Sideways step for one tick: the lone trunk wiggles either way, then the
/// left half of the branches leans left and the right half leans right
fn drift<R: RandomRange + ?Sized>(index: usize, count: usize, params: &GrowthParams, rng: &mut R) -> f32 {
    if count == 1 && index == 0 {
        let wiggle = rng.random_in_range(0.0, params.trunk_wiggle);
        if rng.coin_flip() {
            wiggle
        } else {
            -wiggle
        }
    } else if (index as f32) < count as f32 / 2.0 {
        -rng.random_in_range(0.0, params.branch_spread)
    } else {
        rng.random_in_range(0.0, params.branch_spread)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{SceneRng, ScriptedRandom};
    use crate::visual::{CommandRecorder, DrawCommand, FrameSummary};

    const BARK: Color = Color::rgb(130, 82, 1);
    const FRAME_MS: f64 = 50.0;

    fn engine() -> BranchGrowth {
        BranchGrowth::new(GrowthParams::default(), Vec2::new(390.0, 450.0), BARK)
    }

    /// Drive frames until growth settles or `max_frames` pass
    fn run(growth: &mut BranchGrowth, max_frames: usize) -> Vec<usize> {
        let mut canvas = CommandRecorder::new();
        let mut rng = SceneRng::seeded(11);
        let mut counts = vec![growth.branch_count()];

        for frame in 0..max_frames {
            let now = frame as f64 * FRAME_MS;
            growth.tick_frame(now, &mut canvas, &mut rng).unwrap();
            if *counts.last().unwrap() != growth.branch_count() {
                counts.push(growth.branch_count());
            }
            if growth.status() != GrowthStatus::Growing {
                break;
            }
        }
        counts
    }

    #[test]
    fn test_start_is_once() {
        let mut growth = engine();
        assert_eq!(growth.status(), GrowthStatus::Idle);
        assert!(growth.start());
        assert!(!growth.start());
        assert_eq!(growth.pending_count(), 1);
    }

    #[test]
    fn test_branch_count_doubles_each_split() {
        let mut growth = engine();
        growth.start();

        let counts = run(&mut growth, 10_000);
        assert_eq!(counts, vec![1, 2, 4, 8, 16, 32, 64]);
    }

    #[test]
    fn test_split_scales_by_ratio() {
        let mut growth = engine();
        let ratio = 2.0f32 / 3.0;

        for k in 1..=4 {
            growth.split();
            assert_eq!(growth.branch_count(), 1 << k);
            assert_eq!(growth.splits(), k as u32);

            let expected = ratio.powi(k);
            assert!((growth.stroke_width() - 20.0 * expected).abs() < 1e-4);
            assert!((growth.branch_length() - 250.0 * expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_split_copies_tips_and_resets_timing() {
        let mut growth = engine();
        growth.start();
        let mut canvas = CommandRecorder::new();
        let mut rng = ScriptedRandom::constant(0.5);
        growth.tick_frame(0.0, &mut canvas, &mut rng).unwrap();
        assert_eq!(growth.branches()[0].start_time, Some(0.0));

        growth.split();
        let branches = growth.branches();
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].tip, branches[1].tip);
        assert!(branches.iter().all(|b| b.start_time.is_none()));
        assert_eq!(growth.pending_count(), 2);
    }

    #[test]
    fn test_split_cancels_rest_of_frame() {
        let mut growth = engine();
        growth.split();
        growth.split();
        assert_eq!(growth.pending_count(), 4);

        // Latch every branch at t=0, then jump past the split point
        let mut canvas = CommandRecorder::new();
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(growth.tick_frame(0.0, &mut canvas, &mut rng).unwrap(), 4);

        // The first branch to tick splits; the other three never run
        assert_eq!(growth.tick_frame(10_000.0, &mut canvas, &mut rng).unwrap(), 1);
        assert_eq!(growth.branch_count(), 8);
        assert_eq!(growth.pending_count(), 8);
    }

    #[test]
    fn test_runs_to_cap_with_nothing_pending() {
        let mut growth = engine();
        growth.start();
        run(&mut growth, 10_000);

        assert_eq!(growth.status(), GrowthStatus::Stopped);
        assert_eq!(growth.branch_count(), 64);
        assert_eq!(growth.pending_count(), 0);
        assert!(!growth.is_growing());

        // Further frames are no-ops
        let mut canvas = CommandRecorder::new();
        let ticks = growth.tick_frame(1e9, &mut canvas, &mut SceneRng::seeded(1)).unwrap();
        assert_eq!(ticks, 0);
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_stroke_floor_stops_growth() {
        let params = GrowthParams {
            base_width: 0.25,
            ..GrowthParams::default()
        };
        let mut growth = BranchGrowth::new(params, Vec2::ZERO, BARK);
        growth.start();
        growth.split();
        assert!(growth.stroke_width() < 0.2);

        let mut canvas = CommandRecorder::new();
        let mut rng = ScriptedRandom::constant(0.5);
        let outcome = growth.tick_branch(1, 0.0, &mut canvas, &mut rng).unwrap();
        assert_eq!(outcome, TickOutcome::Stopped);
        assert_eq!(growth.pending_count(), 0);
    }

    #[test]
    fn test_trunk_tick_draws_tapered_segment() {
        let mut growth = engine();
        growth.start();
        let mut canvas = CommandRecorder::new();
        let mut rng = ScriptedRandom::new(vec![0.5, 0.5, 0.9]);

        growth.tick_frame(100.0, &mut canvas, &mut rng).unwrap();
        let first_frame = canvas.take();
        assert_eq!(
            first_frame.last(),
            Some(&DrawCommand::Stroke { color: BARK, line_width: 20.0 })
        );
        // Rose by half the growth rate; a 0.9 coin sample wiggles left
        assert_eq!(growth.branches()[0].tip, Vec2::new(389.75, 449.5));

        // Halfway through the 5000ms budget: 20 - 0.5 * 4
        growth.tick_frame(2600.0, &mut canvas, &mut rng).unwrap();
        let summary = FrameSummary::from_commands(canvas.commands());
        assert_eq!(summary.stroke_widths, vec![18.0]);
    }

    #[test]
    fn test_drift_direction_by_half() {
        let params = GrowthParams::default();
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(drift(0, 4, &params, &mut rng), -0.5);
        assert_eq!(drift(1, 4, &params, &mut rng), -0.5);
        assert_eq!(drift(2, 4, &params, &mut rng), 0.5);
        assert_eq!(drift(3, 4, &params, &mut rng), 0.5);
    }

    #[test]
    fn test_drawn_width_never_below_floor() {
        let mut growth = engine();
        growth.start();
        let mut canvas = CommandRecorder::new();
        let mut rng = ScriptedRandom::constant(0.5);
        growth.tick_branch(0, 0.0, &mut canvas, &mut rng).unwrap();
        // Long stall: the taper would go negative
        growth.tick_branch(0, 1e6, &mut canvas, &mut rng).unwrap();

        let summary = FrameSummary::from_commands(canvas.commands());
        assert_eq!(summary.stroke_widths.last(), Some(&MIN_DRAWN_WIDTH));
    }

    #[test]
    fn test_out_of_range_index_aborts() {
        let mut growth = engine();
        growth.start();
        growth.schedule(5);

        let mut canvas = CommandRecorder::new();
        let err = growth
            .tick_frame(0.0, &mut canvas, &mut ScriptedRandom::constant(0.5))
            .unwrap_err();

        assert_eq!(err, SceneError::BranchIndexOutOfRange { index: 5, count: 1 });
        assert_eq!(growth.status(), GrowthStatus::Aborted);
        assert_eq!(growth.pending_count(), 0);
    }
}
