/// Slack for display refresh jitter, in milliseconds
const JITTER_TOLERANCE_MS: f64 = 1.0;

/// Gates a draw loop to a target frame rate using host timestamps (ms)
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval_ms: f64,
    last_tick: Option<f64>,
}

impl FramePacer {
    /// `fps` must be positive; configuration validation guarantees it
    pub fn new(fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / fps,
            last_tick: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// True when a tick is due at `now`; records the tick if so
    pub fn ready(&mut self, now: f64) -> bool {
        let due = match self.last_tick {
            None => true,
            // Clock went backwards (host reset); resync rather than stall
            Some(last) if now < last => true,
            Some(last) => now - last >= self.interval_ms - JITTER_TOLERANCE_MS,
        };
        if due {
            self.last_tick = Some(now);
        }
        due
    }

    /// Forget the last tick so the next frame is drawn immediately
    pub fn reset(&mut self) {
        self.last_tick = None;
    }
}
