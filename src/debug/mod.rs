pub mod ring;
pub mod timer;

use self::ring::RingBuffer;

/// Number of tick times to keep in the history.
const TICK_HISTORY_LEN: usize = 300;

/// Rolling tick cost stats with a periodic log line.
pub struct TickStats {
    /// Rolling window of per-tick cost (microseconds).
    pub history: RingBuffer<f64>,

    /// Computed over `history`.
    pub avg_us: f64,
    pub min_us: f64,
    pub max_us: f64,

    tick_count: u64,
    log_interval: f32,
    log_timer: f32,
    log_ticks: u32,
    log_sum: f64,
    log_max: f64,
}

impl TickStats {
    pub fn new(log_interval: f32) -> Self {
        Self {
            history: RingBuffer::new(TICK_HISTORY_LEN),
            avg_us: 0.0,
            min_us: 0.0,
            max_us: 0.0,
            tick_count: 0,
            log_interval,
            log_timer: 0.0,
            log_ticks: 0,
            log_sum: 0.0,
            log_max: 0.0,
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Record one tick's cost; `dt` is simulated seconds for the log timer.
    /// Returns true when this tick emitted the periodic log line.
    pub fn record_tick(&mut self, cost_us: f64, dt: f32, entities: u32) -> bool {
        self.tick_count += 1;
        self.history.push(cost_us);

        if let Some(window) = self.history.summary() {
            self.avg_us = window.avg;
            self.min_us = window.min;
            self.max_us = window.max;
        }

        self.log_ticks += 1;
        self.log_sum += cost_us;
        self.log_max = self.log_max.max(cost_us);
        self.log_timer += dt;

        if self.log_timer >= self.log_interval {
            let avg = self.log_sum / self.log_ticks.max(1) as f64;
            log::info!(
                "ticks: {} | entities: {} | avg: {:.0}us | max: {:.0}us",
                self.tick_count,
                entities,
                avg,
                self.log_max,
            );
            self.log_timer = 0.0;
            self.log_ticks = 0;
            self.log_sum = 0.0;
            self.log_max = 0.0;
            return true;
        }
        false
    }
}
