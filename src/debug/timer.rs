use instant::Instant;

/// Which stage of the simulation tick is being timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TickPhase {
    Movement = 0,
    Snapshot = 1,
    IndexRebuild = 2,
    OverlapBuild = 3,
    Damage = 4,
    Pickups = 5,
    Separation = 6,
    Cleanup = 7,
}

impl TickPhase {
    pub const ALL: [TickPhase; 8] = [
        Self::Movement,
        Self::Snapshot,
        Self::IndexRebuild,
        Self::OverlapBuild,
        Self::Damage,
        Self::Pickups,
        Self::Separation,
        Self::Cleanup,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Movement => "Movement",
            Self::Snapshot => "Snapshot",
            Self::IndexRebuild => "Index",
            Self::OverlapBuild => "Overlap Idx",
            Self::Damage => "Damage",
            Self::Pickups => "Pickups",
            Self::Separation => "Separation",
            Self::Cleanup => "Cleanup",
        }
    }
}

/// Individual index operations inside the rebuild and query phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IndexOp {
    EnemyGrid = 0,
    DamagerGrid = 1,
    PickupGrid = 2,
    NeighborGrid = 3,
    OverlapBuild = 4,
    OverlapFind = 5,
}

impl IndexOp {
    pub const ALL: [IndexOp; 6] = [
        Self::EnemyGrid,
        Self::DamagerGrid,
        Self::PickupGrid,
        Self::NeighborGrid,
        Self::OverlapBuild,
        Self::OverlapFind,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::EnemyGrid => "enemy grid",
            Self::DamagerGrid => "damager grid",
            Self::PickupGrid => "pickup grid",
            Self::NeighborGrid => "neighbor grid",
            Self::OverlapBuild => "overlap build",
            Self::OverlapFind => "overlap find",
        }
    }
}

/// Sink for wall-clock samples.
pub trait Telemetry {
    fn record(&mut self, phase: TickPhase, elapsed_us: f64);

    /// One index insert/query pass. Ignored unless overridden.
    fn record_op(&mut self, _op: IndexOp, _elapsed_us: f64) {}

    /// Called alongside the periodic stats log line.
    fn log_summary(&self) {}
}

/// Discards every sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTelemetry;

impl Telemetry for NoTelemetry {
    #[inline]
    fn record(&mut self, _phase: TickPhase, _elapsed_us: f64) {}
}

/// Something a `Scope` can be keyed by.
pub trait Sample: Copy {
    fn send<T: Telemetry + ?Sized>(self, sink: &mut T, elapsed_us: f64);
}

impl Sample for TickPhase {
    fn send<T: Telemetry + ?Sized>(self, sink: &mut T, elapsed_us: f64) {
        sink.record(self, elapsed_us);
    }
}

impl Sample for IndexOp {
    fn send<T: Telemetry + ?Sized>(self, sink: &mut T, elapsed_us: f64) {
        sink.record_op(self, elapsed_us);
    }
}

/// Times a block: records into the sink when dropped, whichever way the
/// block exits.
pub struct Scope<'a, T: Telemetry + ?Sized, K: Sample = TickPhase> {
    sink: &'a mut T,
    key: K,
    start: Instant,
}

pub fn scope<T: Telemetry + ?Sized, K: Sample>(sink: &mut T, key: K) -> Scope<'_, T, K> {
    Scope {
        sink,
        key,
        start: Instant::now(),
    }
}

impl<T: Telemetry + ?Sized, K: Sample> Scope<'_, T, K> {
    /// Reborrow the sink for nested scopes inside this one.
    pub fn sink(&mut self) -> &mut T {
        &mut *self.sink
    }
}

impl<T: Telemetry + ?Sized, K: Sample> Drop for Scope<'_, T, K> {
    fn drop(&mut self) {
        let elapsed_us = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        self.key.send(&mut *self.sink, elapsed_us);
    }
}

/// Per-phase timing with exponential moving average smoothing.
pub struct PhaseTimers {
    /// EMA-smoothed duration in microseconds per phase.
    pub durations_us: [f64; 8],
    /// Raw duration of each phase in the most recent tick.
    pub last_us: [f64; 8],
    /// EMA-smoothed duration per index operation, summed over a tick.
    pub ops_us: [f64; 6],
    /// Accumulates op samples until the next `Cleanup` phase closes the tick.
    pending_ops_us: [f64; 6],
}

const EMA_ALPHA: f64 = 0.1;

impl PhaseTimers {
    pub fn new() -> Self {
        Self {
            durations_us: [0.0; 8],
            last_us: [0.0; 8],
            ops_us: [0.0; 6],
            pending_ops_us: [0.0; 6],
        }
    }

    /// Sum of all smoothed phase durations (microseconds).
    pub fn total_us(&self) -> f64 {
        self.durations_us.iter().sum()
    }

    /// Sum of the most recent raw samples (microseconds).
    pub fn last_total_us(&self) -> f64 {
        self.last_us.iter().sum()
    }
}

impl Default for PhaseTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry for PhaseTimers {
    fn record(&mut self, phase: TickPhase, elapsed_us: f64) {
        let idx = phase as usize;
        self.last_us[idx] = elapsed_us;
        self.durations_us[idx] =
            self.durations_us[idx] * (1.0 - EMA_ALPHA) + elapsed_us * EMA_ALPHA;

        if phase == TickPhase::Cleanup {
            for (avg, pending) in self.ops_us.iter_mut().zip(self.pending_ops_us.iter_mut()) {
                *avg = *avg * (1.0 - EMA_ALPHA) + *pending * EMA_ALPHA;
                *pending = 0.0;
            }
        }
    }

    fn record_op(&mut self, op: IndexOp, elapsed_us: f64) {
        self.pending_ops_us[op as usize] += elapsed_us;
    }

    fn log_summary(&self) {
        for phase in TickPhase::ALL {
            log::debug!(
                "  {:<12} {:>6.0}us",
                phase.label(),
                self.durations_us[phase as usize]
            );
        }
        for op in IndexOp::ALL {
            log::debug!("    {:<14} {:>6.0}us", op.label(), self.ops_us[op as usize]);
        }
    }
}
