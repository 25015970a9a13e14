use std::time::{Duration, Instant};

/// Fixed inter-frame delay plus a monotonic frame counter.
pub trait FrameClock {
    /// Blocks until the next frame may start.
    fn delay(&mut self);

    /// Number of completed delays.
    fn frame(&self) -> u64;
}

/// Spins for a fixed duration each frame. Not cancellable, no sleeping.
#[derive(Debug, Clone)]
pub struct BusyWaitClock {
    period: Duration,
    frame: u64,
}

impl BusyWaitClock {
    pub fn new(period: Duration) -> Self {
        Self { period, frame: 0 }
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl FrameClock for BusyWaitClock {
    fn delay(&mut self) {
        let start = Instant::now();
        while start.elapsed() < self.period {
            std::hint::spin_loop();
        }
        self.frame += 1;
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}

/// Counts frames without waiting.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    frame: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameClock for ManualClock {
    fn delay(&mut self) {
        self.frame += 1;
    }

    fn frame(&self) -> u64 {
        self.frame
    }
}
