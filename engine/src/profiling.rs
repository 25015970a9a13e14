use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct StepTimings {
    pub step: Duration,
    pub record: Duration,
    pub total: Duration,
}

/// Hook for capturing per-step timings from a `HeadlessRunner`.
///
/// Game-agnostic; works with any `GameLogic`.
pub trait Profiler {
    fn on_step(&mut self, _frame: usize, _timings: StepTimings) {}
}

/// Accumulates step timings and reports means and the worst step.
#[derive(Debug, Clone, Default)]
pub struct MeanTimings {
    steps: u32,
    step_sum: Duration,
    total_sum: Duration,
    worst_total: Duration,
}

impl MeanTimings {
    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn mean_step(&self) -> Duration {
        self.step_sum.checked_div(self.steps).unwrap_or_default()
    }

    pub fn mean_total(&self) -> Duration {
        self.total_sum.checked_div(self.steps).unwrap_or_default()
    }

    pub fn worst_total(&self) -> Duration {
        self.worst_total
    }
}

impl Profiler for MeanTimings {
    fn on_step(&mut self, _frame: usize, timings: StepTimings) {
        self.steps = self.steps.saturating_add(1);
        self.step_sum = self.step_sum.saturating_add(timings.step);
        self.total_sum = self.total_sum.saturating_add(timings.total);
        self.worst_total = self.worst_total.max(timings.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_timings_average_over_steps() {
        let mut m = MeanTimings::default();
        assert_eq!(m.mean_total(), Duration::ZERO);

        for ms in [2, 4] {
            let d = Duration::from_millis(ms);
            m.on_step(0, StepTimings { step: d, record: Duration::ZERO, total: d });
        }
        assert_eq!(m.steps(), 2);
        assert_eq!(m.mean_step(), Duration::from_millis(3));
        assert_eq!(m.worst_total(), Duration::from_millis(4));
    }
}
