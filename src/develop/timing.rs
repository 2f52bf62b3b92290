//! Step timing instrumentation for the pipeline phases.

use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: &'static str,
    pub duration: Duration,
}

/// Ordered record of the named steps one pipeline call executed.
///
/// Besides profiling, this is how the caching contract is observable: a
/// render served from the cache records no preprocess steps.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: &'static str, duration: Duration) {
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.steps
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.duration)
            .reduce(|a, b| a + b)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            info!(
                step = step.name,
                ms = format_args!("{:.3}", step.duration.as_secs_f64() * 1000.0),
                "Pipeline step"
            );
        }
        info!(
            ms = format_args!("{:.3}", total.as_secs_f64() * 1000.0),
            "Pipeline total"
        );
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_accumulate_in_order() {
        let mut timings = PipelineTimings::new();
        timings.add_step("first", Duration::from_millis(2));
        timings.add_step("second", Duration::from_millis(3));
        timings.add_step("first", Duration::from_millis(5));

        assert_eq!(timings.steps().len(), 3);
        assert_eq!(timings.get_step("first"), Some(Duration::from_millis(7)));
        assert_eq!(timings.get_step("second"), Some(Duration::from_millis(3)));
        assert_eq!(timings.get_step("missing"), None);
        assert_eq!(timings.total_duration(), Duration::from_millis(10));
    }

    #[test]
    fn timer_reports_its_name() {
        let timer = Timer::start("step");
        let (name, duration) = timer.stop();
        assert_eq!(name, "step");
        assert!(duration >= Duration::ZERO);
    }
}
