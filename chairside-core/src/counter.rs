//! Count-up animation for headline numbers.
//!
//! Purely a function of elapsed time: callers drive it from whatever frame
//! loop they have. Once `elapsed >= duration` the value is exactly the target.

use std::time::Duration;

use crate::format::format_grouped;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    #[default]
    EaseOutCubic,
}

impl Easing {
    /// Map progress in [0, 1] to eased progress in [0, 1]
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Tween from `from` to `to` over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountUp {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl CountUp {
    pub fn new(to: f64, duration: Duration) -> Self {
        Self {
            from: 0.0,
            to,
            duration,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if self.is_finished(elapsed) {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

/// A count-up with its prefix/suffix, e.g. `$` and `%`
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatedCounter {
    pub count: CountUp,
    pub prefix: String,
    pub suffix: String,
}

impl AnimatedCounter {
    pub fn new(target: f64, duration: Duration) -> Self {
        Self {
            count: CountUp::new(target, duration),
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.count.is_finished(elapsed)
    }

    /// Text for the frame at `elapsed`
    pub fn frame(&self, elapsed: Duration) -> String {
        let v = self.count.value_at(elapsed).round() as i64;
        format!("{}{}{}", self.prefix, format_grouped(v), self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaches_exact_target() {
        let c = CountUp::new(146_000.0, Duration::from_millis(1000));
        assert_eq!(c.value_at(Duration::from_millis(1000)), 146_000.0);
        assert_eq!(c.value_at(Duration::from_secs(60)), 146_000.0);
    }

    #[test]
    fn test_monotonic_progress() {
        let c = CountUp::new(2433.0, Duration::from_millis(1000));
        let mut last = c.value_at(Duration::ZERO);
        assert_eq!(last, 0.0);
        for ms in (50..=1000).step_by(50) {
            let v = c.value_at(Duration::from_millis(ms));
            assert!(v >= last, "{} < {} at {}ms", v, last, ms);
            assert!(v <= 2433.0);
            last = v;
        }
    }

    #[test]
    fn test_ease_out_runs_ahead_of_linear() {
        let eased = CountUp::new(100.0, Duration::from_secs(1));
        let linear = eased.with_easing(Easing::Linear);
        let half = Duration::from_millis(500);
        assert_eq!(linear.value_at(half), 50.0);
        assert_eq!(eased.value_at(half), 87.5);
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let c = CountUp::new(42.0, Duration::ZERO);
        assert!(c.is_finished(Duration::ZERO));
        assert_eq!(c.value_at(Duration::ZERO), 42.0);
    }

    #[test]
    fn test_frame_text() {
        let counter = AnimatedCounter::new(120_000.0, Duration::from_millis(800)).prefix("$");
        assert_eq!(counter.frame(Duration::ZERO), "$0");
        assert_eq!(counter.frame(Duration::from_millis(800)), "$120,000");

        let roi = AnimatedCounter::new(2433.0, Duration::from_millis(800)).suffix("%");
        assert_eq!(roi.frame(Duration::from_secs(2)), "2,433%");
    }
}
