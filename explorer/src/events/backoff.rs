//! Reconnect delay policy for the event channel connection

use rand::Rng;
use std::time::Duration;

const DEFAULT_JITTER: f64 = 0.2;

/// Exponential backoff: the base delay doubles after every failure up to
/// `max`, and each returned delay adds up to `jitter * base` of random slack
/// (still capped at `max`).
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
    jitter: f64,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(initial);
        Self {
            initial,
            max,
            current: initial,
            jitter: DEFAULT_JITTER,
        }
    }

    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.clamp(0.0, 1.0);
        self
    }

    pub fn next_delay(&mut self) -> Duration {
        let base = self.current;
        self.current = (self.current * 2).min(self.max);

        if self.jitter == 0.0 {
            return base;
        }
        let slack = base.mul_f64(self.jitter * rand::thread_rng().gen::<f64>());
        (base + slack).min(self.max)
    }

    /// Called after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}
