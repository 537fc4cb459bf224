//! Leading-edge rate limiter.
//!
//! The first call of a burst goes through immediately; every call that
//! arrives before `interval` has elapsed since the last *admitted* call is
//! dropped.  There is no trailing call: a suppressed call is gone, it is not
//! queued for later delivery.
//!
//! Time is always passed in by the caller so the limiter stays pure and
//! deterministic under test.

use std::time::{Duration, Instant};

/// Gate that admits at most one call per `interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throttle {
    interval: Duration,
    last_admitted: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_admitted: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `true` if a call at `now` would be admitted (no state change).
    pub fn is_open(&self, now: Instant) -> bool {
        match self.last_admitted {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    /// Try to pass the gate at `now`.  Returns `true` and starts a new
    /// cool-down window when admitted, `false` when the call is dropped.
    pub fn admit(&mut self, now: Instant) -> bool {
        if self.is_open(now) {
            self.last_admitted = Some(now);
            true
        } else {
            false
        }
    }

    /// Run `f` if the gate admits a call at `now`.
    pub fn call<T>(&mut self, now: Instant, f: impl FnOnce() -> T) -> Option<T> {
        if self.admit(now) {
            Some(f())
        } else {
            None
        }
    }
}

/// A callback bundled with its own [`Throttle`].
#[derive(Debug)]
pub struct Throttled<F> {
    gate: Throttle,
    func: F,
}

impl<F> Throttled<F> {
    pub fn new(interval: Duration, func: F) -> Self {
        Self {
            gate: Throttle::new(interval),
            func,
        }
    }

    /// Forget the last admitted call; the next call goes straight through.
    pub fn reset(&mut self) {
        self.gate = Throttle::new(self.gate.interval());
    }

    /// Invoke the wrapped callback with `arg` unless it is still cooling
    /// down.  Returns the callback's result when it ran.
    pub fn call<A, R>(&mut self, now: Instant, arg: A) -> Option<R>
    where
        F: FnMut(A) -> R,
    {
        let func = &mut self.func;
        self.gate.call(now, || func(arg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn first_call_is_admitted_immediately() {
        let t0 = Instant::now();
        let mut gate = Throttle::new(Duration::from_millis(150));
        assert!(gate.admit(t0));
    }

    #[test]
    fn calls_inside_window_are_dropped_not_deferred() {
        let t0 = Instant::now();
        let mut calls = Vec::new();
        let mut throttled = Throttled::new(Duration::from_millis(10), |t: u64| calls.push(t));

        for t in [0, 5, 12] {
            throttled.call(at(t0, t), t);
        }
        drop(throttled);

        assert_eq!(calls, vec![0, 12]);
    }

    #[test]
    fn window_restarts_from_the_admitted_call() {
        let t0 = Instant::now();
        let mut gate = Throttle::new(Duration::from_millis(10));
        assert!(gate.admit(at(t0, 0)));
        assert!(!gate.admit(at(t0, 9)));
        assert!(gate.admit(at(t0, 10)));
        assert!(!gate.admit(at(t0, 19)));
        assert!(gate.admit(at(t0, 25)));
    }

    #[test]
    fn is_open_does_not_consume_the_window() {
        let t0 = Instant::now();
        let mut gate = Throttle::new(Duration::from_millis(10));
        assert!(gate.is_open(t0));
        assert!(gate.is_open(t0));
        assert!(gate.admit(t0));
        assert!(!gate.is_open(at(t0, 3)));
    }

    #[test]
    fn dropped_call_returns_none() {
        let t0 = Instant::now();
        let mut throttled = Throttled::new(Duration::from_millis(150), |i: usize| i * 2);
        assert_eq!(throttled.call(at(t0, 0), 2), Some(4));
        assert_eq!(throttled.call(at(t0, 100), 3), None);
        assert_eq!(throttled.call(at(t0, 151), 3), Some(6));
    }

    #[test]
    fn reset_reopens_the_window() {
        let t0 = Instant::now();
        let mut throttled = Throttled::new(Duration::from_millis(150), |i: usize| i);
        assert_eq!(throttled.call(at(t0, 0), 1), Some(1));
        assert_eq!(throttled.call(at(t0, 20), 2), None);
        throttled.reset();
        assert_eq!(throttled.call(at(t0, 40), 3), Some(3));
        assert_eq!(throttled.call(at(t0, 60), 4), None);
    }
}
