//! Pixel-level smooth scroll with exponential ease-out.
//!
//! The animator chases a target offset: every tick it covers a fixed
//! fraction of the remaining distance, so a long jump starts fast and
//! visibly decelerates as it lands.

/// Offset animator.
#[derive(Debug, Clone)]
pub struct SmoothScroll {
    /// Current (fractional) offset.
    current: f64,
    /// Offset being approached.
    target: f64,
    /// Fraction of the remaining distance covered per tick.
    /// Good range: 0.2–0.4 at 60 fps.
    speed: f64,
}

/// Remaining distance below which the animation snaps to the target.
const SNAP_PX: f64 = 0.5;

impl SmoothScroll {
    pub fn new(speed: f64) -> Self {
        Self {
            current: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 0.95),
        }
    }

    pub fn set_target(&mut self, offset: f64) {
        self.target = offset;
    }

    /// Shift the target relative to where it already is, so repeated wheel
    /// notches accumulate instead of restarting from the current frame.
    pub fn nudge(&mut self, delta: f64) {
        self.target += delta;
    }

    /// Clamp both offsets into `[min, max]`.
    pub fn clamp(&mut self, min: f64, max: f64) {
        self.current = self.current.clamp(min, max);
        self.target = self.target.clamp(min, max);
    }

    /// Advance one frame.  Returns `true` if the offset moved.
    pub fn tick(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let remaining = self.target - self.current;
        if remaining.abs() < SNAP_PX {
            self.current = self.target;
        } else {
            self.current += remaining * self.speed;
        }
        true
    }

    pub fn offset(&self) -> f64 {
        self.current
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.current != self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_target() {
        let mut s = SmoothScroll::new(0.3);
        s.set_target(1000.0);
        let mut frames = 0;
        while s.tick() {
            frames += 1;
            assert!(frames < 200, "animation never settled");
        }
        assert_eq!(s.offset(), 1000.0);
    }

    #[test]
    fn decelerates() {
        let mut s = SmoothScroll::new(0.3);
        s.set_target(1000.0);
        s.tick();
        let first = s.offset();
        s.tick();
        let second = s.offset() - first;
        assert!(first > second);
    }

    #[test]
    fn nudges_accumulate_on_target() {
        let mut s = SmoothScroll::new(0.3);
        s.nudge(48.0);
        s.nudge(48.0);
        assert_eq!(s.target(), 96.0);
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn clamp_bounds_both_offsets() {
        let mut s = SmoothScroll {
            current: 500.0,
            target: -20.0,
            speed: 0.3,
        };
        s.clamp(0.0, 300.0);
        assert_eq!(s.offset(), 300.0);
        assert_eq!(s.target(), 0.0);
    }
}
