//! Scroll position sampling with direction hysteresis.
//!
//! The tracker is fed raw viewport offsets (in virtual pixels) by whatever
//! owns the viewport.  Samples pass through a leading-edge [`Throttle`];
//! admitted samples update the published [`ScrollState`].
//!
//! Direction only flips once the viewport has travelled more than
//! [`DIRECTION_HYSTERESIS_PX`] against the current direction, measured from
//! the furthest point reached in that direction.  Wheel micro-jitter (a few
//! pixels back and forth) therefore never flaps the direction.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use super::throttle::Throttle;

/// Distance that must be exceeded against the current direction to flip it.
pub const DIRECTION_HYSTERESIS_PX: u32 = 10;

/// Default sampling interval for raw scroll events.
pub const SCROLL_SAMPLE_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Up,
    #[default]
    Down,
}

/// Last sampled scroll position and coarse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollState {
    /// Vertical offset in pixels, never negative.
    pub position: u32,
    pub direction: Direction,
}

/// Read-only view of the scroll signal.
///
/// Consumers read the current sample or subscribe to changes.  Dropping the
/// returned receiver ends the subscription.
pub trait ViewportSignal {
    fn position(&self) -> u32;
    fn direction(&self) -> Direction;
    fn subscribe(&self) -> watch::Receiver<ScrollState>;
}

/// Sole writer of [`ScrollState`].
#[derive(Debug)]
pub struct ScrollTracker {
    state: ScrollState,
    /// Extreme position reached in the current direction.
    anchor: u32,
    gate: Throttle,
    tx: watch::Sender<ScrollState>,
}

impl ScrollTracker {
    /// Start tracking from `initial_offset`, admitting at most one sample
    /// per `interval`.
    pub fn new(initial_offset: i64, interval: Duration) -> Self {
        let position = floor_offset(initial_offset);
        let state = ScrollState {
            position,
            direction: Direction::Down,
        };
        let (tx, _) = watch::channel(state);
        Self {
            state,
            anchor: position,
            gate: Throttle::new(interval),
            tx,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Feed a raw scroll event.  Returns `true` if the sample was admitted
    /// by the throttle (whether or not the state actually changed).
    pub fn on_scroll(&mut self, now: Instant, raw_offset: i64) -> bool {
        if !self.gate.admit(now) {
            return false;
        }
        let next = self.sample(raw_offset);
        if next != self.state {
            if next.direction != self.state.direction {
                tracing::trace!(position = next.position, direction = ?next.direction, "scroll direction flipped");
            }
            self.state = next;
            self.tx.send_replace(next);
        }
        true
    }

    fn sample(&mut self, raw_offset: i64) -> ScrollState {
        let position = floor_offset(raw_offset);
        let mut direction = self.state.direction;

        match direction {
            Direction::Down => {
                if position >= self.anchor {
                    self.anchor = position;
                } else if self.anchor - position > DIRECTION_HYSTERESIS_PX {
                    direction = Direction::Up;
                    self.anchor = position;
                }
            }
            Direction::Up => {
                if position <= self.anchor {
                    self.anchor = position;
                } else if position - self.anchor > DIRECTION_HYSTERESIS_PX {
                    direction = Direction::Down;
                    self.anchor = position;
                }
            }
        }

        ScrollState {
            position,
            direction,
        }
    }
}

impl ViewportSignal for ScrollTracker {
    fn position(&self) -> u32 {
        self.state.position
    }

    fn direction(&self) -> Direction {
        self.state.direction
    }

    fn subscribe(&self) -> watch::Receiver<ScrollState> {
        self.tx.subscribe()
    }
}

fn floor_offset(raw: i64) -> u32 {
    raw.clamp(0, u32::MAX as i64) as u32
}
