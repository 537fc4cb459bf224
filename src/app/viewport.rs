//! The terminal viewport: owner of the authoritative scroll offset.
//!
//! Everything else only ever sees sampled copies of the offset: the scroll
//! tracker samples it when it moves, and the section observers read it each
//! frame.

use crate::ui::smooth_scroll::SmoothScroll;

#[derive(Debug, Clone)]
pub struct Viewport {
    scroll: SmoothScroll,
    height_px: u32,
    max_scroll: u32,
    /// Rounded offset last reported by [`Viewport::tick`].
    reported: u32,
}

impl Viewport {
    pub fn new(speed: f64) -> Self {
        Self {
            scroll: SmoothScroll::new(speed),
            height_px: 0,
            max_scroll: 0,
            reported: 0,
        }
    }

    /// Update the dimensions, keeping the offset inside the new range.
    pub fn set_geometry(&mut self, height_px: u32, max_scroll: u32) {
        self.height_px = height_px;
        self.max_scroll = max_scroll;
        self.scroll.clamp(0.0, max_scroll as f64);
    }

    pub fn height_px(&self) -> u32 {
        self.height_px
    }

    pub fn max_scroll(&self) -> u32 {
        self.max_scroll
    }

    /// Current offset, rounded to whole pixels.
    pub fn offset(&self) -> u32 {
        self.scroll.offset().round().max(0.0) as u32
    }

    pub fn target(&self) -> u32 {
        self.scroll.target().round().max(0.0) as u32
    }

    pub fn is_animating(&self) -> bool {
        self.scroll.is_animating()
    }

    /// Smooth-scroll by `delta` pixels relative to the current target.
    pub fn scroll_by(&mut self, delta: i64) {
        self.scroll.nudge(delta as f64);
        self.scroll.clamp(0.0, self.max_scroll as f64);
    }

    /// Smooth-scroll to an absolute offset.
    pub fn scroll_to(&mut self, offset: u32) {
        self.scroll.set_target(offset.min(self.max_scroll) as f64);
    }

    /// Advance the animation one frame.  Returns the new whole-pixel
    /// offset when it differs from the last one reported.
    pub fn tick(&mut self) -> Option<u32> {
        self.scroll.tick();
        let offset = self.offset();
        if offset != self.reported {
            self.reported = offset;
            Some(offset)
        } else {
            None
        }
    }
}
