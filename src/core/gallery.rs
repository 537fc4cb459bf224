//! Gallery view-state: which section is active and what the page derives
//! from it.
//!
//! State changes are expressed as a pure reducer, [`reduce`], over
//! [`GalleryState`] and [`GalleryEvent`].  [`GalleryController`] is the
//! composition root that owns the state together with the scroll tracker,
//! the per-section observers and the throttled activation entry point, and
//! feeds their output through the reducer.
//!
//! The activation throttle starts a fresh window whenever the active
//! section changes, by navigation or by an admitted report.
//!
//! Scroll samples and visibility reports arrive on independent streams in
//! no particular order; every transition is valid on its own, and
//! re-reporting the active section is a no-op.

use std::time::{Duration, Instant};

use super::scroll::{ScrollState, ScrollTracker, ViewportSignal};
use super::section::SectionCatalog;
use super::selector;
use super::throttle::Throttled;
use super::visibility::{ElementSpan, ObserverSet, VisibilityPredicate};

/// Minimum spacing between accepted section-activation reports.
pub const ACTIVATION_THROTTLE_MS: u64 = 150;

/// Scroll offset beyond which the "scroll to top" control is offered.
pub const SCROLL_TOP_THRESHOLD_PX: u32 = 200;

/// Inputs to the reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryEvent {
    /// A section observer reported an entry that passed the activation
    /// throttle.
    SectionInView(usize),
    /// User picked a section directly (never rate-limited).
    Navigate(usize),
    /// User asked to go back to the top of the page.
    ScrollToTop,
    /// New sample from the scroll tracker.
    Scrolled(ScrollState),
    /// Viewport or document dimensions changed.
    Resized {
        viewport_height: u32,
        document_height: u32,
    },
}

/// Side effect requested by a transition, carried out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Smooth-scroll so section `index` is at the top of the viewport.
    Section(usize),
    Top,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryState {
    /// `None` means nothing has been activated yet (hero on screen).
    pub active_section: Option<usize>,
    pub scroll: ScrollState,
    pub viewport_height: u32,
    pub document_height: u32,
    pub section_count: usize,
}

impl GalleryState {
    pub fn new(section_count: usize) -> Self {
        Self {
            active_section: None,
            scroll: ScrollState::default(),
            viewport_height: 0,
            document_height: 0,
            section_count,
        }
    }

    /// `position / (document - viewport)`, clamped to `[0, 1]`; `0` when
    /// the document has no scroll room.
    pub fn scroll_progress(&self) -> f64 {
        scroll_progress(self.scroll.position, self.document_height, self.viewport_height)
    }

    pub fn show_scroll_to_top(&self) -> bool {
        self.scroll.position > SCROLL_TOP_THRESHOLD_PX
    }
}

/// Progress ratio for a scroll position; never NaN or infinite.
pub fn scroll_progress(position: u32, document_height: u32, viewport_height: u32) -> f64 {
    let room = document_height.saturating_sub(viewport_height);
    if room == 0 {
        return 0.0;
    }
    (position as f64 / room as f64).clamp(0.0, 1.0)
}

/// Result of one reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GalleryState,
    pub request: Option<ScrollRequest>,
}

/// Pure state transition.
pub fn reduce(state: &GalleryState, event: GalleryEvent) -> Transition {
    let mut next = state.clone();
    let mut request = None;

    match event {
        GalleryEvent::SectionInView(index) => {
            if index < next.section_count && next.active_section != Some(index) {
                next.active_section = Some(index);
            }
        }
        GalleryEvent::Navigate(index) => {
            if index < next.section_count {
                next.active_section = Some(index);
                request = Some(ScrollRequest::Section(index));
            }
        }
        GalleryEvent::ScrollToTop => {
            request = Some(ScrollRequest::Top);
        }
        GalleryEvent::Scrolled(scroll) => {
            next.scroll = scroll;
        }
        GalleryEvent::Resized {
            viewport_height,
            document_height,
        } => {
            next.viewport_height = viewport_height;
            next.document_height = document_height;
        }
    }

    Transition {
        state: next,
        request,
    }
}

type ActivationFn = fn(usize) -> GalleryEvent;

/// Owns the gallery state and wires tracker, observers and selector.
#[derive(Debug)]
pub struct GalleryController {
    catalog: SectionCatalog,
    tracker: ScrollTracker,
    observers: ObserverSet,
    activation: Throttled<ActivationFn>,
    state: GalleryState,
}

impl GalleryController {
    pub fn new(
        catalog: SectionCatalog,
        tracker: ScrollTracker,
        activation_interval: Duration,
    ) -> Self {
        let count = catalog.len();
        let mut state = GalleryState::new(count);
        state.scroll = tracker.state();
        Self {
            catalog,
            tracker,
            observers: ObserverSet::new(count, VisibilityPredicate::default()),
            activation: Throttled::new(
                activation_interval,
                GalleryEvent::SectionInView as ActivationFn,
            ),
            state,
        }
    }

    pub fn catalog(&self) -> &SectionCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Read-only scroll signal for consumers.
    pub fn signal(&self) -> &impl ViewportSignal {
        &self.tracker
    }

    /// Run one event through the reducer and keep the result.
    pub fn apply(&mut self, event: GalleryEvent) -> Option<ScrollRequest> {
        let Transition { state, request } = reduce(&self.state, event);
        if state.active_section != self.state.active_section {
            tracing::debug!(
                from = ?self.state.active_section,
                to = ?state.active_section,
                "active section changed"
            );
            self.activation.reset();
        }
        self.state = state;
        request
    }

    /// Feed a raw viewport offset to the tracker.  Admitted samples are
    /// published on the tracker's signal; the host delivers them back via
    /// [`GalleryEvent::Scrolled`].
    pub fn sample_scroll(&mut self, now: Instant, raw_offset: i64) -> bool {
        self.tracker.on_scroll(now, raw_offset)
    }

    /// Evaluate section visibility and forward entry reports.
    pub fn observe_sections(&mut self, now: Instant, spans: &[ElementSpan]) {
        let entered = self.observers.observe(spans, self.state.viewport_height);
        for index in entered {
            self.on_section_in_view(index, now);
        }
    }

    /// Throttled activation entry point; reports inside the cool-down
    /// window are dropped.
    pub fn on_section_in_view(&mut self, index: usize, now: Instant) {
        if let Some(event) = self.activation.call(now, index) {
            self.apply(event);
        }
    }

    pub fn on_navigate(&mut self, index: usize) -> Option<ScrollRequest> {
        self.apply(GalleryEvent::Navigate(index))
    }

    pub fn on_scroll_to_top(&mut self) -> Option<ScrollRequest> {
        self.apply(GalleryEvent::ScrollToTop)
    }

    pub fn on_resize(&mut self, viewport_height: u32, document_height: u32) {
        self.apply(GalleryEvent::Resized {
            viewport_height,
            document_height,
        });
    }

    pub fn active_section(&self) -> Option<usize> {
        self.state.active_section
    }

    pub fn current_image(&self) -> &str {
        selector::select_from(
            self.state.scroll.position,
            self.state.viewport_height,
            self.state.active_section,
            &self.catalog,
        )
    }

    pub fn scroll_progress(&self) -> f64 {
        self.state.scroll_progress()
    }

    pub fn show_scroll_to_top(&self) -> bool {
        self.state.show_scroll_to_top()
    }
}
