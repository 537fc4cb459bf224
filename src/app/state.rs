//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    document::DocumentLayout,
    gallery::GalleryController,
    preload::{ImageCache, LoadState},
    scroll::{ScrollTracker, ViewportSignal},
    section::SectionCatalog,
};
use crate::ui::{backdrop::BackdropCache, layout::AppLayout, panels};

use super::viewport::Viewport;

/// Delay between the last image settling and the gallery appearing.
pub const REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Startup preload progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// Some images are still pending.
    Preloading,
    /// Everything settled at `since`; waiting out [`REVEAL_DELAY`].
    Settling { since: Instant },
    /// Gallery on screen.
    Ready,
}

/// Something under the mouse pointer that reacts to clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTarget {
    Dot(usize),
    StartButton,
    ScrollTop,
}

/// Clickable rects recorded during the last draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitZones {
    pub start_button: Option<Rect>,
}

pub type ImageStore = ImageCache<Arc<RgbaImage>>;

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    pub gallery: GalleryController,
    pub viewport: Viewport,
    pub document: DocumentLayout,
    pub images: ImageStore,
    pub backdrop: BackdropCache,
    pub terminal_area: Rect,
    pub hit_zones: HitZones,
    pub hover: Option<HoverTarget>,
    pub phase: LoadPhase,
    /// Frame counter (drives spinners).
    pub tick: u64,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(catalog: SectionCatalog, config: AppConfig) -> Self {
        let tracker = ScrollTracker::new(0, Duration::from_millis(config.scroll_sample_ms));
        let gallery = GalleryController::new(
            catalog,
            tracker,
            Duration::from_millis(config.activation_ms),
        );

        let mut images = ImageCache::new(gallery.catalog().hero_image());
        for uri in gallery.catalog().all_images() {
            images.request(uri);
        }

        Self {
            viewport: Viewport::new(config.smooth_speed_pct as f64 / 100.0),
            config,
            gallery,
            document: DocumentLayout::default(),
            images,
            backdrop: BackdropCache::default(),
            terminal_area: Rect::default(),
            hit_zones: HitZones::default(),
            hover: None,
            phase: LoadPhase::Preloading,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.terminal_area)
    }

    pub fn projection(&self) -> panels::PageProjection {
        panels::PageProjection {
            page: self.layout().page_area,
            scroll_px: self.viewport.offset(),
            px_per_row: self.config.px_per_row,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// Recompute document geometry for a terminal of size `area`.
    pub fn relayout(&mut self, area: Rect) {
        self.terminal_area = area;
        let page = AppLayout::from_area(area).page_area;
        let ppr = self.config.px_per_row;
        let viewport_height = page.height as u32 * ppr;
        let width = panels::card_width(page.width);
        let card_heights: Vec<u32> = self
            .gallery
            .catalog()
            .sections()
            .iter()
            .enumerate()
            .map(|(i, s)| panels::card_height(s, i, width) as u32 * ppr)
            .collect();

        self.document = DocumentLayout::new(viewport_height, &card_heights);
        self.viewport
            .set_geometry(viewport_height, self.document.max_scroll());
        self.gallery
            .on_resize(viewport_height, self.document.document_height());
        tracing::debug!(
            cols = area.width,
            rows = area.height,
            viewport_height,
            document_height = self.document.document_height(),
            "relayout"
        );
    }

    /// Advance one animation frame.
    pub fn on_frame(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);

        let was_animating = self.viewport.is_animating();
        let moved = self.viewport.tick().is_some();
        let offset = self.viewport.offset();
        if was_animating && !self.viewport.is_animating() {
            tracing::debug!(offset, "scroll settled");
        }
        // A sample dropped by the tracker's throttle is retried on later
        // frames so the signal always catches up with a resting viewport.
        if moved || self.gallery.signal().position() != offset {
            self.gallery.sample_scroll(now, offset as i64);
        }

        if self.is_ready() {
            let spans = self.document.section_spans(offset);
            self.gallery.observe_sections(now, &spans);
        } else {
            self.advance_phase(now);
        }

        let current = self.gallery.current_image().to_string();
        self.images.request(&current);
    }

    fn advance_phase(&mut self, now: Instant) {
        match self.phase {
            LoadPhase::Preloading => {
                if self.images.all_settled(self.gallery.catalog().all_images()) {
                    tracing::info!(
                        loaded = self.images.loaded_count(),
                        total = self.gallery.catalog().all_images().len(),
                        "images settled"
                    );
                    self.phase = LoadPhase::Settling { since: now };
                }
            }
            LoadPhase::Settling { since } => {
                if now.saturating_duration_since(since) >= REVEAL_DELAY {
                    self.phase = LoadPhase::Ready;
                }
            }
            LoadPhase::Ready => {}
        }
    }

    /// `true` once every startup image has loaded or failed.
    pub fn images_settled(&self) -> bool {
        !matches!(self.phase, LoadPhase::Preloading)
    }

    /// URI to draw behind the page, with its load state.  `None` when even
    /// the fallback image failed and the backdrop stays blank.
    pub fn backdrop_image(&self) -> Option<(&str, LoadState)> {
        let uri = self.images.display_uri(self.gallery.current_image());
        match self.images.state(uri) {
            Some(LoadState::Failed) => None,
            Some(state) => Some((uri, state)),
            None => Some((uri, LoadState::Pending)),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::section::sample_section;

    pub(crate) fn test_state() -> AppState {
        let catalog = SectionCatalog::new(
            "hero.png",
            vec![
                sample_section(1, "a.png"),
                sample_section(2, "b.png"),
                sample_section(3, "c.png"),
            ],
        )
        .unwrap();
        let mut state = AppState::new(catalog, AppConfig::default());
        state.relayout(Rect::new(0, 0, 100, 31));
        state
    }

    pub(crate) fn settle_all(state: &mut AppState) {
        for uri in state.images.take_pending() {
            state.images.complete::<String>(&uri, Ok(Arc::new(RgbaImage::new(2, 2))));
        }
    }

    /// Run frames until the viewport comes to rest.
    pub(crate) fn run_frames(state: &mut AppState, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..500 {
            now += Duration::from_millis(16);
            state.on_frame(now);
            if !state.viewport.is_animating() {
                break;
            }
        }
        now += Duration::from_millis(16);
        state.on_frame(now);
        now
    }

    #[test]
    fn every_image_is_queued_once_at_startup() {
        let mut state = test_state();
        let pending = state.images.take_pending();
        assert_eq!(pending, vec!["hero.png", "a.png", "b.png", "c.png"]);
    }

    #[test]
    fn relayout_sizes_the_viewport_in_virtual_pixels() {
        let state = test_state();
        // 31 rows minus the status bar
        assert_eq!(state.gallery.state().viewport_height, 30 * 16);
        assert_eq!(state.document.hero().height, 30 * 16);
        assert_eq!(
            state.gallery.state().document_height,
            state.document.document_height()
        );
        assert_eq!(state.viewport.max_scroll(), state.document.max_scroll());
    }

    #[test]
    fn gallery_appears_after_reveal_delay() {
        let mut state = test_state();
        let t0 = Instant::now();
        state.on_frame(t0);
        assert_eq!(state.phase, LoadPhase::Preloading);

        settle_all(&mut state);
        state.on_frame(t0);
        assert_eq!(state.phase, LoadPhase::Settling { since: t0 });
        state.on_frame(t0 + Duration::from_millis(499));
        assert!(!state.is_ready());
        state.on_frame(t0 + REVEAL_DELAY);
        assert!(state.is_ready());
    }

    #[test]
    fn failed_images_still_settle() {
        let mut state = test_state();
        for uri in state.images.take_pending() {
            state.images.complete::<&str>(&uri, Err("offline"));
        }
        let t0 = Instant::now();
        state.on_frame(t0);
        assert!(state.images_settled());
        // hero failed too: nothing to draw
        assert_eq!(state.backdrop_image(), None);
    }

    #[test]
    fn scrolling_into_a_section_activates_it() {
        let mut state = test_state();
        settle_all(&mut state);
        let t0 = Instant::now();
        state.on_frame(t0);
        state.on_frame(t0 + REVEAL_DELAY);
        assert_eq!(state.gallery.active_section(), None);

        let target = state.document.section_scroll_target(0).unwrap();
        state.viewport.scroll_to(target);
        run_frames(&mut state, t0 + REVEAL_DELAY);
        assert_eq!(state.viewport.offset(), target);
        assert_eq!(state.gallery.signal().position(), target);
        assert_eq!(state.gallery.active_section(), Some(0));
    }
}
