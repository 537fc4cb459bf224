//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::config::Action;
use crate::core::gallery::ScrollRequest;
use crate::ui::{chrome, dots, layout::point_in_rect};

use super::state::{AppState, HoverTarget};

/// Fraction of the viewport moved by a page step.
const PAGE_FRACTION: f64 = 0.9;

/// Process a key event.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, loading screen included.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    let action = state.config.match_key(key);
    if !state.is_ready() {
        if action == Some(Action::Quit) {
            state.should_quit = true;
        }
        return;
    }

    // Digits jump straight to a section.
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            navigate(state, c as usize - '1' as usize);
            return;
        }
    }

    let Some(action) = action else {
        return;
    };

    let wheel = state.config.wheel_step_px as i64;
    let page = (state.viewport.height_px() as f64 * PAGE_FRACTION).round() as i64;
    match action {
        Action::ScrollDown => state.viewport.scroll_by(wheel),
        Action::ScrollUp => state.viewport.scroll_by(-wheel),
        Action::PageDown => state.viewport.scroll_by(page),
        Action::PageUp => state.viewport.scroll_by(-page),
        Action::NextSection => {
            if let Some(index) = next_section(state) {
                navigate(state, index);
            }
        }
        Action::PrevSection => match prev_section(state) {
            Some(index) => navigate(state, index),
            None => scroll_to_top(state),
        },
        Action::ScrollToTop => scroll_to_top(state),
        Action::ScrollToBottom => {
            let max = state.viewport.max_scroll();
            state.viewport.scroll_to(max);
        }
        Action::Quit => state.should_quit = true,
    }
}

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if !state.is_ready() {
        return;
    }

    let wheel = state.config.wheel_step_px as i64;
    match mouse.kind {
        MouseEventKind::ScrollDown => state.viewport.scroll_by(wheel),
        MouseEventKind::ScrollUp => state.viewport.scroll_by(-wheel),
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            state.hover = hover_target(state, mouse.column, mouse.row);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            match hover_target(state, mouse.column, mouse.row) {
                Some(HoverTarget::Dot(index)) => navigate(state, index),
                Some(HoverTarget::StartButton) => navigate(state, 0),
                Some(HoverTarget::ScrollTop) => scroll_to_top(state),
                None => {}
            }
        }
        _ => {}
    }
}

/// Clickable element under (`col`, `row`), topmost first.
pub fn hover_target(state: &AppState, col: u16, row: u16) -> Option<HoverTarget> {
    let page = state.layout().page_area;

    if state.gallery.show_scroll_to_top() {
        if let Some(rect) = chrome::scroll_top_rect(page) {
            if point_in_rect(rect, col, row) {
                return Some(HoverTarget::ScrollTop);
            }
        }
    }

    let dot = dots::dot_rects(page, state.gallery.catalog().len())
        .iter()
        .position(|&r| point_in_rect(r, col, row));
    if let Some(index) = dot {
        return Some(HoverTarget::Dot(index));
    }

    match state.hit_zones.start_button {
        Some(rect) if point_in_rect(rect, col, row) => Some(HoverTarget::StartButton),
        _ => None,
    }
}

// ── navigation ──────────────────────────────────────────────────

fn navigate(state: &mut AppState, index: usize) {
    if let Some(request) = state.gallery.on_navigate(index) {
        perform(state, request);
    }
}

fn scroll_to_top(state: &mut AppState) {
    if let Some(request) = state.gallery.on_scroll_to_top() {
        perform(state, request);
    }
}

/// Carry out a scroll request from the gallery controller.
fn perform(state: &mut AppState, request: ScrollRequest) {
    let target = match request {
        ScrollRequest::Section(index) => state.document.section_scroll_target(index),
        ScrollRequest::Top => Some(0),
    };
    tracing::debug!(?request, ?target, "scroll request");
    if let Some(offset) = target {
        state.viewport.scroll_to(offset);
    }
}

/// First section whose scroll target lies below the viewport's target.
fn next_section(state: &AppState) -> Option<usize> {
    let from = state.viewport.target();
    (0..state.document.sections().len())
        .find(|&i| state.document.section_scroll_target(i).is_some_and(|t| t > from))
}

/// Last section whose scroll target lies above the viewport's target.
fn prev_section(state: &AppState) -> Option<usize> {
    let from = state.viewport.target();
    (0..state.document.sections().len())
        .rev()
        .find(|&i| state.document.section_scroll_target(i).is_some_and(|t| t < from))
}
