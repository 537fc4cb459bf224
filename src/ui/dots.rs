//! Navigation dots on the right edge of the page, one per section.
//!
//! Geometry is a pure function of the page area so the input handler can
//! hit-test clicks against the same rects the widget draws.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;

/// Narrower pages hide the dots.
pub const MIN_PAGE_WIDTH: u16 = 60;
const DOT_SPACING: u16 = 2;
const HIT_WIDTH: u16 = 3;

pub fn dots_visible(page_width: u16) -> bool {
    page_width >= MIN_PAGE_WIDTH
}

/// Clickable rect of every dot, top to bottom.  Empty when hidden or when
/// the page is too short for all of them.
pub fn dot_rects(page: Rect, count: usize) -> Vec<Rect> {
    if !dots_visible(page.width) || count == 0 {
        return Vec::new();
    }
    let span = (count as u16 - 1) * DOT_SPACING + 1;
    if span > page.height {
        return Vec::new();
    }
    let top = page.y + (page.height - span) / 2;
    let x = page.x + page.width - HIT_WIDTH - 1;
    (0..count as u16)
        .map(|i| Rect::new(x, top + i * DOT_SPACING, HIT_WIDTH, 1))
        .collect()
}

pub struct NavDots<'a> {
    pub titles: &'a [&'a str],
    pub active: Option<usize>,
    pub hovered: Option<usize>,
}

impl Widget for NavDots<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rects = dot_rects(area, self.titles.len());
        for (i, rect) in rects.iter().enumerate() {
            let active = self.active == Some(i);
            let hovered = self.hovered == Some(i);
            let glyph = if active { "◉" } else { "○" };
            buf.set_span(
                rect.x + 1,
                rect.y,
                &Span::styled(glyph, Theme::dot_style(active, hovered)),
                1,
            );

            if !hovered {
                continue;
            }
            let tip = Line::from(vec![
                Span::styled(format!(" {} ", self.titles[i]), Theme::tooltip_style()),
                Span::styled("▸", Theme::dot_style(false, true)),
            ]);
            let w = tip.width() as u16;
            let right = rect.x.saturating_sub(1);
            let x = right.saturating_sub(w).max(area.x);
            buf.set_line(x, rect.y, &tip, right - x);
        }
    }
}
