//! Loading screen shown while the images are being preloaded: a spinner,
//! a label and a progress bar, centred on the terminal.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::{gradient_at, Theme, PROGRESS_GRADIENT};

/// Braille-dot spinner frames.  Cycles through these on each tick.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const BAR_WIDTH: u16 = 24;

pub fn spinner_frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

pub struct LoadingScreen {
    /// Monotonically increasing tick counter (drives the spinner frame).
    pub tick: u64,
    /// `true` once every image has settled; the bar fills completely.
    pub settled: bool,
}

impl LoadingScreen {
    fn fill_fraction(&self) -> f64 {
        if self.settled {
            1.0
        } else {
            0.6
        }
    }
}

impl Widget for LoadingScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Theme::page_bg()));
        if area.width < 4 || area.height < 3 {
            return;
        }

        let mid = area.y + area.height / 2;
        let spinner = Line::from(Span::styled(spinner_frame(self.tick), Theme::loading_text_style()))
            .centered();
        Paragraph::new(spinner).render(Rect::new(area.x, mid.saturating_sub(2).max(area.y), area.width, 1), buf);

        let label = Line::from(Span::styled("Loading Experience...", Theme::loading_text_style())).centered();
        Paragraph::new(label).render(Rect::new(area.x, mid, area.width, 1), buf);

        let bar_y = mid + 2;
        if bar_y >= area.y + area.height {
            return;
        }
        let bar_w = BAR_WIDTH.min(area.width);
        let bar_x = area.x + (area.width - bar_w) / 2;
        let filled = (bar_w as f64 * self.fill_fraction()).round() as u16;
        for i in 0..bar_w {
            let Some(cell) = buf.cell_mut(Position::new(bar_x + i, bar_y)) else {
                continue;
            };
            if i < filled {
                let t = i as f64 / bar_w.saturating_sub(1).max(1) as f64;
                cell.set_char('━').set_fg(gradient_at(&PROGRESS_GRADIENT, t));
            } else {
                cell.set_char('─').set_style(Theme::track_style());
            }
        }
    }
}
