//! Fixed chrome drawn over the page: the progress bar, the scroll-to-top
//! button and the status bar.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::core::scroll::Direction;

use super::theme::{gradient_at, Theme, PROGRESS_GRADIENT};

const SCROLL_TOP_LABEL: &str = "  ↑  ";

/// Thin bar along the top edge, `progress` of the width filled.
pub struct ProgressBar {
    pub progress: f64,
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let filled = (area.width as f64 * self.progress.clamp(0.0, 1.0)).round() as u16;
        let denom = area.width.saturating_sub(1).max(1) as f64;
        for i in 0..filled {
            if let Some(cell) = buf.cell_mut(Position::new(area.x + i, area.y)) {
                cell.set_char('▔')
                    .set_fg(gradient_at(&PROGRESS_GRADIENT, i as f64 / denom));
            }
        }
    }
}

/// Clickable rect of the scroll-to-top button, bottom right of the page.
pub fn scroll_top_rect(page: Rect) -> Option<Rect> {
    let w = SCROLL_TOP_LABEL.chars().count() as u16;
    if page.width < w + 3 || page.height < 3 {
        return None;
    }
    Some(Rect::new(
        page.x + page.width - w - 2,
        page.y + page.height - 2,
        w,
        1,
    ))
}

pub struct ScrollTopButton {
    pub hovered: bool,
}

impl Widget for ScrollTopButton {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            SCROLL_TOP_LABEL,
            Theme::button_style(self.hovered),
        )))
        .render(area, buf);
    }
}

/// Bottom status line: current position in the gallery plus key hints.
pub struct StatusBar<'a> {
    /// `(index, count, title)` of the active section; `None` on the hero.
    pub section: Option<(usize, usize, &'a str)>,
    pub progress: f64,
    /// Direction of the last sampled scroll movement.
    pub direction: Direction,
    pub hint: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let location = match self.section {
            Some((index, count, title)) => format!(" {}/{} {} ", index + 1, count, title),
            None => " Home ".to_string(),
        };
        let arrow = match self.direction {
            Direction::Up => '↑',
            Direction::Down => '↓',
        };
        let pct = format!(
            " {arrow} {:>3}% ",
            (self.progress.clamp(0.0, 1.0) * 100.0).round() as u32
        );
        let line = Line::from(vec![
            Span::raw(location),
            Span::raw("│"),
            Span::raw(pct),
            Span::raw("│ "),
            Span::raw(self.hint),
        ]);
        Paragraph::new(line)
            .style(Theme::status_bar_style())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_fills_proportionally() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar { progress: 0.5 }.render(area, &mut buf);
        let filled = (0..20).filter(|&x| buf[(x, 0)].symbol() == "▔").count();
        assert_eq!(filled, 10);

        let mut buf = Buffer::empty(area);
        ProgressBar { progress: 0.0 }.render(area, &mut buf);
        assert!((0..20).all(|x| buf[(x, 0)].symbol() == " "));
    }

    #[test]
    fn scroll_top_sits_bottom_right() {
        let rect = scroll_top_rect(Rect::new(0, 0, 80, 23)).unwrap();
        assert_eq!(rect, Rect::new(73, 21, 5, 1));
        assert_eq!(scroll_top_rect(Rect::new(0, 0, 6, 23)), None);
    }

    #[test]
    fn status_shows_section_and_percent() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar {
            section: Some((1, 3, "Beta")),
            progress: 0.456,
            direction: Direction::Up,
            hint: "q: quit",
        }
        .render(area, &mut buf);
        let row: String = (0..60).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.starts_with(" 2/3 Beta │ ↑  46% │ q: quit"));
    }
}
