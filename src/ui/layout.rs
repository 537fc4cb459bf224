//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen layout: the scrolling page with a bottom status bar.  The
/// progress bar overlays the first page row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub page_area: Rect,
    pub progress_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let page_area = chunks[0];
        Self {
            page_area,
            progress_area: Rect::new(page_area.x, page_area.y, page_area.width, 1.min(page_area.height)),
            status_area: chunks[1],
        }
    }
}

/// `true` when (`col`, `row`) falls inside `area`.
pub fn point_in_rect(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x
        && col < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_last_row() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.page_area, Rect::new(0, 0, 80, 23));
        assert_eq!(layout.status_area, Rect::new(0, 23, 80, 1));
        assert_eq!(layout.progress_area, Rect::new(0, 0, 80, 1));
    }

    #[test]
    fn point_in_rect_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(point_in_rect(r, 2, 3));
        assert!(point_in_rect(r, 5, 4));
        assert!(!point_in_rect(r, 6, 4));
        assert!(!point_in_rect(r, 5, 5));
    }
}
