//! Page content: the hero block and one card per section.
//!
//! Content scrolls with the document.  [`PageProjection`] maps document
//! pixels to page rows; anything that lands outside the page area is
//! clipped.  Cards are drawn into an offscreen buffer first and then copied
//! row by row, so a card cut by the page edge keeps its borders where they
//! are visible.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Widget},
};

use crate::core::document;
use crate::core::section::Section;

use super::theme::{accent_color, gradient_at, gradient_stops, Theme};

// ─── constants ──────────────────────────────────────────────────

pub const CARD_MAX_WIDTH: u16 = 72;
/// Columns kept free on the right of the cards for the navigation dots.
pub const DOT_GUTTER: u16 = 6;
const CARD_PAD_X: u16 = 2;
const ACTIVITY_BAR_ROWS: u16 = 5;

const HERO_TITLE: [&str; 2] = ["Sticky Scroll", "Gallery"];
const HERO_TAGLINE: [&str; 2] = [
    "Experience the future of web interactions through immersive",
    "storytelling and cutting-edge design",
];
const START_LABEL: &str = "  Start Journey  ";
const LEARN_LABEL: &str = "  Learn More  ";
const BUTTON_SPACING: u16 = 3;

// ─── geometry ───────────────────────────────────────────────────

/// Maps document pixels onto the rows of the page area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProjection {
    pub page: Rect,
    pub scroll_px: u32,
    pub px_per_row: u32,
}

impl PageProjection {
    /// Page row (possibly negative or past the bottom) of document pixel `y`.
    pub fn row_of(&self, y: u32) -> i64 {
        (y as i64 - self.scroll_px as i64).div_euclid(self.px_per_row.max(1) as i64)
    }

    /// Screen y of page row `row`, if it is on screen.
    pub fn screen_y(&self, row: i64) -> Option<u16> {
        if row >= 0 && row < self.page.height as i64 {
            Some(self.page.y + row as u16)
        } else {
            None
        }
    }
}

pub fn right_gutter(page_width: u16) -> u16 {
    if super::dots::dots_visible(page_width) {
        DOT_GUTTER
    } else {
        1
    }
}

/// Outer width of a section card on a page `page_width` columns wide.
pub fn card_width(page_width: u16) -> u16 {
    page_width
        .saturating_sub(right_gutter(page_width) + 2)
        .min(CARD_MAX_WIDTH)
}

fn card_inner_width(card_width: u16) -> u16 {
    card_width.saturating_sub(2 + 2 * CARD_PAD_X)
}

/// Outer height in rows of the card for `section` at `card_width`.
pub fn card_height(section: &Section, index: usize, card_width: u16) -> u16 {
    card_lines(section, index, card_inner_width(card_width)).len() as u16 + 2
}

/// Where the card for section block `block` sits in the document, in pixels.
fn card_top_px(block: document::Block, card_rows: u16, px_per_row: u32) -> u32 {
    let card_px = card_rows as u32 * px_per_row;
    block.top + block.height.saturating_sub(card_px) / 2
}

// ─── text helpers ───────────────────────────────────────────────

/// Greedy word wrap.  Words longer than `width` are split.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(width);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }
        let len = chars.len();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

fn gradient_spans(text: &str, stops: &[ratatui::style::Color], modifier: Modifier) -> Vec<Span<'static>> {
    let n = text.chars().count().max(2) - 1;
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            Span::styled(
                ch.to_string(),
                Style::default()
                    .fg(gradient_at(stops, i as f64 / n as f64))
                    .bg(Theme::card_bg())
                    .add_modifier(modifier),
            )
        })
        .collect()
}

fn card_lines(section: &Section, index: usize, width: u16) -> Vec<Line<'static>> {
    let stops = {
        let s = gradient_stops(&section.gradient);
        if s.is_empty() {
            vec![accent_color(&section.accent)]
        } else {
            s
        }
    };

    let number = format!("{:02}", index + 1);
    let rule_len = width.saturating_sub(number.len() as u16 + 1) as usize;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                number,
                Style::default()
                    .fg(stops[0])
                    .bg(Theme::card_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", "─".repeat(rule_len)), Theme::card_subtitle_style()),
        ]),
        Line::default(),
    ];

    for l in wrap_text(&section.subtitle.to_uppercase(), width) {
        lines.push(Line::from(Span::styled(l, Theme::card_subtitle_style())));
    }
    for l in wrap_text(&section.title, width) {
        lines.push(Line::from(gradient_spans(&l, &stops, Modifier::BOLD)));
    }
    lines.push(Line::default());

    for paragraph in section.paragraphs() {
        for l in wrap_text(paragraph, width) {
            lines.push(Line::from(Span::styled(l, Theme::card_body_style())));
        }
        lines.push(Line::default());
    }

    let mut footer = gradient_spans("[ Explore More ]", &stops, Modifier::BOLD);
    footer.push(Span::styled("  • • •", Theme::card_subtitle_style()));
    lines.push(Line::from(footer));
    lines
}

// ─── hero ───────────────────────────────────────────────────────

/// Draw the hero `block`.  Returns the on-screen rect of the "Start
/// Journey" button when it is visible.
pub fn render_hero(
    proj: PageProjection,
    block: document::Block,
    hover_start: bool,
    buf: &mut Buffer,
) -> Option<Rect> {
    let page = proj.page;
    let block_top = proj.row_of(block.top);
    let hero_rows = proj.row_of(block.bottom()) - block_top;

    let buttons_w = (START_LABEL.len() + LEARN_LABEL.len()) as u16 + BUTTON_SPACING;
    let lines: Vec<Line> = vec![
        Line::from(Span::styled(HERO_TITLE[0], Theme::hero_title_style())),
        Line::from(Span::styled(HERO_TITLE[1], Theme::hero_title_style())),
        Line::default(),
        Line::from(Span::styled(HERO_TAGLINE[0], Theme::hero_text_style())),
        Line::from(Span::styled(HERO_TAGLINE[1], Theme::hero_text_style())),
        Line::default(),
        Line::from(vec![
            Span::styled(START_LABEL, Theme::button_style(hover_start)),
            Span::raw(" ".repeat(BUTTON_SPACING as usize)),
            Span::styled(LEARN_LABEL, Theme::muted_style().add_modifier(Modifier::BOLD)),
        ]),
    ];
    let button_row = lines.len() as i64 - 1;
    let content_top = block_top + (hero_rows - lines.len() as i64).max(0) / 2;

    let mut start_rect = None;
    for (i, line) in lines.iter().enumerate() {
        let Some(y) = proj.screen_y(content_top + i as i64) else {
            continue;
        };
        let w = line.width() as u16;
        let x = page.x + page.width.saturating_sub(w) / 2;
        buf.set_line(x, y, line, page.width);
        if i as i64 == button_row && page.width >= buttons_w {
            start_rect = Some(Rect::new(x, y, START_LABEL.len() as u16, 1));
        }
    }

    let hint_row = block_top + hero_rows - 3;
    if let Some(y) = proj.screen_y(hint_row) {
        let hint = Line::from(Span::styled("Scroll to explore ↓", Theme::muted_style()));
        let x = page.x + page.width.saturating_sub(hint.width() as u16) / 2;
        buf.set_line(x, y, &hint, page.width);
    }
    start_rect
}

// ─── section cards ──────────────────────────────────────────────

/// One section card at its natural size.
struct SectionCard<'a> {
    section: &'a Section,
    index: usize,
    active: bool,
}

impl Widget for SectionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::card_border_style(self.active))
            .style(Style::default().bg(Theme::card_bg()))
            .padding(Padding::horizontal(CARD_PAD_X));
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(card_lines(self.section, self.index, inner.width)).render(inner, buf);
    }
}

/// Copy rows of `src` onto `buf`, placing `src`'s first row at page row
/// `top_row` and dropping rows outside the page.
fn blit_rows(src: &Buffer, x: u16, top_row: i64, proj: PageProjection, buf: &mut Buffer) {
    let area = src.area;
    for r in 0..area.height {
        let Some(y) = proj.screen_y(top_row + r as i64) else {
            continue;
        };
        for c in 0..area.width {
            let (Some(from), Some(to)) = (
                src.cell(Position::new(c, r)),
                buf.cell_mut(Position::new(x + c, y)),
            ) else {
                continue;
            };
            *to = from.clone();
        }
    }
}

/// Draw the card for section `index`, laid out in document block `block`.
pub fn render_section(
    proj: PageProjection,
    block: document::Block,
    section: &Section,
    index: usize,
    active: bool,
    buf: &mut Buffer,
) {
    let page = proj.page;
    let w = card_width(page.width);
    if w < 12 {
        return;
    }
    let h = card_height(section, index, w);
    let top_row = proj.row_of(card_top_px(block, h, proj.px_per_row));
    if top_row >= page.height as i64 || top_row + (h as i64) <= 0 {
        return;
    }

    let x = page.x + page.width - right_gutter(page.width) - w;
    let mut card = Buffer::empty(Rect::new(0, 0, w, h));
    SectionCard { section, index, active }.render(card.area, &mut card);
    blit_rows(&card, x, top_row, proj, buf);

    // Activity bar left of the card, filled while this section is active.
    if x < page.x + 2 {
        return;
    }
    let stops = gradient_stops(&section.gradient);
    let bar_top = top_row + (h / 2) as i64 - (ACTIVITY_BAR_ROWS / 2) as i64;
    for i in 0..ACTIVITY_BAR_ROWS {
        let Some(y) = proj.screen_y(bar_top + i as i64) else {
            continue;
        };
        if let Some(cell) = buf.cell_mut(Position::new(x - 2, y)) {
            if active {
                let t = i as f64 / (ACTIVITY_BAR_ROWS - 1) as f64;
                cell.set_char('┃').set_fg(gradient_at(&stops, t));
            } else {
                cell.set_char('│').set_style(Theme::track_style());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::sample_section;

    fn proj(height: u16, scroll_px: u32) -> PageProjection {
        PageProjection {
            page: Rect::new(0, 0, 100, height),
            scroll_px,
            px_per_row: 16,
        }
    }

    #[test]
    fn wrap_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefghij xy", 4), vec!["abcd", "efgh", "ij", "xy"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn projection_rounds_towards_negative() {
        let p = proj(20, 40);
        assert_eq!(p.row_of(40), 0);
        assert_eq!(p.row_of(71), 1);
        assert_eq!(p.row_of(24), -1);
        assert_eq!(p.screen_y(-1), None);
        assert_eq!(p.screen_y(19), Some(19));
        assert_eq!(p.screen_y(20), None);
    }

    #[test]
    fn card_opens_with_zero_padded_number() {
        let lines = card_lines(&sample_section(1, "a.png"), 6, 40);
        let first = lines[0].spans[0].content.as_ref();
        assert_eq!(first, "07");
    }

    #[test]
    fn narrower_cards_are_taller() {
        let mut s = sample_section(1, "a.png");
        s.content = "lorem ipsum ".repeat(40);
        assert!(card_height(&s, 0, 30) > card_height(&s, 0, 70));
    }

    #[test]
    fn hero_button_visible_only_while_on_screen() {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        let hero = document::Block { top: 0, height: 30 * 16 };
        let rect = render_hero(proj(30, 0), hero, false, &mut buf).unwrap();
        assert_eq!(rect.width, START_LABEL.len() as u16);

        let mut buf = Buffer::empty(area);
        assert_eq!(render_hero(proj(30, 30 * 16), hero, false, &mut buf), None);
    }

    #[test]
    fn card_is_clipped_at_page_top() {
        let s = sample_section(1, "a.png");
        let area = Rect::new(0, 0, 100, 30);
        let block = document::Block { top: 0, height: 30 * 16 };
        let h = card_height(&s, 0, card_width(100));
        let top_px = card_top_px(block, h, 16);

        let mut buf = Buffer::empty(area);
        // scroll so that the top border is one row above the page
        render_section(proj(30, top_px + 16), block, &s, 0, false, &mut buf);
        let x = 100 - right_gutter(100) - card_width(100);
        assert_eq!(buf[(x, 0)].symbol(), "│");
    }
}
