//! Fixed full-page backdrop image.
//!
//! The current image is cover-fitted to the page (scaled until both
//! dimensions are filled, then centre-cropped) and drawn with Unicode `▀`
//! half-blocks, two image rows per terminal row.  Brightness and contrast
//! are applied per frame, in that order, so they can follow the scroll
//! progress without refitting.

use image::imageops::FilterType;
use image::RgbaImage;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::spinner::spinner_frame;
use super::theme::Theme;

/// Backdrop brightness at `progress` in `[0, 1]`.
pub fn brightness_for(progress: f64) -> f64 {
    0.6 + 0.2 * progress.clamp(0.0, 1.0)
}

/// Backdrop contrast at `progress` in `[0, 1]`.
pub fn contrast_for(progress: f64) -> f64 {
    1.1 + 0.1 * progress.clamp(0.0, 1.0)
}

/// Scale `src` to cover `cols` x `rows * 2` pixels and crop the centre.
pub fn fit_cover(src: &RgbaImage, cols: u16, rows: u16) -> RgbaImage {
    let (tw, th) = (cols as u32, rows as u32 * 2);
    if tw == 0 || th == 0 || src.width() == 0 || src.height() == 0 {
        return RgbaImage::new(tw, th);
    }
    let (sw, sh) = (src.width() as f64, src.height() as f64);
    let scale = (tw as f64 / sw).max(th as f64 / sh);
    let rw = ((sw * scale).ceil() as u32).max(tw);
    let rh = ((sh * scale).ceil() as u32).max(th);
    let resized = image::imageops::resize(src, rw, rh, FilterType::Triangle);
    let x = (rw - tw) / 2;
    let y = (rh - th) / 2;
    image::imageops::crop_imm(&resized, x, y, tw, th).to_image()
}

/// Last fitted image, reused while the URI and page size stay the same.
#[derive(Debug, Default)]
pub struct BackdropCache {
    entry: Option<((String, u16, u16), RgbaImage)>,
}

impl BackdropCache {
    pub fn fitted(&mut self, uri: &str, src: &RgbaImage, cols: u16, rows: u16) -> &RgbaImage {
        let stale = !matches!(&self.entry, Some(((u, c, r), _)) if u == uri && *c == cols && *r == rows);
        if stale {
            tracing::trace!(uri, cols, rows, "refitting backdrop");
            self.entry = None;
        }
        let (_, img) = self
            .entry
            .get_or_insert_with(|| ((uri.to_string(), cols, rows), fit_cover(src, cols, rows)));
        img
    }
}

/// Scale by `brightness`, then stretch around mid-grey by `contrast`.
fn grade(px: &image::Rgba<u8>, brightness: f64, contrast: f64) -> Color {
    const MID: f64 = 127.5;
    let f = |c: u8| {
        let lit = c as f64 * brightness;
        ((lit - MID) * contrast + MID).round().clamp(0.0, 255.0) as u8
    };
    Color::Rgb(f(px[0]), f(px[1]), f(px[2]))
}

pub struct Backdrop<'a> {
    /// Image already fitted to the page, or `None` for a blank backdrop.
    pub image: Option<&'a RgbaImage>,
    pub brightness: f64,
    pub contrast: f64,
    /// Show the "Loading…" overlay.
    pub loading: bool,
    pub tick: u64,
}

impl Widget for Backdrop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(Theme::page_bg()));

        if let Some(img) = self.image {
            let cols = (img.width() as u16).min(area.width);
            for row in 0..area.height {
                let yt = row as u32 * 2;
                let yb = yt + 1;
                if yb >= img.height() {
                    break;
                }
                for col in 0..cols {
                    let fg = grade(img.get_pixel(col as u32, yt), self.brightness, self.contrast);
                    let bg = grade(img.get_pixel(col as u32, yb), self.brightness, self.contrast);
                    if let Some(cell) = buf.cell_mut(Position::new(area.x + col, area.y + row)) {
                        cell.set_char('▀').set_fg(fg).set_bg(bg);
                    }
                }
            }
        }

        if self.loading && area.width >= 14 && area.height >= 1 {
            let label = format!(" {} Loading… ", spinner_frame(self.tick));
            let w = label.chars().count() as u16;
            let rect = Rect::new(
                area.x + (area.width - w) / 2,
                area.y + area.height / 2,
                w,
                1,
            );
            Paragraph::new(Line::from(Span::styled(label, Theme::loading_text_style())))
                .style(Style::default().bg(Color::Rgb(17, 24, 39)))
                .render(rect, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_follows_progress() {
        assert!((brightness_for(0.0) - 0.6).abs() < 1e-9);
        assert!((brightness_for(1.0) - 0.8).abs() < 1e-9);
        assert!((brightness_for(3.0) - 0.8).abs() < 1e-9);
        assert!((contrast_for(0.0) - 1.1).abs() < 1e-9);
        assert!((contrast_for(1.0) - 1.2).abs() < 1e-9);
        assert!((contrast_for(-1.0) - 1.1).abs() < 1e-9);
    }

    #[test]
    fn cover_fit_fills_target_exactly() {
        let wide = RgbaImage::from_pixel(400, 100, image::Rgba([1, 2, 3, 255]));
        let fitted = fit_cover(&wide, 80, 24);
        assert_eq!(fitted.dimensions(), (80, 48));

        let tall = RgbaImage::from_pixel(50, 500, image::Rgba([1, 2, 3, 255]));
        assert_eq!(fit_cover(&tall, 80, 24).dimensions(), (80, 48));
    }

    #[test]
    fn cache_refits_only_on_change() {
        let src = RgbaImage::from_pixel(100, 100, image::Rgba([9, 9, 9, 255]));
        let mut cache = BackdropCache::default();
        assert_eq!(cache.fitted("a", &src, 10, 5).dimensions(), (10, 10));
        assert_eq!(cache.fitted("a", &src, 20, 5).dimensions(), (20, 10));
        assert_eq!(cache.fitted("b", &src, 20, 5).dimensions(), (20, 10));
    }

    #[test]
    fn pixels_are_dimmed() {
        let img = RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        Backdrop { image: Some(&img), brightness: 0.5, contrast: 1.0, loading: false, tick: 0 }
            .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(100, 50, 25));
        assert_eq!(buf[(3, 1)].symbol(), "▀");
    }

    #[test]
    fn contrast_stretches_around_mid_grey() {
        let img = RgbaImage::from_pixel(2, 2, image::Rgba([200, 100, 50, 255]));
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        Backdrop { image: Some(&img), brightness: 1.0, contrast: 1.5, loading: false, tick: 0 }
            .render(area, &mut buf);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(236, 86, 11));
    }

    #[test]
    fn loading_overlay_is_centred() {
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        Backdrop { image: None, brightness: 1.0, contrast: 1.0, loading: true, tick: 0 }.render(area, &mut buf);
        let row: String = (0..40).map(|x| buf[(x, 5)].symbol().to_string()).collect();
        assert!(row.contains("Loading…"));
    }
}
